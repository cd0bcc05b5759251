mod edit;
mod error;
mod store;
mod value;


pub use edit::{parse_dims, permute, reshape};
pub use error::{CoreError, Result};
pub use store::{DataStore, Entry, Group, sorted_keys};
pub use value::{ArrayRef, DType, Value};
