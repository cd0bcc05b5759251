mod context;
mod error;
mod loader;
mod prefs;


pub use context::AppContext;
pub use error::{AppError, Result};
pub use loader::{LoadEvent, Loader};
pub use prefs::Preferences;
