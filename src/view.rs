mod animation;
mod events;
mod session;
mod state;


pub use animation::Animation;
pub use events::{ClickModifier, ViewEvent};
pub use session::{ViewOutcome, ViewSession};
pub use state::{ViewState, ViewStateStore};
