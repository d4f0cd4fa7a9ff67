mod health;
pub mod router;
mod state;

pub use state::{AppState, AppStateBuilder, AppStateError};
