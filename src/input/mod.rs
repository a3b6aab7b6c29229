//! Input handling module
//!
//! Tracks raw keyboard and mouse state and resolves key names.

mod keys;
mod mouse;
mod state;

pub use keys::KeyQuery;
pub use mouse::MouseInfo;
pub use state::{Input, MOUSE_BUTTONS};
