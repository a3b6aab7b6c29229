//! Core application module
//!
//! Configuration, errors, events, timing and the application loop

mod app;
pub mod config;
pub mod debug;
mod error;
pub mod events;
pub mod snapshot;
pub mod time;
mod window;

pub use app::{Application, Viewport};
pub use config::{CONFIG_FILE, Config, ConfigError, WindowMode};
pub use debug::{DebugInfo, FrameStats};
pub use error::{Error, Result};
pub use events::{AppEvent, EventQueue};
pub use snapshot::{ActorRegistry, ActorSnapshot, SnapshotError, TextSnapshot, WorldSnapshot};
pub use time::{FrameLimiter, Time};
pub use window::run;
