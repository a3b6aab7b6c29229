//! Ready-made actors and helpers for common scenario needs

mod counter;
mod init;
mod label;
mod timer;

pub use counter::Counter;
pub use init::{Init, InitOnce};
pub use label::Label;
pub use timer::Timer;
