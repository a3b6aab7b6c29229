//! Sound playback
//!
//! Built on top of the rodio audio library.
//! Supports WAV, MP3, OGG, and FLAC formats.

mod manager;
mod source;
mod voices;

pub use manager::AudioManager;
pub use source::{AudioError, Sound};
pub use voices::{Fade, Voice, Voices};
