//! A decoded sound on its own sink

use std::io::Cursor;
use std::sync::Arc;

use rodio::{Decoder, Sink, mixer::Mixer};

use super::voices::Voice;

/// A decoded clip on its own sink
pub struct Sound {
    sink: Sink,
    /// File name the sound was loaded from
    name: String,
}

impl Sound {
    /// Decode encoded audio (WAV, MP3, OGG, FLAC) onto a paused sink
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes cannot be decoded
    pub fn from_bytes(
        mixer: &Mixer,
        bytes: Arc<[u8]>,
        name: impl Into<String>,
    ) -> Result<Self, AudioError> {
        let source =
            Decoder::new(Cursor::new(bytes)).map_err(|e| AudioError::DecodeError(e.to_string()))?;

        let sink = Sink::connect_new(mixer);
        sink.append(source);
        sink.pause();

        Ok(Self {
            sink,
            name: name.into(),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Voice for Sound {
    fn play(&mut self) {
        self.sink.play();
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    /// Stop for good; a stopped sound cannot be resumed
    fn stop(&mut self) {
        self.sink.stop();
    }

    fn volume(&self) -> f32 {
        self.sink.volume()
    }

    fn set_volume(&mut self, volume: f32) {
        self.sink.set_volume(volume.max(0.0));
    }

    fn is_playing(&self) -> bool {
        !self.sink.is_paused() && !self.sink.empty()
    }

    /// All samples have been played
    fn is_finished(&self) -> bool {
        self.sink.empty()
    }
}

impl std::fmt::Debug for Sound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sound")
            .field("name", &self.name)
            .field("paused", &self.sink.is_paused())
            .field("volume", &self.sink.volume())
            .finish()
    }
}

/// Errors that can occur during audio operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// The sound file cannot be found or read
    IoError(String),
    DecodeError(String),
    /// No audio device available
    NoDevice,
}

impl std::fmt::Display for AudioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::DecodeError(e) => write!(f, "Decode error: {e}"),
            Self::NoDevice => write!(f, "No audio output device available"),
        }
    }
}

impl std::error::Error for AudioError {}
