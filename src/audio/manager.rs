//! Audio output and sound playback

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, mixer::Mixer};

use super::source::{AudioError, Sound};
use super::voices::Voices;
use crate::assets::{AssetCache, ResourceKind, Resources};

/// Owns the output device and every playing sound
pub struct AudioManager {
    /// The output stream (must be kept alive)
    _stream: OutputStream,
    mixer: Mixer,
    resources: Resources,
    /// Encoded clips by resolved path
    clips: AssetCache<Arc<[u8]>>,
    voices: Voices<Sound>,
}

impl AudioManager {
    /// Open the default output device
    ///
    /// # Errors
    ///
    /// Returns an error if no audio output device is available
    pub fn new(resources: Resources) -> Result<Self, AudioError> {
        let stream = OutputStreamBuilder::from_default_device()
            .map_err(|_| AudioError::NoDevice)?
            .open_stream()
            .map_err(|_| AudioError::NoDevice)?;
        let mixer = stream.mixer().clone();
        log::info!("Audio output opened");

        Ok(Self {
            _stream: stream,
            mixer,
            resources,
            clips: AssetCache::new(),
            voices: Voices::new(),
        })
    }

    fn clip(&mut self, file: &str) -> Result<Arc<[u8]>, AudioError> {
        let path = self
            .resources
            .resolve(file, ResourceKind::Sound)
            .map_err(|e| AudioError::IoError(e.to_string()))?;
        let clip = self.clips.get_or_load(&path, |p: &Path| {
            std::fs::read(p)
                .map(Arc::from)
                .map_err(|e| AudioError::IoError(e.to_string()))
        })?;
        Ok(Arc::clone(&*clip))
    }

    /// Play a sound file once, looked up in the sound folder
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be found or decoded
    pub fn play(&mut self, file: &str) -> Result<(), AudioError> {
        let clip = self.clip(file)?;
        let sound = Sound::from_bytes(&self.mixer, clip, file)?;
        log::debug!("Playing sound {}", sound.name());
        self.voices.start(sound);
        Ok(())
    }

    /// Stop every sound, fading out linearly over `fade`
    pub fn stop_all(&mut self, fade: Duration) {
        self.voices.stop_all(fade);
    }

    pub fn pause_all(&mut self) {
        self.voices.pause_all();
    }

    pub fn resume_all(&mut self) {
        self.voices.resume_all();
    }

    /// Advance fades and drop finished sounds
    pub fn update(&mut self, dt: Duration) {
        self.voices.update(dt);
    }

    pub fn set_master_volume(&mut self, volume: f32) {
        self.voices.set_master_volume(volume);
    }

    #[must_use]
    pub const fn master_volume(&self) -> f32 {
        self.voices.master_volume()
    }

    /// Number of sounds still playing, paused or fading
    #[must_use]
    pub fn playing_count(&self) -> usize {
        self.voices.len()
    }
}

impl std::fmt::Debug for AudioManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioManager")
            .field("playing", &self.voices.len())
            .field("cached_clips", &self.clips.len())
            .field("master_volume", &self.voices.master_volume())
            .finish()
    }
}
