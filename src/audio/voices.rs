//! Volume, fades and lifetime of playing sounds
//!
//! Nothing here touches the output device, so [`Voices`] works the same for
//! rodio sinks and for any other [`Voice`].

use std::time::Duration;

/// Linear fade to silence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fade {
    duration: Duration,
    elapsed: Duration,
    start_volume: f32,
}

impl Fade {
    #[must_use]
    pub fn new(duration: Duration, start_volume: f32) -> Self {
        Self {
            duration,
            elapsed: Duration::ZERO,
            start_volume,
        }
    }

    /// Advance by `dt` and return the volume to apply now
    pub fn advance(&mut self, dt: Duration) -> f32 {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        self.volume()
    }

    /// Volume at the current point of the fade
    #[must_use]
    pub fn volume(&self) -> f32 {
        if self.is_done() {
            return 0.0;
        }
        let progress = self.elapsed.as_secs_f32() / self.duration.as_secs_f32();
        self.start_volume * (1.0 - progress)
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Something that plays: a sink, or a stand-in
pub trait Voice {
    fn play(&mut self);
    fn pause(&mut self);
    fn stop(&mut self);
    fn volume(&self) -> f32;
    fn set_volume(&mut self, volume: f32);
    fn is_playing(&self) -> bool;
    fn is_finished(&self) -> bool;
}

struct Playing<V> {
    voice: V,
    fade: Option<Fade>,
}

/// Every sound started and not yet finished
pub struct Voices<V: Voice> {
    playing: Vec<Playing<V>>,
    master_volume: f32,
}

impl<V: Voice> Voices<V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            playing: Vec::new(),
            master_volume: 1.0,
        }
    }

    /// Start a voice at the master volume
    pub fn start(&mut self, mut voice: V) {
        voice.set_volume(self.master_volume);
        voice.play();
        self.playing.push(Playing { voice, fade: None });
    }

    /// Stop every voice, fading out linearly over `fade`
    ///
    /// A voice already fading keeps its fade.
    pub fn stop_all(&mut self, fade: Duration) {
        if fade.is_zero() {
            for playing in &mut self.playing {
                playing.voice.stop();
            }
            self.playing.clear();
            return;
        }
        for playing in &mut self.playing {
            if playing.fade.is_none() {
                playing.fade = Some(Fade::new(fade, playing.voice.volume()));
            }
        }
    }

    pub fn pause_all(&mut self) {
        for playing in &mut self.playing {
            playing.voice.pause();
        }
    }

    pub fn resume_all(&mut self) {
        for playing in &mut self.playing {
            playing.voice.play();
        }
    }

    /// Advance fades and drop finished voices
    pub fn update(&mut self, dt: Duration) {
        for playing in &mut self.playing {
            if let Some(fade) = &mut playing.fade {
                let volume = fade.advance(dt);
                playing.voice.set_volume(volume);
                if fade.is_done() {
                    playing.voice.stop();
                }
            }
        }
        self.playing.retain(|p| !p.voice.is_finished());
    }

    /// Set the volume of new voices and of playing ones that do not fade
    pub fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = volume.max(0.0);
        for playing in &mut self.playing {
            if playing.fade.is_none() {
                playing.voice.set_volume(self.master_volume);
            }
        }
    }

    #[must_use]
    pub const fn master_volume(&self) -> f32 {
        self.master_volume
    }

    /// Voices still playing, paused or fading
    #[must_use]
    pub fn len(&self) -> usize {
        self.playing.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.playing.is_empty()
    }

    /// Voices currently audible
    #[must_use]
    pub fn audible(&self) -> usize {
        self.playing.iter().filter(|p| p.voice.is_playing()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &V> {
        self.playing.iter().map(|p| &p.voice)
    }
}

impl<V: Voice> Default for Voices<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Tape {
        volume: f32,
        playing: bool,
        stopped: bool,
        /// Finishes on its own after this many updates
        remaining: Option<u32>,
    }

    impl Voice for Tape {
        fn play(&mut self) {
            if !self.stopped {
                self.playing = true;
            }
        }

        fn pause(&mut self) {
            self.playing = false;
        }

        fn stop(&mut self) {
            self.playing = false;
            self.stopped = true;
        }

        fn volume(&self) -> f32 {
            self.volume
        }

        fn set_volume(&mut self, volume: f32) {
            self.volume = volume;
        }

        fn is_playing(&self) -> bool {
            self.playing
        }

        fn is_finished(&self) -> bool {
            self.stopped || self.remaining == Some(0)
        }
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_fade_is_linear() {
        let mut fade = Fade::new(Duration::from_millis(100), 1.0);
        assert!(close(fade.advance(Duration::from_millis(25)), 0.75));
        assert!(close(fade.advance(Duration::from_millis(25)), 0.5));
        assert!(!fade.is_done());
    }

    #[test]
    fn test_fade_finishes_silent() {
        let mut fade = Fade::new(Duration::from_millis(100), 0.8);
        assert_eq!(fade.advance(Duration::from_secs(1)), 0.0);
        assert!(fade.is_done());
    }

    #[test]
    fn test_fade_scales_start_volume() {
        let mut fade = Fade::new(Duration::from_millis(200), 0.5);
        assert!(close(fade.advance(Duration::from_millis(100)), 0.25));
    }

    #[test]
    fn test_zero_length_fade_is_done() {
        let fade = Fade::new(Duration::ZERO, 1.0);
        assert!(fade.is_done());
        assert_eq!(fade.volume(), 0.0);
    }

    #[test]
    fn test_start_uses_master_volume() {
        let mut voices = Voices::new();
        voices.set_master_volume(0.6);
        voices.start(Tape::default());
        assert_eq!(voices.len(), 1);
        assert_eq!(voices.audible(), 1);
        assert!(close(voices.iter().next().unwrap().volume, 0.6));
    }

    #[test]
    fn test_stop_all_fades_then_drops() {
        let mut voices = Voices::new();
        voices.start(Tape::default());
        voices.start(Tape::default());

        voices.stop_all(Duration::from_millis(100));
        voices.update(Duration::from_millis(50));
        assert_eq!(voices.len(), 2);
        assert!(voices.iter().all(|t| close(t.volume, 0.5) && t.playing));

        voices.update(Duration::from_millis(50));
        assert!(voices.is_empty());
    }

    #[test]
    fn test_stop_all_keeps_running_fade() {
        let mut voices = Voices::new();
        voices.start(Tape::default());
        voices.stop_all(Duration::from_millis(100));
        voices.update(Duration::from_millis(50));

        // A second, longer fade does not restart the first
        voices.stop_all(Duration::from_secs(10));
        voices.update(Duration::from_millis(50));
        assert!(voices.is_empty());
    }

    #[test]
    fn test_stop_all_without_fade_is_immediate() {
        let mut voices = Voices::new();
        voices.start(Tape::default());
        voices.stop_all(Duration::ZERO);
        assert!(voices.is_empty());
    }

    #[test]
    fn test_update_drops_finished_voices() {
        let mut voices = Voices::new();
        voices.start(Tape {
            remaining: Some(0),
            ..Tape::default()
        });
        voices.start(Tape::default());
        voices.update(Duration::from_millis(16));
        assert_eq!(voices.len(), 1);
    }

    #[test]
    fn test_master_volume_skips_fading_voices() {
        let mut voices = Voices::new();
        voices.start(Tape::default());
        voices.stop_all(Duration::from_millis(100));
        voices.update(Duration::from_millis(50));
        voices.start(Tape::default());

        voices.set_master_volume(0.2);
        let volumes: Vec<f32> = voices.iter().map(|t| t.volume).collect();
        assert!(close(volumes[0], 0.5));
        assert!(close(volumes[1], 0.2));
        assert!(close(voices.master_volume(), 0.2));

        voices.set_master_volume(-1.0);
        assert_eq!(voices.master_volume(), 0.0);
    }

    #[test]
    fn test_pause_and_resume() {
        let mut voices = Voices::new();
        voices.start(Tape::default());
        voices.pause_all();
        assert_eq!(voices.audible(), 0);
        assert_eq!(voices.len(), 1);
        voices.resume_all();
        assert_eq!(voices.audible(), 1);
    }
}
