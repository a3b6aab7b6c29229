//! Frame timing

use std::time::{Duration, Instant};

/// Frame delta and elapsed time
#[derive(Debug, Clone)]
pub struct Time {
    start: Instant,
    last_frame: Instant,
    delta: Duration,
    frame_count: u64,
}

impl Time {
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Start counting from a given instant
    #[must_use]
    pub fn starting_at(now: Instant) -> Self {
        Self {
            start: now,
            last_frame: now,
            delta: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Advance to a new frame at `now`
    pub fn update(&mut self, now: Instant) {
        self.delta = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        self.frame_count += 1;
    }

    /// Time between the last two frames
    #[must_use]
    pub const fn delta(&self) -> Duration {
        self.delta
    }

    #[must_use]
    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Time from the start to the last frame
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.last_frame.saturating_duration_since(self.start)
    }

    #[must_use]
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

/// Paces redraws to a maximum frame rate
#[derive(Debug, Clone)]
pub struct FrameLimiter {
    interval: Option<Duration>,
    next: Option<Instant>,
}

impl FrameLimiter {
    /// `None` means unlimited
    #[must_use]
    pub fn new(interval: Option<Duration>) -> Self {
        Self {
            interval,
            next: None,
        }
    }

    /// Whether a frame may be drawn at `now`; schedules the next one if so
    pub fn ready(&mut self, now: Instant) -> bool {
        let Some(interval) = self.interval else {
            return true;
        };
        match self.next {
            Some(next) if now < next => false,
            Some(next) => {
                // Stay on the grid unless we fell more than a frame behind
                let scheduled = next + interval;
                self.next = Some(if scheduled <= now { now + interval } else { scheduled });
                true
            }
            None => {
                self.next = Some(now + interval);
                true
            }
        }
    }

    /// When the next frame is due, if limited
    #[must_use]
    pub const fn next_frame(&self) -> Option<Instant> {
        self.next
    }

    /// Forget the schedule, the next call to `ready` passes
    pub fn reset(&mut self) {
        self.next = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_update() {
        let start = Instant::now();
        let mut time = Time::starting_at(start);
        time.update(start + Duration::from_millis(16));
        time.update(start + Duration::from_millis(40));
        assert_eq!(time.delta(), Duration::from_millis(24));
        assert_eq!(time.elapsed(), Duration::from_millis(40));
        assert_eq!(time.frame_count(), 2);
    }

    #[test]
    fn test_unlimited_limiter_always_ready() {
        let mut limiter = FrameLimiter::new(None);
        let now = Instant::now();
        assert!(limiter.ready(now));
        assert!(limiter.ready(now));
        assert_eq!(limiter.next_frame(), None);
    }

    #[test]
    fn test_limiter_paces_frames() {
        let interval = Duration::from_millis(10);
        let mut limiter = FrameLimiter::new(Some(interval));
        let start = Instant::now();
        assert!(limiter.ready(start));
        assert!(!limiter.ready(start + Duration::from_millis(5)));
        assert!(limiter.ready(start + Duration::from_millis(10)));
        assert_eq!(limiter.next_frame(), Some(start + Duration::from_millis(20)));
    }

    #[test]
    fn test_limiter_resyncs_after_stall() {
        let interval = Duration::from_millis(10);
        let mut limiter = FrameLimiter::new(Some(interval));
        let start = Instant::now();
        assert!(limiter.ready(start));
        assert!(limiter.ready(start + Duration::from_millis(100)));
        assert_eq!(limiter.next_frame(), Some(start + Duration::from_millis(110)));
        limiter.reset();
        assert!(limiter.ready(start + Duration::from_millis(101)));
    }
}
