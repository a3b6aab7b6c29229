//! Tagged stopwatches

use std::hash::Hash;
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;

/// Stopwatches keyed by tag; use `Timer<()>` for a single one
///
/// This is not an actor.
#[derive(Debug, Clone)]
pub struct Timer<K = ()> {
    marks: FxHashMap<K, Instant>,
}

impl<K> Default for Timer<K> {
    fn default() -> Self {
        Self {
            marks: FxHashMap::default(),
        }
    }
}

impl<K: Eq + Hash> Timer<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start, or restart, the stopwatch under `tag`
    pub fn mark(&mut self, tag: K) {
        self.mark_at(tag, Instant::now());
    }

    pub fn mark_at(&mut self, tag: K, now: Instant) {
        self.marks.insert(tag, now);
    }

    /// Time since `tag` was marked; `None` for unknown tags
    #[must_use]
    pub fn elapsed(&self, tag: &K) -> Option<Duration> {
        self.elapsed_at(tag, Instant::now())
    }

    #[must_use]
    pub fn elapsed_at(&self, tag: &K, now: Instant) -> Option<Duration> {
        self.marks
            .get(tag)
            .map(|&start| now.saturating_duration_since(start))
    }

    /// [`Timer::elapsed`] in nanoseconds
    #[must_use]
    pub fn elapsed_ns(&self, tag: &K) -> Option<u128> {
        self.elapsed(tag).map(|elapsed| elapsed.as_nanos())
    }

    /// Forget a tag; returns whether it was marked
    pub fn remove(&mut self, tag: &K) -> bool {
        self.marks.remove(tag).is_some()
    }

    #[must_use]
    pub fn contains(&self, tag: &K) -> bool {
        self.marks.contains_key(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_tag() {
        let timer: Timer<&str> = Timer::new();
        assert_eq!(timer.elapsed(&"spawn"), None);
        assert_eq!(timer.elapsed_ns(&"spawn"), None);
    }

    #[test]
    fn test_mark_and_restart() {
        let start = Instant::now();
        let mut timer = Timer::new();
        timer.mark_at("spawn", start);
        let later = start + Duration::from_millis(250);
        assert_eq!(timer.elapsed_at(&"spawn", later), Some(Duration::from_millis(250)));

        timer.mark_at("spawn", later);
        assert_eq!(timer.elapsed_at(&"spawn", later), Some(Duration::ZERO));
        assert!(timer.remove(&"spawn"));
        assert!(!timer.contains(&"spawn"));
    }

    #[test]
    fn test_untagged_timer() {
        let mut timer: Timer = Timer::new();
        timer.mark(());
        assert!(timer.elapsed_ns(&()).is_some());
    }
}
