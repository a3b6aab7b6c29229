//! Frame statistics

use std::collections::VecDeque;
use std::time::Duration;

/// Frame statistics tracker
#[derive(Debug)]
pub struct FrameStats {
    /// Frame time history for averaging
    frame_times: VecDeque<Duration>,
    /// Maximum samples to keep
    max_samples: usize,
    fps: f32,
    avg_frame_time_ms: f32,
    min_frame_time_ms: f32,
    max_frame_time_ms: f32,
    /// Total frames recorded
    total_frames: u64,
    /// Act cycles run so far
    total_acts: u64,
}

impl FrameStats {
    #[must_use]
    pub fn new() -> Self {
        Self::with_samples(120)
    }

    /// Keep at most `max_samples` frame times for averaging
    #[must_use]
    pub fn with_samples(max_samples: usize) -> Self {
        let max_samples = max_samples.max(1);
        Self {
            frame_times: VecDeque::with_capacity(max_samples),
            max_samples,
            fps: 0.0,
            avg_frame_time_ms: 0.0,
            min_frame_time_ms: 0.0,
            max_frame_time_ms: 0.0,
            total_frames: 0,
            total_acts: 0,
        }
    }

    /// Record a frame with the given delta time
    pub fn record_frame(&mut self, delta: Duration) {
        self.total_frames += 1;

        if self.frame_times.len() >= self.max_samples {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(delta);

        self.update_stats();
    }

    /// Count one act cycle
    pub fn record_act(&mut self) {
        self.total_acts += 1;
    }

    fn update_stats(&mut self) {
        if self.frame_times.is_empty() {
            return;
        }

        let mut total = Duration::ZERO;
        let mut min = Duration::MAX;
        let mut max = Duration::ZERO;

        for &dt in &self.frame_times {
            total += dt;
            min = min.min(dt);
            max = max.max(dt);
        }

        let count = self.frame_times.len() as f32;
        let total_secs = total.as_secs_f32();

        // Guard against division by zero
        if total_secs > 0.0 {
            self.avg_frame_time_ms = (total_secs / count) * 1000.0;
            self.fps = count / total_secs;
        } else {
            self.avg_frame_time_ms = 0.0;
            self.fps = 0.0;
        }

        self.min_frame_time_ms = min.as_secs_f32() * 1000.0;
        self.max_frame_time_ms = max.as_secs_f32() * 1000.0;
    }

    #[must_use]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    #[must_use]
    pub fn avg_frame_time_ms(&self) -> f32 {
        self.avg_frame_time_ms
    }

    #[must_use]
    pub fn min_frame_time_ms(&self) -> f32 {
        self.min_frame_time_ms
    }

    #[must_use]
    pub fn max_frame_time_ms(&self) -> f32 {
        self.max_frame_time_ms
    }

    #[must_use]
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    #[must_use]
    pub fn total_acts(&self) -> u64 {
        self.total_acts
    }

    /// One-line summary for the log
    #[must_use]
    pub fn format_stats(&self) -> String {
        format!(
            "FPS: {:.1} | Frame: {:.2}ms (min: {:.2}, max: {:.2}) | Acts: {}",
            self.fps,
            self.avg_frame_time_ms,
            self.min_frame_time_ms,
            self.max_frame_time_ms,
            self.total_acts
        )
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Periodic statistics reporting
#[derive(Debug, Default)]
pub struct DebugInfo {
    /// Log statistics once per report interval
    pub enabled: bool,
    pub frame_stats: FrameStats,
    since_report: Duration,
}

impl DebugInfo {
    const REPORT_INTERVAL: Duration = Duration::from_secs(1);

    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            frame_stats: FrameStats::new(),
            since_report: Duration::ZERO,
        }
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }

    /// Record a frame; returns the stats line when a report is due
    pub fn record_frame(&mut self, delta: Duration) -> Option<String> {
        self.frame_stats.record_frame(delta);
        if !self.enabled {
            return None;
        }
        self.since_report += delta;
        if self.since_report < Self::REPORT_INTERVAL {
            return None;
        }
        self.since_report = Duration::ZERO;
        let line = self.frame_stats.format_stats();
        log::info!("{line}");
        Some(line)
    }
}
