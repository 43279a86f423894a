use std::path::Path;
use std::time::SystemTime;

/// Seconds of tick time between two modification-time checks.
pub const POLL_INTERVAL_SECS: f32 = 1.0;

/// Last-modified time of `path`, or `None` when the file is missing or cannot
/// be inspected. `None` never equals a real timestamp, so a vanished file
/// always reads as changed.
pub fn modified_timestamp(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path)
        .and_then(|metadata| metadata.modified())
        .ok()
}

/// Accumulates tick time and fires once per [`POLL_INTERVAL_SECS`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PollTimer {
    elapsed: f32,
}

impl PollTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accumulate(&mut self, seconds: f32) {
        if seconds.is_finite() && seconds > 0.0 {
            self.elapsed += seconds;
        }
    }

    pub fn is_due(&self) -> bool {
        self.elapsed >= POLL_INTERVAL_SECS
    }

    /// Returns true (and restarts the interval) once enough time has passed.
    pub fn take_due(&mut self) -> bool {
        if self.is_due() {
            self.elapsed = 0.0;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}
