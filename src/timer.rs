use std::time::{Duration, Instant};

/// Single-shot stopwatch for one case.
///
/// The start instant may lie in the future (armed with a settle delay);
/// readings before that point are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stopwatch {
    started_at: Option<Instant>,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    /// Starts timing `settle` after `now`. No-op while already running.
    pub fn start(&mut self, now: Instant, settle: Duration) -> bool {
        if self.started_at.is_some() {
            return false;
        }
        self.started_at = Some(now + settle);
        true
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        self.started_at
            .map(|start| now.saturating_duration_since(start))
            .unwrap_or_default()
    }

    /// Returns the elapsed time and clears the stopwatch.
    pub fn stop(&mut self, now: Instant) -> Duration {
        let elapsed = self.elapsed(now);
        self.started_at = None;
        elapsed
    }

    pub fn clear(&mut self) {
        self.started_at = None;
    }
}

/// Seconds rounded to millisecond precision.
pub fn round_millis(d: Duration) -> f64 {
    (d.as_secs_f64() * 1000.0).round() / 1000.0
}
