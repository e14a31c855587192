#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};

/// Monotonic frame clock.
///
/// The first [`tick`](Self::tick) measures from construction, every later one
/// from the previous tick.
#[derive(Debug, Clone)]
pub struct Timer {
    origin: Instant,
    previous: Instant,
    last_delta: Duration,
    ticks: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    #[must_use]
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            origin: now,
            previous: now,
            last_delta: Duration::ZERO,
            ticks: 0,
        }
    }

    /// Samples the clock and returns seconds since the previous tick.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        // Instant is monotonic, but saturate anyway so dt can never go negative.
        self.last_delta = now.saturating_duration_since(self.previous);
        self.previous = now;
        self.ticks += 1;
        self.last_delta.as_secs_f32()
    }

    #[must_use]
    pub fn last_delta(&self) -> Duration {
        self.last_delta
    }

    /// Time from construction to the latest tick.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.previous.saturating_duration_since(self.origin)
    }

    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
