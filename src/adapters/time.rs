//! Host clock adapter.
//!
//! Provides monotonic time for the console loop.  The simulation itself
//! runs on elapsed milliseconds fed into the runtime, so tests never touch
//! the wall clock.

use std::time::Instant;

/// Monotonic clock measuring time since construction.
pub struct MonotonicClock {
    start: Instant,
    last_ms: u64,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            last_ms: 0,
        }
    }

    /// Milliseconds since start (monotonic).
    pub fn uptime_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    /// Seconds since start (monotonic).
    pub fn uptime_secs(&self) -> u64 {
        self.start.elapsed().as_secs()
    }

    /// Milliseconds elapsed since the previous call (or since start).
    pub fn lap_ms(&mut self) -> u64 {
        let now = self.uptime_ms();
        let lap = now.saturating_sub(self.last_ms);
        self.last_ms = now;
        lap
    }
}
