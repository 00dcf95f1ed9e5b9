// Wall-clock timer for the control loop's dt

use std::time::Instant;

/// Measures the interval between a `begin` and an `end` mark
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
    end: Instant,
}

impl Timer {
    /// Create a timer with both marks set to now
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            end: now,
        }
    }

    pub fn begin(&mut self) {
        self.start = Instant::now();
    }

    pub fn end(&mut self) {
        self.end = Instant::now();
    }

    /// Seconds between the last `begin` and the last `end`
    ///
    /// Returns 0.0 if `end` was not called since `begin`.
    pub fn elapsed(&self) -> f64 {
        self.end.saturating_duration_since(self.start).as_secs_f64()
    }

    /// End the current interval, read it, and start the next one
    pub fn lap(&mut self) -> f64 {
        self.end();
        let dt = self.elapsed();
        self.begin();
        dt
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
