use std::time::{Duration, Instant};

#[cfg(test)]
#[path = "timer_tests.rs"]
mod timer_tests;

/// Tracks the time that has passed since it was last reset.
///
/// The timer is driven by explicit [Instant] values so that callers, and tests, decide
/// what 'now' is.
#[derive(Clone, Copy, Debug, Default)]
pub struct Timer {
    /// The time of the last reset, `None` if the timer was never reset.
    reset_at: Option<Instant>,
}

impl Timer {
    /// Returns the time that has passed between the last reset and `now`. A timer that
    /// was never reset reports zero.
    pub fn elapsed_at(&self, now: Instant) -> Duration {
        match self.reset_at {
            Some(reset_at) => now.saturating_duration_since(reset_at),
            None => Duration::ZERO,
        }
    }

    /// Creates a timer that has not been started.
    pub fn new() -> Self {
        Self { reset_at: None }
    }

    /// Restarts the timer at `now`.
    pub fn reset_at(&mut self, now: Instant) {
        self.reset_at = Some(now);
    }
}
