//! Time management for the simulation
//!
//! Simulated time is measured in integer tenths of a second. `Time` is an
//! absolute instant since the start of the run, `Duration` a relative span.
//! This module provides the monotonic clock the driver advances as it pops
//! tasks off the scheduler.

use serde::{Deserialize, Serialize};

/// Absolute simulated instant, in tenths of a second since start
pub type Time = i64;

/// Relative simulated span, in tenths of a second
pub type Duration = i64;

/// One simulated hour, the default run length
pub const ONE_HOUR: Time = 36_000;

/// Longest span a configured delay may cover: one simulated year
///
/// Every scheduled time is the firing time plus a delay, so bounding delays
/// keeps `now + delay` far from `i64::MAX` for any run that can finish.
pub const MAX_DELAY: Duration = 365 * 24 * ONE_HOUR;

/// Monotonic simulation clock
///
/// # Example
/// ```
/// use elevator_sim_core_rs::SimClock;
///
/// let mut clock = SimClock::new();
/// assert_eq!(clock.now(), 0);
///
/// clock.advance_to(152);
/// assert_eq!(clock.now(), 152);
/// assert_eq!(clock.seconds(), 15);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimClock {
    /// Time of the most recently processed task
    now: Time,
}

impl SimClock {
    /// Create a clock positioned at time zero
    pub fn new() -> Self {
        Self { now: 0 }
    }

    /// Move the clock forward to `when`
    ///
    /// Several tasks may fire at the same instant, so advancing to the
    /// current time is allowed.
    ///
    /// # Panics
    /// Panics if `when` lies in the past.
    ///
    /// # Example
    /// ```
    /// use elevator_sim_core_rs::SimClock;
    ///
    /// let mut clock = SimClock::new();
    /// clock.advance_to(96);
    /// clock.advance_to(96);
    /// assert_eq!(clock.now(), 96);
    /// ```
    pub fn advance_to(&mut self, when: Time) {
        assert!(
            when >= self.now,
            "simulation time cannot run backwards ({} -> {})",
            self.now,
            when
        );
        self.now = when;
    }

    /// Current simulated time
    pub fn now(&self) -> Time {
        self.now
    }

    /// Whole seconds elapsed
    pub fn seconds(&self) -> i64 {
        self.now / 10
    }
}

/// Render a duration as seconds with one decimal place
///
/// # Example
/// ```
/// use elevator_sim_core_rs::core::time::format_tenths;
///
/// assert_eq!(format_tenths(152), "15.2s");
/// assert_eq!(format_tenths(170), "17.0s");
/// ```
pub fn format_tenths(duration: Duration) -> String {
    format!("{}.{}s", duration / 10, duration % 10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "simulation time cannot run backwards")]
    fn test_clock_rejects_going_backwards() {
        let mut clock = SimClock::new();
        clock.advance_to(20);
        clock.advance_to(19);
    }

    #[test]
    fn test_format_sub_second() {
        assert_eq!(format_tenths(4), "0.4s");
    }
}
