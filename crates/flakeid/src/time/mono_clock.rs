use crate::{FLAKE_EPOCH, FlakeLayout, TimeSource, TimeUnit};
use core::time::Duration;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// A monotonic time source that returns elapsed time since construction,
/// offset from a user-defined epoch.
///
/// This avoids wall-clock adjustments (e.g., NTP corrections) while still
/// aligning timestamps to a fixed origin.
///
/// The wall clock is read exactly once, at construction, to compute the
/// distance to the epoch. Every later reading adds the time elapsed on an
/// [`Instant`], so the clock never goes backward.
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    start: Instant,
    epoch_offset: u64, // in ticks of `unit`
    unit: TimeUnit,
}

impl Default for MonotonicClock {
    /// Constructs a millisecond clock aligned to [`FLAKE_EPOCH`].
    fn default() -> Self {
        Self::with_epoch(FLAKE_EPOCH, TimeUnit::Millis)
    }
}

impl MonotonicClock {
    /// Constructs a monotonic clock using a custom epoch as the origin
    /// (t = 0), specified as a duration since the Unix epoch, counting in
    /// `unit` ticks.
    ///
    /// A system clock set before `epoch` yields an offset of zero rather than
    /// a panic.
    ///
    /// # Example
    ///
    /// ```
    /// use flakeid::{FLAKE_EPOCH, MonotonicClock, TimeSource, TimeUnit};
    ///
    /// let clock = MonotonicClock::with_epoch(FLAKE_EPOCH, TimeUnit::Micros);
    /// let a = clock.current_ticks();
    /// let b = clock.current_ticks();
    /// assert!(b >= a);
    /// ```
    pub fn with_epoch(epoch: Duration, unit: TimeUnit) -> Self {
        let start = Instant::now();
        let system_now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        let epoch_offset = unit.ticks(system_now.saturating_sub(epoch));

        Self {
            start,
            epoch_offset,
            unit,
        }
    }

    /// Constructs a clock matching the epoch and unit of layout `L`.
    pub fn for_layout<L: FlakeLayout>() -> Self {
        Self::with_epoch(L::EPOCH, L::UNIT)
    }

    /// The unit this clock counts in.
    pub const fn unit(&self) -> TimeUnit {
        self.unit
    }
}

impl TimeSource for MonotonicClock {
    fn current_ticks(&self) -> u64 {
        self.epoch_offset + self.unit.ticks(self.start.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_clock_tracks_wall_clock() {
        let clock = MonotonicClock::default();
        let wall = TimeUnit::Millis.ticks(
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .saturating_sub(FLAKE_EPOCH),
        );
        let ticks = clock.current_ticks();
        assert!(ticks.abs_diff(wall) <= 5, "ticks {ticks}, wall {wall}");
    }

    #[test]
    fn monotonic_clock_never_goes_backward() {
        let clock = MonotonicClock::with_epoch(FLAKE_EPOCH, TimeUnit::Micros);
        let mut last = clock.current_ticks();
        for _ in 0..10_000 {
            let now = clock.current_ticks();
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn epoch_in_the_future_saturates_to_zero() {
        let far_future = Duration::from_secs(u64::MAX / 2);
        let clock = MonotonicClock::with_epoch(far_future, TimeUnit::Millis);
        assert!(clock.current_ticks() < 1_000);
    }

    #[test]
    fn micros_clock_counts_a_thousand_times_faster() {
        let millis = MonotonicClock::with_epoch(FLAKE_EPOCH, TimeUnit::Millis);
        let micros = MonotonicClock::with_epoch(FLAKE_EPOCH, TimeUnit::Micros);
        let ms = millis.current_ticks();
        let us = micros.current_ticks();
        assert!((us / 1_000).abs_diff(ms) <= 5);
        assert_eq!(micros.unit(), TimeUnit::Micros);
    }
}
