use crate::{FLAKE_EPOCH, FlakeLayout, TimeSource, TimeUnit};
use core::time::Duration;
use std::time::{SystemTime, UNIX_EPOCH};

/// A wall-clock time source that reads [`SystemTime`] on every call.
///
/// Unlike [`MonotonicClock`], readings follow system clock adjustments and
/// can move backward.
///
/// [`MonotonicClock`]: crate::MonotonicClock
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SystemClock {
    epoch: Duration,
    unit: TimeUnit,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::with_epoch(FLAKE_EPOCH, TimeUnit::Millis)
    }
}

impl SystemClock {
    /// Constructs a clock counting `unit` ticks since `epoch`, a duration
    /// since the Unix epoch.
    pub const fn with_epoch(epoch: Duration, unit: TimeUnit) -> Self {
        Self { epoch, unit }
    }

    /// Constructs a clock matching the epoch and unit of layout `L`.
    pub const fn for_layout<L: FlakeLayout>() -> Self {
        Self::with_epoch(L::EPOCH, L::UNIT)
    }
}

impl TimeSource for SystemClock {
    fn current_ticks(&self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        self.unit.ticks(now.saturating_sub(self.epoch))
    }
}
