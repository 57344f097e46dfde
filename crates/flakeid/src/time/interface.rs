use core::time::Duration;

/// Flake epoch: Friday, January 1, 2016 00:00:00 UTC
pub const FLAKE_EPOCH: Duration = Duration::from_secs(1_451_606_400);

/// Resolution of a layout's timestamp field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    /// One tick per millisecond.
    Millis,
    /// One tick per microsecond.
    Micros,
}

impl TimeUnit {
    /// Converts a duration into whole ticks of this unit, truncating any
    /// remainder.
    pub const fn ticks(self, duration: Duration) -> u64 {
        match self {
            Self::Millis => duration.as_millis() as u64,
            Self::Micros => duration.as_micros() as u64,
        }
    }

    /// Converts a tick count of this unit back into a duration.
    pub const fn duration(self, ticks: u64) -> Duration {
        match self {
            Self::Millis => Duration::from_millis(ticks),
            Self::Micros => Duration::from_micros(ticks),
        }
    }
}

/// A trait for time sources that return a monotonic or wall-clock timestamp.
///
/// This abstraction allows you to plug in a real system clock, a monotonic
/// timer, or a mocked time source in tests.
///
/// The returned value is the number of ticks elapsed since the source's
/// configured epoch. The generator reading the source packs it as-is, so the
/// unit and epoch must match the layout being generated (see
/// [`MonotonicClock::for_layout`]).
///
/// # Example
///
/// ```
/// use flakeid::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_ticks(&self) -> u64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_ticks(), 1234);
/// ```
///
/// [`MonotonicClock::for_layout`]: crate::MonotonicClock::for_layout
pub trait TimeSource {
    /// Returns the current time in ticks since the configured epoch.
    fn current_ticks(&self) -> u64;
}
