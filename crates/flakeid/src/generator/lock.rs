#[cfg(feature = "tracing")]
use tracing::instrument;

use super::mutex::{Mutex, lock};
use crate::{
    EntropySource, Flake, FlakeGenerator, FlakeLayout, Identity, MonotonicClock, OsEntropy,
    Result, TimeSource, advance_sequence, generator::seed_generator,
};

/// A lock-based flake generator suitable for multi-threaded environments.
///
/// The sequence counter sits behind one generator-wide [`Mutex`]
/// (`parking_lot` with the `parking-lot` feature, `std` otherwise). A
/// poisoned `std` mutex is recovered, so [`next_flake`] stays infallible.
///
/// ## Recommended When
/// - Fair access across threads is important
/// - Your target doesn't support 64-bit atomics
///
/// ## See Also
/// - [`AtomicFlakeGenerator`]
///
/// [`next_flake`]: Self::next_flake
/// [`AtomicFlakeGenerator`]: crate::AtomicFlakeGenerator
#[derive(Debug)]
pub struct LockFlakeGenerator<L, T = MonotonicClock>
where
    L: FlakeLayout,
    T: TimeSource,
{
    identity: Identity<L>,
    secondary_id: u64,
    #[cfg(feature = "cache-padded")]
    sequence: crossbeam_utils::CachePadded<Mutex<u64>>,
    #[cfg(not(feature = "cache-padded"))]
    sequence: Mutex<u64>,
    time: T,
}

impl<L> LockFlakeGenerator<L, MonotonicClock>
where
    L: FlakeLayout,
{
    /// Creates a generator using a [`MonotonicClock`] aligned to the
    /// layout's epoch and unit, with its sequence seeded from the operating
    /// system's CSPRNG.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntropyUnavailable`] if the operating system cannot
    /// provide randomness.
    ///
    /// [`Error::EntropyUnavailable`]: crate::Error::EntropyUnavailable
    pub fn new(identity: &[u8], secondary_id: u64) -> Result<Self> {
        Self::with_entropy(
            identity,
            secondary_id,
            MonotonicClock::for_layout::<L>(),
            &mut OsEntropy,
        )
    }
}

impl<L, T> LockFlakeGenerator<L, T>
where
    L: FlakeLayout,
    T: TimeSource,
{
    /// Creates a generator with an explicit time source, seeding the
    /// sequence from `entropy`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntropyUnavailable`] if `entropy` fails.
    ///
    /// [`Error::EntropyUnavailable`]: crate::Error::EntropyUnavailable
    pub fn with_entropy<R>(
        identity: &[u8],
        secondary_id: u64,
        time: T,
        entropy: &mut R,
    ) -> Result<Self>
    where
        R: EntropySource + ?Sized,
    {
        let seed = seed_generator::<L, R>(entropy)?;
        Ok(Self::from_components(
            Identity::new(identity),
            secondary_id,
            seed,
            time,
        ))
    }

    /// Creates a generator from explicit component values. `sequence` is
    /// reduced into the layout's sequence space.
    pub fn from_components(
        identity: Identity<L>,
        secondary_id: u64,
        sequence: u64,
        time: T,
    ) -> Self {
        let sequence = sequence % L::SEQUENCE_SPACE;
        Self {
            identity,
            secondary_id: secondary_id & L::SECONDARY_ID_MASK,
            #[cfg(feature = "cache-padded")]
            sequence: crossbeam_utils::CachePadded::new(Mutex::new(sequence)),
            #[cfg(not(feature = "cache-padded"))]
            sequence: Mutex::new(sequence),
            time,
        }
    }

    /// Generates the next flake.
    ///
    /// The clock is read before the lock is taken; only the counter update
    /// happens under the lock.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_flake(&self) -> Flake<L> {
        let now = self.time.current_ticks();
        let sequence = advance_sequence::<L>(&mut lock(&self.sequence));
        Flake::pack(now, sequence, self.secondary_id, self.identity)
    }

    /// The generator's normalized identity.
    pub const fn identity(&self) -> Identity<L> {
        self.identity
    }

    /// The generator's masked secondary ID.
    pub const fn secondary_id(&self) -> u64 {
        self.secondary_id
    }
}

impl<L, T> FlakeGenerator<L, T> for LockFlakeGenerator<L, T>
where
    L: FlakeLayout,
    T: TimeSource,
{
    fn with_entropy<R>(identity: &[u8], secondary_id: u64, time: T, entropy: &mut R) -> Result<Self>
    where
        R: EntropySource + ?Sized,
    {
        Self::with_entropy(identity, secondary_id, time, entropy)
    }

    fn from_components(identity: Identity<L>, secondary_id: u64, sequence: u64, time: T) -> Self {
        Self::from_components(identity, secondary_id, sequence, time)
    }

    fn next_flake(&self) -> Flake<L> {
        self.next_flake()
    }

    fn identity(&self) -> Identity<L> {
        self.identity()
    }

    fn secondary_id(&self) -> u64 {
        self.secondary_id()
    }
}
