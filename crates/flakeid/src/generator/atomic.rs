#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    AtomicSequence, EntropySource, Flake, FlakeGenerator, FlakeLayout, Identity, MicrosLayout,
    MonotonicClock, NarrowSidLayout, OsEntropy, Result, TimeSource, WideSidLayout,
    generator::seed_generator,
};

/// A lock-free flake generator suitable for multi-threaded environments.
///
/// The sequence counter lives in an [`AtomicU64`], so each call to
/// [`next_flake`] costs one clock read, one atomic increment and the bit
/// packing. Identity and secondary ID are fixed at construction and need no
/// synchronization.
///
/// ## Capacity
/// At most `L::SEQUENCE_SPACE` flakes can be minted per tick. Past that the
/// sequence repeats within the same timestamp and flakes collide; this is
/// not detected.
///
/// ## Ordering
/// Flakes from one thread sort in creation order. Across threads, the clock
/// read and the counter increment are not ordered with each other, so a
/// thread may pair a slightly older timestamp with a newer sequence value.
///
/// ## See Also
/// - [`LockFlakeGenerator`]
///
/// [`AtomicU64`]: portable_atomic::AtomicU64
/// [`next_flake`]: Self::next_flake
/// [`LockFlakeGenerator`]: crate::LockFlakeGenerator
#[derive(Debug)]
pub struct AtomicFlakeGenerator<L, T = MonotonicClock>
where
    L: FlakeLayout,
    T: TimeSource,
{
    identity: Identity<L>,
    secondary_id: u64,
    sequence: AtomicSequence,
    time: T,
}

/// A lock-free generator for [`WideSidLayout`] flakes.
pub type WideSidGenerator<T = MonotonicClock> = AtomicFlakeGenerator<WideSidLayout, T>;

/// A lock-free generator for [`NarrowSidLayout`] flakes.
pub type NarrowSidGenerator<T = MonotonicClock> = AtomicFlakeGenerator<NarrowSidLayout, T>;

/// A lock-free generator for [`MicrosLayout`] flakes.
pub type MicrosGenerator<T = MonotonicClock> = AtomicFlakeGenerator<MicrosLayout, T>;

impl<L> AtomicFlakeGenerator<L, MonotonicClock>
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
    /// # Example
    /// ```
    /// use flakeid::WideSidGenerator;
    ///
    /// let generator = WideSidGenerator::new(b"hello12", 1211)?;
    /// let a = generator.next_flake();
    /// let b = generator.next_flake();
    /// assert_ne!(a, b);
    /// # Ok::<(), flakeid::Error>(())
    /// ```
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

impl<L, T> AtomicFlakeGenerator<L, T>
where
    L: FlakeLayout,
    T: TimeSource,
{
    /// Creates a generator with an explicit time source, seeding the
    /// sequence uniformly from `[0, 2^S)` with one draw from `entropy`.
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

    /// Creates a generator from explicit component values.
    ///
    /// This constructor is primarily useful for tests and for callers that
    /// pick the starting sequence themselves. `secondary_id` is still masked
    /// to the layout's field width, and `sequence` is reduced into the
    /// layout's sequence space.
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
            sequence: AtomicSequence::new(sequence),
            time,
        }
    }

    /// Generates the next flake.
    ///
    /// Reads the clock, advances the sequence by one atomic increment and
    /// packs the result. Never blocks and never fails.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_flake(&self) -> Flake<L> {
        let now = self.time.current_ticks();
        let sequence = self.sequence.advance::<L>();
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

impl<L, T> FlakeGenerator<L, T> for AtomicFlakeGenerator<L, T>
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
