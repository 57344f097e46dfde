use crate::{EntropySource, Flake, FlakeLayout, Identity, Result, TimeSource};

/// A minimal interface for generating flakes.
///
/// Implementations share one sequence counter between all callers, so a
/// generator can be used from many threads through `&self`.
pub trait FlakeGenerator<L, T>
where
    L: FlakeLayout,
    T: TimeSource,
{
    /// Creates a generator whose sequence is seeded from `entropy`.
    ///
    /// `identity` is normalized to `L::IDENTITY_BYTES` bytes and
    /// `secondary_id` is masked to `L::SECONDARY_ID_BITS` bits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntropyUnavailable`] if `entropy` fails. No generator
    /// is created in that case.
    ///
    /// [`Error::EntropyUnavailable`]: crate::Error::EntropyUnavailable
    fn with_entropy<R>(identity: &[u8], secondary_id: u64, time: T, entropy: &mut R) -> Result<Self>
    where
        Self: Sized,
        R: EntropySource + ?Sized;

    /// Creates a generator from explicit component values, starting the raw
    /// sequence counter at `sequence`.
    fn from_components(identity: Identity<L>, secondary_id: u64, sequence: u64, time: T) -> Self
    where
        Self: Sized;

    /// Generates the next flake. Never blocks on I/O and never fails.
    fn next_flake(&self) -> Flake<L>;

    /// The generator's normalized identity.
    fn identity(&self) -> Identity<L>;

    /// The generator's masked secondary ID.
    fn secondary_id(&self) -> u64;
}
