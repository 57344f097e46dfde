/// A result type defaulting to this crate's [`Error`].
///
/// Only generator construction is fallible. Packing, unpacking and
/// [`next_flake`] never return an error.
///
/// [`next_flake`]: crate::FlakeGenerator::next_flake
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `flakeid` can emit.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The entropy source failed to produce a sequence seed.
    ///
    /// Raised only while constructing a generator, and no generator is
    /// returned. A zero-seeded sequence would let generators that share an
    /// identity collide right after start-up. The payload is the source's own
    /// error message.
    #[error("entropy source unavailable: {0}")]
    EntropyUnavailable(String),
}
