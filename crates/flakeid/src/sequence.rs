use crate::{EntropySource, FlakeLayout, Result};
use portable_atomic::{AtomicU64, Ordering};

/// How a generator reduces its raw counter into the sequence field.
///
/// A layout picks exactly one policy; generators never mix them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SequencePolicy {
    /// `raw % (2^S - 1)`: cycles through `[0, 2^S - 2]`.
    ///
    /// The top code point is never produced. Use this only for bit
    /// compatibility with flakes minted by existing modulo-based generators.
    Modulo,
    /// Full range `2^S`: the counter is masked, and the caller that sees it
    /// reach `2^S` pulls it back down by `2^S` with a second atomic update.
    Wrapping,
}

impl SequencePolicy {
    /// Number of distinct sequence values produced for a field of `bits`
    /// bits.
    pub const fn space(self, bits: u32) -> u64 {
        let full = 1 << bits;
        match self {
            Self::Modulo => full - 1,
            Self::Wrapping => full,
        }
    }

    /// Reduces a raw counter value into the sequence field.
    #[inline]
    pub const fn reduce(self, raw: u64, bits: u32) -> u64 {
        match self {
            Self::Modulo => raw % self.space(bits),
            Self::Wrapping => raw & (self.space(bits) - 1),
        }
    }
}

/// Draws a sequence seed uniformly from `[0, 2^S)`.
///
/// The entropy source is read exactly once. `2^S` is a power of two, so
/// masking a uniform `u64` keeps the draw uniform.
///
/// # Errors
///
/// Returns [`Error::EntropyUnavailable`] if the source fails.
///
/// [`Error::EntropyUnavailable`]: crate::Error::EntropyUnavailable
pub fn seed_sequence<L, R>(entropy: &mut R) -> Result<u64>
where
    L: FlakeLayout,
    R: EntropySource + ?Sized,
{
    Ok(entropy.try_next_seed()? & L::SEQUENCE_MASK)
}

/// Advances a plain counter by one and returns the reduced sequence value.
///
/// This is the single-owner counterpart of [`AtomicSequence::advance`], used
/// behind a lock.
#[inline]
pub fn advance_sequence<L: FlakeLayout>(counter: &mut u64) -> u64 {
    let raw = counter.wrapping_add(1);
    *counter = match L::SEQUENCE_POLICY {
        SequencePolicy::Wrapping if raw >= L::SEQUENCE_SPACE => raw - L::SEQUENCE_SPACE,
        _ => raw,
    };
    L::SEQUENCE_POLICY.reduce(raw, L::SEQUENCE_BITS)
}

/// A sequence counter shared between threads.
///
/// Every call to [`advance`](Self::advance) performs one atomic
/// read-modify-write, so concurrent callers always observe distinct raw
/// values.
#[derive(Debug)]
pub struct AtomicSequence {
    #[cfg(feature = "cache-padded")]
    raw: crossbeam_utils::CachePadded<AtomicU64>,
    #[cfg(not(feature = "cache-padded"))]
    raw: AtomicU64,
}

impl AtomicSequence {
    /// Creates a counter starting at `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            #[cfg(feature = "cache-padded")]
            raw: crossbeam_utils::CachePadded::new(AtomicU64::new(seed)),
            #[cfg(not(feature = "cache-padded"))]
            raw: AtomicU64::new(seed),
        }
    }

    /// Increments the counter and returns the reduced sequence value for
    /// layout `L`.
    ///
    /// Under [`SequencePolicy::Wrapping`], the one caller whose increment
    /// lands exactly on `2^S` subtracts `2^S` again. Subtracting a multiple
    /// of the sequence space leaves every residue unchanged, so concurrent
    /// callers still receive consecutive values, and the counter stays within
    /// `2^S` plus the number of in-flight callers.
    ///
    /// Under [`SequencePolicy::Modulo`] the counter is never pulled back. A
    /// counter wrapping at `2^64` shortens that one cycle, since `2^64` is not
    /// a multiple of `2^S - 1`; values stay distinct within the cycle. Seed
    /// with a value below `L::SEQUENCE_SPACE` to keep that point out of reach.
    #[inline]
    pub fn advance<L: FlakeLayout>(&self) -> u64 {
        let raw = self.raw.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
        if matches!(L::SEQUENCE_POLICY, SequencePolicy::Wrapping) && raw == L::SEQUENCE_SPACE {
            self.raw.fetch_sub(L::SEQUENCE_SPACE, Ordering::Relaxed);
        }
        L::SEQUENCE_POLICY.reduce(raw, L::SEQUENCE_BITS)
    }

    /// Returns the current raw counter value.
    pub fn load(&self) -> u64 {
        self.raw.load(Ordering::Relaxed)
    }
}
