use crate::{Error, Result};
use rand::{TryRngCore, rngs::OsRng};
#[cfg(feature = "tracing")]
use tracing::error;

/// A fallible source of random seeds.
///
/// Generators read an entropy source once, at construction, to pick the
/// starting point of their sequence counter. The source is passed in rather
/// than held globally, so tests can inject a deterministic one.
///
/// Every [`rand::TryRngCore`] (and therefore every [`rand::RngCore`]) is an
/// entropy source.
///
/// # Example
///
/// ```
/// use flakeid::{EntropySource, OsEntropy};
///
/// let seed = OsEntropy.try_next_seed().unwrap();
/// # let _ = seed;
/// ```
pub trait EntropySource {
    /// Returns a uniformly random `u64`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntropyUnavailable`] if no randomness could be read.
    fn try_next_seed(&mut self) -> Result<u64>;
}

impl<R> EntropySource for R
where
    R: TryRngCore + ?Sized,
{
    fn try_next_seed(&mut self) -> Result<u64> {
        self.try_next_u64()
            .map_err(|e| Error::EntropyUnavailable(e.to_string()))
    }
}

/// The operating system's cryptographically secure random source.
///
/// This is the entropy source used by the generators' `new` constructors.
#[derive(Default, Clone, Copy, Debug)]
pub struct OsEntropy;

impl TryRngCore for OsEntropy {
    type Error = rand::rand_core::OsError;

    fn try_next_u32(&mut self) -> core::result::Result<u32, Self::Error> {
        OsRng.try_next_u32().inspect_err(log_os_failure)
    }

    fn try_next_u64(&mut self) -> core::result::Result<u64, Self::Error> {
        OsRng.try_next_u64().inspect_err(log_os_failure)
    }

    fn try_fill_bytes(&mut self, dst: &mut [u8]) -> core::result::Result<(), Self::Error> {
        OsRng.try_fill_bytes(dst).inspect_err(log_os_failure)
    }
}

#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn log_os_failure(err: &rand::rand_core::OsError) {
    #[cfg(feature = "tracing")]
    error!(%err, "operating system entropy source failed");
}
