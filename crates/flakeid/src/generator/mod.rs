mod atomic;
mod interface;
mod lock;
mod mutex;

pub use atomic::*;
pub use interface::*;
pub use lock::*;

use crate::{EntropySource, FlakeLayout, Result, seed_sequence};
#[cfg(feature = "tracing")]
use tracing::{debug, error};

/// Seeds a new generator's sequence, logging the outcome.
fn seed_generator<L, R>(entropy: &mut R) -> Result<u64>
where
    L: FlakeLayout,
    R: EntropySource + ?Sized,
{
    let seed = seed_sequence::<L, R>(entropy);
    #[cfg(feature = "tracing")]
    match &seed {
        Ok(seed) => debug!(layout = L::name(), seed, "seeded flake generator"),
        Err(err) => error!(layout = L::name(), %err, "cannot seed flake generator"),
    }
    seed
}
