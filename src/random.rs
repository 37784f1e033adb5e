//! Seeded random number generation.
//!
//! Every search run owns exactly one generator, created here and threaded
//! through each operator as `&mut R`. Nothing in the crate reads a global
//! or thread-local generator during a run.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates a deterministic generator from a seed.
///
/// The same seed and the same [`ProblemInstance`](crate::problem::ProblemInstance)
/// reproduce the same sequence of populations.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
