//! Core trait for the variation operators.
//!
//! [`Reproduction`] is the seam between the generic
//! [`EvolutionEngine`](super::EvolutionEngine) and an encoding: the engine
//! owns sorting, selection and truncation, while an implementation decides
//! how two parents recombine and how a child mutates.

use super::config::NsgaConfig;
use crate::problem::ProblemInstance;
use crate::solution::Solution;
use rand::Rng;

/// Crossover and mutation for one solution encoding.
///
/// Implementations receive the problem and an explicit generator on every
/// call; they hold no random state of their own.
///
/// # Thread Safety
///
/// Must be `Send + Sync` so independent runs can share one engine across
/// worker threads.
pub trait Reproduction: Send + Sync {
    /// The encoding these operators work on.
    type Solution: Solution;

    /// Short name used in log output.
    const NAME: &'static str;

    /// Builds the operators from the run configuration.
    fn from_config(config: &NsgaConfig) -> Self;

    /// Recombines two parents into two fully evaluated children.
    ///
    /// Parents carry the rank and crowding distance from the latest sort.
    fn crossover<R: Rng>(
        &self,
        problem: &ProblemInstance,
        first: &Self::Solution,
        second: &Self::Solution,
        rng: &mut R,
    ) -> (Self::Solution, Self::Solution);

    /// Perturbs a child in place, leaving its cached evaluation consistent.
    fn mutate<R: Rng>(&self, problem: &ProblemInstance, solution: &mut Self::Solution, rng: &mut R);
}
