//! Capacity repair.
//!
//! A bounded local search that moves units off CPU- or memory-overloaded
//! hosts. Network capacity is not considered. Repair is best-effort: running
//! out of attempts with violations left is a normal outcome, scored later by
//! constrained dominance.

use crate::problem::ProblemInstance;
use crate::solution::Solution;
use log::trace;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;

/// Summary of one repair call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RepairOutcome {
    /// Loop iterations consumed.
    pub attempts: usize,
    /// Units actually relocated.
    pub relocations: usize,
    /// Whether no host is left over its CPU or memory capacity.
    pub resolved: bool,
}

/// Bounded relocation search for CPU/memory overloads.
///
/// # Algorithm
///
/// While some host is overloaded and attempts remain:
///
/// 1. Pick a uniformly random overloaded host
/// 2. If it holds no units, forget it
/// 3. Otherwise pick a random unit on it and try every other host in random
///    order, moving the unit to the first one with enough residual CPU and
///    memory
/// 4. Forget the source host once it fits again
///
/// # Examples
///
/// ```
/// use u_placement::nsga::Repair;
///
/// let repair = Repair::new(50);
/// assert_eq!(repair.max_attempts(), 50);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Repair {
    max_attempts: usize,
}

impl Default for Repair {
    fn default() -> Self {
        Self::new(50)
    }
}

impl Repair {
    /// Creates a repair operator capped at `max_attempts` iterations.
    pub fn new(max_attempts: usize) -> Self {
        Self { max_attempts }
    }

    /// Iteration cap.
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Repairs `solution` in place.
    ///
    /// Always finishes by refreshing the solution's constraint status.
    pub fn apply<S: Solution, R: Rng>(
        &self,
        problem: &ProblemInstance,
        solution: &mut S,
        rng: &mut R,
    ) -> RepairOutcome {
        let n_hosts = problem.num_hosts();
        let mut overloaded: Vec<usize> = (0..n_hosts)
            .filter(|&h| solution.evaluation().is_overloaded(problem, h))
            .collect();

        let mut outcome = RepairOutcome::default();
        let mut targets: Vec<usize> = (0..n_hosts).collect();

        while !overloaded.is_empty() && outcome.attempts < self.max_attempts {
            outcome.attempts += 1;

            let slot = rng.random_range(0..overloaded.len());
            let source = overloaded[slot];

            let Some(&unit) = solution.groups()[source].choose(rng) else {
                overloaded.swap_remove(slot);
                continue;
            };

            targets.shuffle(rng);
            let target = targets.iter().copied().find(|&t| {
                let (cpu, mem) = solution.evaluation().residual(problem, t);
                t != source && problem.fits(unit, cpu, mem)
            });

            if let Some(target) = target {
                solution.evaluate_delta(problem, unit, target);
                outcome.relocations += 1;
                if !solution.evaluation().is_overloaded(problem, source) {
                    overloaded.swap_remove(slot);
                }
            }
        }

        solution.update_constraint_status();
        outcome.resolved = (0..n_hosts).all(|h| !solution.evaluation().is_overloaded(problem, h));

        trace!(
            "repair: {} attempts, {} relocations, resolved={}, violation={:.3}",
            outcome.attempts,
            outcome.relocations,
            outcome.resolved,
            solution.total_violation()
        );
        outcome
    }
}
