//! Operators for the direct (unit → host) encoding.

use super::config::NsgaConfig;
use super::repair::Repair;
use super::types::Reproduction;
use crate::problem::ProblemInstance;
use crate::solution::{ClassicSolution, Solution};
use rand::Rng;

/// Biased-uniform crossover and per-gene random mutation.
///
/// # Crossover
///
/// The parent with the smaller rank (or, on equal rank, the strictly larger
/// crowding distance) is the better one; on a full tie the first parent
/// is. For every gene and every child independently, the gene comes from
/// the better parent with probability `bias` and from the other otherwise.
///
/// # Mutation
///
/// Each gene moves, with probability 1/N_V, to a uniformly random different
/// host. If anything moved and the result is infeasible, [`Repair`] runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassicOperators {
    bias: f64,
    repair: Repair,
}

impl ClassicOperators {
    /// Creates operators with an explicit bias and repair budget.
    pub fn new(bias: f64, repair: Repair) -> Self {
        Self {
            bias: bias.clamp(0.0, 1.0),
            repair,
        }
    }

    /// Probability of taking a gene from the better parent.
    pub fn bias(&self) -> f64 {
        self.bias
    }
}

/// Whether `b` beats `a` under the crowded-comparison order.
fn crowded_better<S: Solution>(a: &S, b: &S) -> bool {
    let (fa, fb) = (a.nsga(), b.nsga());
    let rank_a = fa.rank.unwrap_or(usize::MAX);
    let rank_b = fb.rank.unwrap_or(usize::MAX);
    rank_b < rank_a || (rank_b == rank_a && fb.crowding_distance > fa.crowding_distance)
}

/// Uniform draw over every host except `current`.
fn other_host<R: Rng>(current: usize, n_hosts: usize, rng: &mut R) -> usize {
    let host = rng.random_range(0..n_hosts - 1);
    if host >= current {
        host + 1
    } else {
        host
    }
}

impl Reproduction for ClassicOperators {
    type Solution = ClassicSolution;

    const NAME: &'static str = "classic";

    fn from_config(config: &NsgaConfig) -> Self {
        Self::new(config.crossover_bias, Repair::new(config.repair_attempts))
    }

    fn crossover<R: Rng>(
        &self,
        problem: &ProblemInstance,
        first: &ClassicSolution,
        second: &ClassicSolution,
        rng: &mut R,
    ) -> (ClassicSolution, ClassicSolution) {
        let (better, worse) = if crowded_better(first, second) {
            (second.assignment(), first.assignment())
        } else {
            (first.assignment(), second.assignment())
        };

        let n = problem.num_units();
        let mut genes_a = Vec::with_capacity(n);
        let mut genes_b = Vec::with_capacity(n);
        for unit in 0..n {
            genes_a.push(if rng.random_bool(self.bias) {
                better[unit]
            } else {
                worse[unit]
            });
            genes_b.push(if rng.random_bool(self.bias) {
                better[unit]
            } else {
                worse[unit]
            });
        }

        (
            ClassicSolution::from_assignment(problem, genes_a),
            ClassicSolution::from_assignment(problem, genes_b),
        )
    }

    fn mutate<R: Rng>(&self, problem: &ProblemInstance, solution: &mut ClassicSolution, rng: &mut R) {
        let n_hosts = problem.num_hosts();
        if n_hosts < 2 {
            return;
        }

        let rate = 1.0 / problem.num_units() as f64;
        let mut mutated = false;
        for unit in 0..problem.num_units() {
            if rng.random_bool(rate) {
                let host = other_host(solution.host_of(unit), n_hosts, rng);
                solution.evaluate_delta(problem, unit, host);
                mutated = true;
            }
        }

        if mutated && solution.is_infeasible() {
            self.repair.apply(problem, solution, rng);
        }
    }
}
