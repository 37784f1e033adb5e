//! Initial placement construction.

use crate::problem::ProblemInstance;
use rand::seq::SliceRandom;
use rand::Rng;

/// Randomized first-fit placement.
///
/// Units are visited in a random order. Each goes to the lowest-indexed
/// host whose residual CPU and memory still cover its demand; residuals
/// shrink as units are placed. A unit that fits nowhere is dropped on a
/// uniformly random host, so the result may be infeasible.
///
/// Returns the direct unit → host assignment.
pub fn random_first_fit<R: Rng>(problem: &ProblemInstance, rng: &mut R) -> Vec<usize> {
    let n_hosts = problem.num_hosts();
    let mut free_cpu: Vec<f64> = problem.hosts().iter().map(|h| h.cpu).collect();
    let mut free_mem: Vec<f64> = problem.hosts().iter().map(|h| h.mem).collect();

    let mut order: Vec<usize> = (0..problem.num_units()).collect();
    order.shuffle(rng);

    let mut assignment = vec![0; problem.num_units()];
    for unit in order {
        let host = (0..n_hosts)
            .find(|&h| problem.fits(unit, free_cpu[h], free_mem[h]))
            .unwrap_or_else(|| rng.random_range(0..n_hosts));

        let u = problem.unit(unit);
        free_cpu[host] -= u.cpu;
        free_mem[host] -= u.mem;
        assignment[unit] = host;
    }
    assignment
}
