//! Operators for the grouped (host → units) encoding.
//!
//! Both operators act on whole host groups, which keeps co-located units
//! together across generations.

use super::config::NsgaConfig;
use super::repair::Repair;
use super::types::Reproduction;
use crate::problem::ProblemInstance;
use crate::solution::{HybridSolution, Solution};
use rand::seq::{index, IndexedRandom, SliceRandom};
use rand::Rng;

/// Group-assembly crossover and host-eviction mutation.
///
/// # Crossover
///
/// Produces one child per ordered (donor, receiver) pair and is applied
/// twice with the roles swapped:
///
/// 1. Copy between 1 and half of the donor's active host groups wholesale
/// 2. Copy the receiver's groups for every other host, minus units the
///    donor already placed
/// 3. Reinsert leftover units in random order (see [`reinsert`])
///
/// # Mutation
///
/// Empties one random active host: each of its units, in random order,
/// moves to the first host (random order, victim excluded) with enough
/// residual CPU and memory, or to a random other host when none fits.
/// Infeasible results go through [`Repair`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HybridOperators {
    repair: Repair,
}

impl HybridOperators {
    /// Creates operators with the given repair budget.
    pub fn new(repair: Repair) -> Self {
        Self { repair }
    }

    /// Assembles one child from `donor` and `receiver`.
    pub fn assemble<R: Rng>(
        &self,
        problem: &ProblemInstance,
        donor: &HybridSolution,
        receiver: &HybridSolution,
        rng: &mut R,
    ) -> HybridSolution {
        let active = donor.active_hosts();
        if active.is_empty() {
            return receiver.clone();
        }

        let n_hosts = problem.num_hosts();
        let mut groups: Vec<Vec<usize>> = vec![Vec::new(); n_hosts];
        let mut placed = vec![false; problem.num_units()];
        let mut injected = vec![false; n_hosts];

        let upper = (active.len() / 2).max(1);
        let count = rng.random_range(1..=upper);
        for k in index::sample(rng, active.len(), count) {
            let host = active[k];
            groups[host] = donor.groups()[host].clone();
            for &unit in &groups[host] {
                placed[unit] = true;
            }
            injected[host] = true;
        }

        for (host, units) in receiver.groups().iter().enumerate() {
            if injected[host] {
                continue;
            }
            for &unit in units {
                if !placed[unit] {
                    groups[host].push(unit);
                    placed[unit] = true;
                }
            }
        }

        let mut leftover: Vec<usize> = (0..problem.num_units()).filter(|&u| !placed[u]).collect();
        leftover.shuffle(rng);
        reinsert(problem, &mut groups, &leftover, rng);

        HybridSolution::from_groups(problem, groups)
    }
}

/// Places `units` into `groups` one at a time.
///
/// Each unit goes to a randomly ordered active host with enough residual
/// CPU and memory; failing that, to the lowest-indexed idle host that can
/// hold it; failing that, to a uniformly random host.
pub fn reinsert<R: Rng>(
    problem: &ProblemInstance,
    groups: &mut [Vec<usize>],
    units: &[usize],
    rng: &mut R,
) {
    let mut cpu = vec![0.0; groups.len()];
    let mut mem = vec![0.0; groups.len()];
    for (host, members) in groups.iter().enumerate() {
        for &unit in members {
            cpu[host] += problem.unit(unit).cpu;
            mem[host] += problem.unit(unit).mem;
        }
    }

    let free = |host: usize, cpu: &[f64], mem: &[f64]| {
        let h = problem.host(host);
        (h.cpu - cpu[host], h.mem - mem[host])
    };

    for &unit in units {
        let mut active: Vec<usize> = (0..groups.len()).filter(|&h| !groups[h].is_empty()).collect();
        active.shuffle(rng);

        let fitting = |host: &usize| {
            let (c, m) = free(*host, &cpu, &mem);
            problem.fits(unit, c, m)
        };

        let host = active
            .iter()
            .copied()
            .find(|h| fitting(h))
            .or_else(|| (0..groups.len()).find(|h| groups[*h].is_empty() && fitting(h)))
            .unwrap_or_else(|| rng.random_range(0..groups.len()));

        groups[host].push(unit);
        cpu[host] += problem.unit(unit).cpu;
        mem[host] += problem.unit(unit).mem;
    }
}

impl Reproduction for HybridOperators {
    type Solution = HybridSolution;

    const NAME: &'static str = "hybrid";

    fn from_config(config: &NsgaConfig) -> Self {
        Self::new(Repair::new(config.repair_attempts))
    }

    fn crossover<R: Rng>(
        &self,
        problem: &ProblemInstance,
        first: &HybridSolution,
        second: &HybridSolution,
        rng: &mut R,
    ) -> (HybridSolution, HybridSolution) {
        let a = self.assemble(problem, first, second, rng);
        let b = self.assemble(problem, second, first, rng);
        (a, b)
    }

    fn mutate<R: Rng>(&self, problem: &ProblemInstance, solution: &mut HybridSolution, rng: &mut R) {
        let n_hosts = problem.num_hosts();
        if n_hosts < 2 {
            return;
        }
        let Some(&victim) = solution.active_hosts().choose(rng) else {
            return;
        };

        let mut evicted = solution.groups()[victim].clone();
        evicted.shuffle(rng);

        let mut candidates: Vec<usize> = (0..n_hosts).filter(|&h| h != victim).collect();
        for unit in evicted {
            candidates.shuffle(rng);
            let target = candidates.iter().copied().find(|&h| {
                let (cpu, mem) = solution.evaluation().residual(problem, h);
                problem.fits(unit, cpu, mem)
            });
            let target = match target {
                Some(h) => h,
                None => *candidates.choose(rng).expect("at least one other host"),
            };
            solution.evaluate_delta(problem, unit, target);
        }

        if solution.is_infeasible() {
            self.repair.apply(problem, solution, rng);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::random::create_rng;

    fn assert_complete(problem: &ProblemInstance, s: &HybridSolution) {
        let mut seen = vec![0; problem.num_units()];
        for units in s.groups() {
            for &u in units {
                seen[u] += 1;
            }
        }
        assert!(seen.iter().all(|&c| c == 1), "placement not a partition: {seen:?}");
    }

    #[test]
    fn test_child_is_partition() {
        let problem = fixtures::random_instance(12, 24, 8);
        let ops = HybridOperators::new(Repair::default());
        let mut rng = create_rng(12);
        for _ in 0..30 {
            let a = HybridSolution::from_assignment(
                &problem,
                (0..24).map(|_| rng.random_range(0..8)).collect(),
            );
            let b = HybridSolution::from_assignment(
                &problem,
                (0..24).map(|_| rng.random_range(0..8)).collect(),
            );
            let (c1, c2) = ops.crossover(&problem, &a, &b, &mut rng);
            assert_complete(&problem, &c1);
            assert_complete(&problem, &c2);
        }
    }

    #[test]
    fn test_child_keeps_a_donor_group() {
        let problem = fixtures::random_instance(2, 8, 4);
        let ops = HybridOperators::new(Repair::default());
        let mut rng = create_rng(2);
        let donor = HybridSolution::from_assignment(&problem, vec![0, 0, 1, 1, 2, 2, 3, 3]);
        let receiver = HybridSolution::from_assignment(&problem, vec![1, 2, 3, 0, 1, 2, 3, 0]);
        let child = ops.assemble(&problem, &donor, &receiver, &mut rng);
        let kept = (0..4).filter(|&h| child.groups()[h] == donor.groups()[h]).count();
        assert!(kept >= 1);
    }

    #[test]
    fn test_identical_parents_reproduce_placement() {
        let problem = fixtures::random_instance(4, 10, 5);
        let ops = HybridOperators::new(Repair::default());
        let mut rng = create_rng(4);
        let parent = HybridSolution::from_assignment(&problem, vec![0, 1, 2, 3, 4, 0, 1, 2, 3, 4]);
        let child = ops.assemble(&problem, &parent, &parent, &mut rng);
        assert_eq!(child.assignment(), parent.assignment());
        assert_eq!(child.objectives(), parent.objectives());
    }

    #[test]
    fn test_reinsert_prefers_active_host() {
        let problem = fixtures::single_host();
        let mut groups = vec![vec![0]];
        let mut rng = create_rng(0);
        reinsert(&problem, &mut groups, &[1], &mut rng);
        assert_eq!(groups, vec![vec![0, 1]]);
    }

    #[test]
    fn test_reinsert_opens_first_idle_host() {
        // Host 0 is full; host 1 is idle and can take one more unit.
        let problem = fixtures::overloaded_pair();
        let mut groups = vec![vec![0], vec![]];
        let mut rng = create_rng(0);
        reinsert(&problem, &mut groups, &[1], &mut rng);
        assert_eq!(groups, vec![vec![0], vec![1]]);
    }

    #[test]
    fn test_reinsert_forces_placement() {
        let problem = fixtures::overloaded_pair();
        let mut groups = vec![vec![0], vec![1]];
        let mut rng = create_rng(0);
        reinsert(&problem, &mut groups, &[2], &mut rng);
        assert_eq!(groups.iter().map(Vec::len).sum::<usize>(), 3);
    }

    #[test]
    fn test_mutation_empties_victim_when_room_exists() {
        let problem = fixtures::network_pair();
        let ops = HybridOperators::new(Repair::default());
        let mut rng = create_rng(3);
        let mut s = HybridSolution::from_assignment(&problem, vec![1, 1]);
        ops.mutate(&problem, &mut s, &mut rng);
        // The only active host was the victim; both units land on host 0.
        assert_eq!(s.assignment(), &[0, 0]);
        assert!(!s.is_infeasible());
    }

    #[test]
    fn test_mutation_keeps_evaluation_consistent() {
        let problem = fixtures::random_instance(17, 16, 6);
        let ops = HybridOperators::new(Repair::default());
        let mut rng = create_rng(17);
        let mut s = HybridSolution::from_assignment(&problem, (0..16).map(|u| u % 3).collect());
        for _ in 0..20 {
            ops.mutate(&problem, &mut s, &mut rng);
            assert_complete(&problem, &s);
            let fresh = HybridSolution::from_assignment(&problem, s.assignment().to_vec());
            assert!((s.objectives().power - fresh.objectives().power).abs() < 1e-6);
            assert!((s.objectives().network - fresh.objectives().network).abs() < 1e-6);
            assert_eq!(s.is_infeasible(), fresh.is_infeasible());
        }
    }

    #[test]
    fn test_mutation_single_host_is_noop() {
        let problem = fixtures::single_host();
        let ops = HybridOperators::new(Repair::default());
        let mut rng = create_rng(0);
        let mut s = HybridSolution::from_assignment(&problem, vec![0, 0]);
        ops.mutate(&problem, &mut s, &mut rng);
        assert_eq!(s.assignment(), &[0, 0]);
    }
}
