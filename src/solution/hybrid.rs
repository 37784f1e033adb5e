//! Grouping encoding.

use super::{group_assignment, Evaluation, NsgaFields, Representation, Solution};
use crate::problem::ProblemInstance;

/// A placement encoded as host → units groups.
///
/// The groups are canonical; the unit → host array is derived from them
/// and rebuilt after every change. Unit order inside a group is the order
/// in which units joined it.
#[derive(Debug, Clone)]
pub struct HybridSolution {
    groups: Vec<Vec<usize>>,
    assignment: Vec<usize>,
    evaluation: Evaluation,
    nsga: NsgaFields,
}

impl HybridSolution {
    /// Builds and fully evaluates a solution from host groups.
    ///
    /// # Panics
    /// Panics if there is not exactly one group per host, or if any unit is
    /// missing or placed twice.
    pub fn from_groups(problem: &ProblemInstance, groups: Vec<Vec<usize>>) -> Self {
        assert_eq!(
            groups.len(),
            problem.num_hosts(),
            "one group per host is required"
        );
        let mut seen = vec![false; problem.num_units()];
        for &unit in groups.iter().flatten() {
            assert!(
                unit < seen.len() && !seen[unit],
                "unit {unit} is out of range or placed twice"
            );
            seen[unit] = true;
        }
        assert!(seen.iter().all(|&s| s), "every unit must be placed");

        let mut solution = Self {
            assignment: vec![0; problem.num_units()],
            groups,
            evaluation: Evaluation::new(problem),
            nsga: NsgaFields::default(),
        };
        solution.resynchronize();
        solution.evaluate_full(problem);
        solution
    }
}

impl Solution for HybridSolution {
    fn from_assignment(problem: &ProblemInstance, assignment: Vec<usize>) -> Self {
        assert_eq!(
            assignment.len(),
            problem.num_units(),
            "assignment must place every unit"
        );
        assert!(
            assignment.iter().all(|&h| h < problem.num_hosts()),
            "assignment names a host outside the instance"
        );
        Self::from_groups(problem, group_assignment(&assignment, problem.num_hosts()))
    }

    fn representation(&self) -> Representation<'_> {
        Representation::Grouped(&self.groups)
    }

    #[inline]
    fn assignment(&self) -> &[usize] {
        &self.assignment
    }

    #[inline]
    fn groups(&self) -> &[Vec<usize>] {
        &self.groups
    }

    fn resynchronize(&mut self) {
        for (host, units) in self.groups.iter().enumerate() {
            for &unit in units {
                self.assignment[unit] = host;
            }
        }
    }

    fn evaluate_full(&mut self, problem: &ProblemInstance) {
        self.evaluation.evaluate_full(problem, &self.assignment);
    }

    fn evaluate_delta(&mut self, problem: &ProblemInstance, unit: usize, host: usize) {
        let from = self.assignment[unit];
        if from == host {
            return;
        }

        let source = &mut self.groups[from];
        let pos = source
            .iter()
            .position(|&u| u == unit)
            .expect("derived assignment agrees with groups");
        source.remove(pos);
        let emptied = source.is_empty();
        self.groups[host].push(unit);
        self.resynchronize();

        self.evaluation.apply_move(problem, unit, from, host, emptied);
        self.evaluation.refresh_network(problem, &self.assignment);
        self.evaluation.update_status();
    }

    #[inline]
    fn evaluation(&self) -> &Evaluation {
        &self.evaluation
    }

    fn evaluation_mut(&mut self) -> &mut Evaluation {
        &mut self.evaluation
    }

    #[inline]
    fn nsga(&self) -> &NsgaFields {
        &self.nsga
    }

    fn nsga_mut(&mut self) -> &mut NsgaFields {
        &mut self.nsga
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_assignment_follows_groups() {
        let problem = fixtures::random_instance(1, 5, 3);
        let s = HybridSolution::from_groups(&problem, vec![vec![4, 1], vec![], vec![0, 3, 2]]);
        assert_eq!(s.assignment(), &[2, 0, 2, 2, 0]);
        assert_eq!(s.active_hosts(), vec![0, 2]);
        assert!(matches!(s.representation(), Representation::Grouped(_)));
    }

    #[test]
    fn test_delta_appends_to_target_group() {
        let problem = fixtures::random_instance(2, 4, 3);
        let mut s = HybridSolution::from_groups(&problem, vec![vec![3, 0], vec![1], vec![2]]);
        s.evaluate_delta(&problem, 3, 1);
        assert_eq!(s.groups(), &[vec![0], vec![1, 3], vec![2]]);
        assert_eq!(s.assignment(), &[0, 1, 2, 1]);
    }

    #[test]
    fn test_delta_noop_on_same_host() {
        let problem = fixtures::random_instance(3, 3, 2);
        let mut s = HybridSolution::from_groups(&problem, vec![vec![0, 1], vec![2]]);
        let before = s.evaluation().clone();
        s.evaluate_delta(&problem, 2, 1);
        assert_eq!(s.evaluation(), &before);
        assert_eq!(s.groups(), &[vec![0, 1], vec![2]]);
    }

    #[test]
    fn test_matches_classic_for_same_assignment() {
        let problem = fixtures::random_instance(9, 12, 4);
        let genes = vec![0, 3, 3, 1, 2, 0, 1, 1, 3, 2, 0, 0];
        let hybrid = HybridSolution::from_assignment(&problem, genes.clone());
        let classic = crate::solution::ClassicSolution::from_assignment(&problem, genes);
        assert_eq!(hybrid.objectives(), classic.objectives());
        assert_eq!(hybrid.evaluation().violations(), classic.evaluation().violations());
    }

    #[test]
    fn test_group_order_does_not_change_fitness() {
        let problem = fixtures::random_instance(6, 5, 2);
        let a = HybridSolution::from_groups(&problem, vec![vec![0, 1, 2], vec![3, 4]]);
        let b = HybridSolution::from_groups(&problem, vec![vec![2, 0, 1], vec![4, 3]]);
        assert_eq!(a.objectives(), b.objectives());
        assert_eq!(a.total_violation(), b.total_violation());
    }

    #[test]
    #[should_panic(expected = "placed twice")]
    fn test_duplicate_unit_panics() {
        let problem = fixtures::random_instance(7, 3, 2);
        HybridSolution::from_groups(&problem, vec![vec![0, 1], vec![1, 2]]);
    }

    #[test]
    #[should_panic(expected = "every unit must be placed")]
    fn test_missing_unit_panics() {
        let problem = fixtures::random_instance(8, 3, 2);
        HybridSolution::from_groups(&problem, vec![vec![0], vec![2]]);
    }
}
