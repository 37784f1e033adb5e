//! Direct-array encoding.

use super::{group_assignment, Evaluation, NsgaFields, Representation, Solution};
use crate::problem::ProblemInstance;

/// A placement encoded as a unit → host array.
///
/// The array is canonical; the host → units groups are rebuilt from it
/// after every change.
///
/// # Examples
///
/// ```
/// use u_placement::problem::{Host, ProblemInstance, Unit};
/// use u_placement::solution::{ClassicSolution, Solution};
///
/// let problem = ProblemInstance::new(
///     vec![Unit::new(1.0, 1.0); 3],
///     vec![Host::new(4.0, 4.0).with_power(100.0, 200.0); 2],
///     vec![vec![0.0; 3]; 3],
///     vec![vec![0.0; 2]; 2],
/// )
/// .unwrap();
///
/// let mut s = ClassicSolution::from_assignment(&problem, vec![0, 0, 1]);
/// s.evaluate_delta(&problem, 2, 0);
///
/// assert_eq!(s.assignment(), &[0, 0, 0]);
/// assert_eq!(s.active_hosts(), vec![0]);
/// ```
#[derive(Debug, Clone)]
pub struct ClassicSolution {
    assignment: Vec<usize>,
    groups: Vec<Vec<usize>>,
    evaluation: Evaluation,
    nsga: NsgaFields,
}

impl Solution for ClassicSolution {
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

        let mut solution = Self {
            groups: group_assignment(&assignment, problem.num_hosts()),
            assignment,
            evaluation: Evaluation::new(problem),
            nsga: NsgaFields::default(),
        };
        solution.evaluate_full(problem);
        solution
    }

    fn representation(&self) -> Representation<'_> {
        Representation::Direct(&self.assignment)
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
        self.groups = group_assignment(&self.assignment, self.groups.len());
    }

    fn evaluate_full(&mut self, problem: &ProblemInstance) {
        self.evaluation.evaluate_full(problem, &self.assignment);
    }

    fn evaluate_delta(&mut self, problem: &ProblemInstance, unit: usize, host: usize) {
        let from = self.assignment[unit];
        if from == host {
            return;
        }

        self.assignment[unit] = host;
        self.resynchronize();

        let emptied = self.groups[from].is_empty();
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
    fn test_groups_follow_assignment() {
        let problem = fixtures::random_instance(1, 5, 3);
        let s = ClassicSolution::from_assignment(&problem, vec![2, 0, 2, 1, 0]);
        assert_eq!(s.groups(), &[vec![1, 4], vec![3], vec![0, 2]]);
        assert_eq!(s.representation(), Representation::Direct(&[2, 0, 2, 1, 0]));
    }

    #[test]
    fn test_delta_noop_on_same_host() {
        let problem = fixtures::random_instance(2, 4, 3);
        let mut s = ClassicSolution::from_assignment(&problem, vec![0, 1, 2, 0]);
        let before = s.evaluation().clone();
        s.evaluate_delta(&problem, 1, 1);
        assert_eq!(s.evaluation(), &before);
        assert_eq!(s.assignment(), &[0, 1, 2, 0]);
    }

    #[test]
    fn test_delta_moves_unit_between_groups() {
        let problem = fixtures::random_instance(3, 4, 3);
        let mut s = ClassicSolution::from_assignment(&problem, vec![0, 1, 2, 0]);
        s.evaluate_delta(&problem, 0, 2);
        assert_eq!(s.assignment(), &[2, 1, 2, 0]);
        assert_eq!(s.groups(), &[vec![3], vec![1], vec![0, 2]]);
    }

    #[test]
    fn test_delta_updates_power() {
        let problem = fixtures::overloaded_pair();
        let mut s = ClassicSolution::from_assignment(&problem, vec![0, 0, 1]);
        s.evaluate_delta(&problem, 1, 1);

        let fresh = ClassicSolution::from_assignment(&problem, vec![0, 1, 1]);
        assert!((s.objectives().power - fresh.objectives().power).abs() < 1e-9);
        assert_eq!(s.total_violation(), 4.0);
    }

    #[test]
    fn test_clone_keeps_evaluation() {
        let problem = fixtures::random_instance(4, 6, 3);
        let s = ClassicSolution::from_assignment(&problem, vec![0, 1, 2, 0, 1, 2]);
        let c = s.clone();
        assert_eq!(c.evaluation(), s.evaluation());
        assert_eq!(c.assignment(), s.assignment());
    }

    #[test]
    #[should_panic(expected = "assignment must place every unit")]
    fn test_short_assignment_panics() {
        let problem = fixtures::random_instance(5, 4, 2);
        ClassicSolution::from_assignment(&problem, vec![0, 1]);
    }
}
