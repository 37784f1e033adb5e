//! Population container.

use crate::solution::Solution;

/// An ordered collection of solutions plus the front partition computed by
/// the last non-dominated sort.
///
/// Fronts hold indices into the solution list. They are scratch data:
/// any structural change to the list clears them, and every sort rebuilds
/// them from scratch.
#[derive(Debug, Clone)]
pub struct PopulationSet<S: Solution> {
    solutions: Vec<S>,
    fronts: Vec<Vec<usize>>,
}

impl<S: Solution> Default for PopulationSet<S> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<S: Solution> PopulationSet<S> {
    /// Wraps a list of solutions; fronts start empty.
    pub fn new(solutions: Vec<S>) -> Self {
        Self {
            solutions,
            fronts: Vec::new(),
        }
    }

    /// Number of solutions.
    #[inline]
    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    /// Whether the population is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    /// All solutions in order.
    #[inline]
    pub fn solutions(&self) -> &[S] {
        &self.solutions
    }

    /// Mutable access to the solutions; the list length cannot change.
    #[inline]
    pub fn solutions_mut(&mut self) -> &mut [S] {
        &mut self.solutions
    }

    /// Iterates over the solutions.
    pub fn iter(&self) -> std::slice::Iter<'_, S> {
        self.solutions.iter()
    }

    /// Appends one solution, invalidating the fronts.
    pub fn push(&mut self, solution: S) {
        self.fronts.clear();
        self.solutions.push(solution);
    }

    /// Appends many solutions, invalidating the fronts.
    pub fn extend<I: IntoIterator<Item = S>>(&mut self, solutions: I) {
        self.fronts.clear();
        self.solutions.extend(solutions);
    }

    /// Fronts from the last sort, best first.
    #[inline]
    pub fn fronts(&self) -> &[Vec<usize>] {
        &self.fronts
    }

    pub(crate) fn set_fronts(&mut self, fronts: Vec<Vec<usize>>) {
        self.fronts = fronts;
    }

    /// Solutions of front `rank`, in front order.
    ///
    /// Empty if the population has not been sorted or has fewer fronts.
    pub fn front(&self, rank: usize) -> impl Iterator<Item = &S> + '_ {
        self.fronts
            .get(rank)
            .into_iter()
            .flatten()
            .map(move |&i| &self.solutions[i])
    }

    /// Rank-0 solutions: the approximate Pareto set of this population.
    pub fn pareto_front(&self) -> Vec<&S> {
        self.front(0).collect()
    }

    /// `[power, network]` points of the rank-0 front.
    pub fn pareto_points(&self) -> Vec<[f64; 2]> {
        self.front(0).map(|s| s.objectives().as_array()).collect()
    }

    /// Number of solutions with no capacity violation.
    pub fn feasible_count(&self) -> usize {
        self.solutions.iter().filter(|s| !s.is_infeasible()).count()
    }

    /// Consumes the population, returning its solutions.
    pub fn into_solutions(self) -> Vec<S> {
        self.solutions
    }
}

impl<'a, S: Solution> IntoIterator for &'a PopulationSet<S> {
    type Item = &'a S;
    type IntoIter = std::slice::Iter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.solutions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::solution::ClassicSolution;

    fn population() -> PopulationSet<ClassicSolution> {
        let problem = fixtures::overloaded_pair();
        PopulationSet::new(vec![
            ClassicSolution::from_assignment(&problem, vec![0, 0, 1]),
            ClassicSolution::from_assignment(&problem, vec![0, 0, 0]),
        ])
    }

    #[test]
    fn test_front_access() {
        let mut pop = population();
        assert_eq!(pop.len(), 2);
        assert!(pop.pareto_front().is_empty());

        pop.set_fronts(vec![vec![0], vec![1]]);
        assert_eq!(pop.pareto_front().len(), 1);
        assert_eq!(pop.front(1).count(), 1);
        assert_eq!(pop.front(5).count(), 0);
        assert_eq!(pop.pareto_points().len(), 1);
    }

    #[test]
    fn test_push_clears_fronts() {
        let mut pop = population();
        pop.set_fronts(vec![vec![0, 1]]);
        let extra = pop.solutions()[0].clone();
        pop.push(extra);
        assert!(pop.fronts().is_empty());
        assert_eq!(pop.len(), 3);
    }

    #[test]
    fn test_feasible_count() {
        let pop = population();
        assert_eq!(pop.feasible_count(), 0);
        assert_eq!((&pop).into_iter().count(), 2);
    }
}
