//! Candidate placements.
//!
//! A solution assigns every unit to exactly one host. Two encodings exist:
//!
//! - [`ClassicSolution`]: canonical direct array (unit → host)
//! - [`HybridSolution`]: canonical grouping (host → units)
//!
//! Each keeps the other view as a derived copy, rebuilt after every
//! structural change, together with an [`Evaluation`] holding the cached
//! aggregates. At every observable point both views and the cache agree
//! with a from-scratch recomputation.
//!
//! The [`Solution`] trait is sealed: the engine relies on exactly these two
//! encodings.

mod classic;
mod evaluation;
mod hybrid;

pub use classic::ClassicSolution;
pub use evaluation::{host_power, Evaluation, Violations, POWER_EPSILON};
pub use hybrid::HybridSolution;

use crate::problem::ProblemInstance;

/// The two minimized objectives.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Objectives {
    /// Total power consumption of active hosts.
    pub power: f64,
    /// Total network communication cost.
    pub network: f64,
}

impl Objectives {
    /// Number of objectives.
    pub const COUNT: usize = 2;

    /// The objective vector as `[power, network]`.
    #[inline]
    pub fn as_array(&self) -> [f64; 2] {
        [self.power, self.network]
    }

    /// Objective `index` (0 = power, 1 = network).
    ///
    /// # Panics
    /// Panics if `index >= 2`.
    #[inline]
    pub fn get(&self, index: usize) -> f64 {
        self.as_array()[index]
    }

    /// Standard Pareto dominance for minimization: no objective worse and at
    /// least one strictly better.
    pub fn pareto_dominates(&self, other: &Self) -> bool {
        let mut strictly_better = false;
        for (a, b) in self.as_array().into_iter().zip(other.as_array()) {
            if a > b {
                return false;
            }
            if a < b {
                strictly_better = true;
            }
        }
        strictly_better
    }
}

/// NSGA-II bookkeeping, rebuilt by every non-dominated sort.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NsgaFields {
    /// Front index; `None` until the solution has been sorted.
    pub rank: Option<usize>,
    /// Crowding distance within the solution's front.
    pub crowding_distance: f64,
    /// Number of population members dominating this one.
    pub domination_count: usize,
    /// Population indices of the members this one dominates.
    pub dominated: Vec<usize>,
}

impl NsgaFields {
    /// Clears everything ahead of a new sort.
    pub fn reset(&mut self) {
        self.rank = None;
        self.crowding_distance = 0.0;
        self.domination_count = 0;
        self.dominated.clear();
    }
}

/// Borrowed view of a solution's canonical encoding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Representation<'a> {
    /// Unit → host array.
    Direct(&'a [usize]),
    /// Host → units groups, one entry per host.
    Grouped(&'a [Vec<usize>]),
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::ClassicSolution {}
    impl Sealed for super::HybridSolution {}
}

/// Shared contract of both encodings.
///
/// Required methods cover what differs between encodings; everything
/// built on the cached [`Evaluation`] is provided.
pub trait Solution: sealed::Sealed + Clone + Send + Sync + std::fmt::Debug {
    /// Builds and fully evaluates a solution from a direct assignment.
    ///
    /// # Panics
    /// Panics if the assignment length differs from the unit count or names
    /// a host outside the instance.
    fn from_assignment(problem: &ProblemInstance, assignment: Vec<usize>) -> Self;

    /// The canonical encoding.
    fn representation(&self) -> Representation<'_>;

    /// Direct view: host of every unit.
    fn assignment(&self) -> &[usize];

    /// Grouped view: units on every host (empty for idle hosts).
    fn groups(&self) -> &[Vec<usize>];

    /// Rebuilds the derived view from the canonical one.
    fn resynchronize(&mut self);

    /// Recomputes every constraint and objective from scratch.
    fn evaluate_full(&mut self, problem: &ProblemInstance);

    /// Relocates `unit` to `host`, updating caches incrementally.
    ///
    /// No-op if the unit already sits on `host`. CPU, memory and power are
    /// patched in O(1); network state is recomputed in full; constraint
    /// status is refreshed before returning.
    fn evaluate_delta(&mut self, problem: &ProblemInstance, unit: usize, host: usize);

    /// Cached aggregates and objectives.
    fn evaluation(&self) -> &Evaluation;

    /// Mutable access to the cache; crate-internal mutators only.
    #[doc(hidden)]
    fn evaluation_mut(&mut self) -> &mut Evaluation;

    /// NSGA-II bookkeeping.
    fn nsga(&self) -> &NsgaFields;

    /// Mutable NSGA-II bookkeeping.
    fn nsga_mut(&mut self) -> &mut NsgaFields;

    /// Objective vector.
    #[inline]
    fn objectives(&self) -> &Objectives {
        self.evaluation().objectives()
    }

    /// Sum of all capacity overages.
    #[inline]
    fn total_violation(&self) -> f64 {
        self.evaluation().total_violation()
    }

    /// Whether any capacity is exceeded.
    #[inline]
    fn is_infeasible(&self) -> bool {
        self.evaluation().is_infeasible()
    }

    /// Host of `unit`.
    #[inline]
    fn host_of(&self, unit: usize) -> usize {
        self.assignment()[unit]
    }

    /// Hosts holding at least one unit, in index order.
    fn active_hosts(&self) -> Vec<usize> {
        self.groups()
            .iter()
            .enumerate()
            .filter(|(_, units)| !units.is_empty())
            .map(|(host, _)| host)
            .collect()
    }

    /// Recomputes total violation and the infeasibility flag.
    fn update_constraint_status(&mut self) {
        self.evaluation_mut().update_status();
    }

    /// Constrained dominance (Deb et al.).
    ///
    /// A feasible solution dominates an infeasible one; between infeasible
    /// solutions the strictly smaller total violation wins; between
    /// feasible solutions standard Pareto dominance applies. Irreflexive and
    /// asymmetric.
    fn dominates(&self, other: &Self) -> bool {
        match (self.is_infeasible(), other.is_infeasible()) {
            (false, true) => true,
            (true, false) => false,
            (true, true) => self.total_violation() < other.total_violation(),
            (false, false) => self.objectives().pareto_dominates(other.objectives()),
        }
    }
}

/// Builds the grouped view of a direct assignment, units in index order.
pub(crate) fn group_assignment(assignment: &[usize], hosts: usize) -> Vec<Vec<usize>> {
    let mut groups = vec![Vec::new(); hosts];
    for (unit, &host) in assignment.iter().enumerate() {
        groups[host].push(unit);
    }
    groups
}
