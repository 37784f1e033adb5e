//! Multi-objective resource placement search.
//!
//! Places a set of units (virtual machines, containers, tasks) onto a set of
//! capacitated hosts, minimizing two objectives at once:
//!
//! - **Power**: idle plus utilization-proportional power of every active host
//! - **Network cost**: inter-host traffic weighted by topology cost, plus
//!   external traffic weighted by gateway cost
//!
//! CPU, memory and network capacities are soft constraints handled by
//! constrained dominance: feasible placements always beat infeasible ones,
//! and infeasible ones compete on total violation.
//!
//! The search is NSGA-II with two interchangeable encodings:
//!
//! - **Classic**: direct unit → host array with biased-uniform crossover
//! - **Hybrid**: host → units grouping with group-assembly crossover
//!
//! # Architecture
//!
//! - [`problem`]: validated, read-only instance data
//! - [`solution`]: the two encodings and their cached evaluation
//! - [`population`]: solution container with front partition
//! - [`nsga`]: the generational engine and its operators
//! - [`metrics`]: post-run quality indicators (spacing, HV, GD+, IGD+)
//!
//! Every run owns one seeded generator ([`random::create_rng`]); identical
//! seeds on identical instances reproduce identical populations.

pub mod error;
pub mod metrics;
pub mod nsga;
pub mod population;
pub mod problem;
pub mod random;
pub mod solution;

#[cfg(test)]
mod fixtures;

pub use error::{Error, Result};
