//! Quality indicators for two-objective fronts.
//!
//! These run after the search, on the `[power, network]` points of finished
//! fronts (see [`PopulationSet::pareto_points`](crate::population::PopulationSet::pareto_points)).
//! Nothing here feeds back into the evolutionary loop.
//!
//! # Indicators
//!
//! - [`spacing`]: uniformity of the spread along the front
//! - [`hypervolume`]: dominated area up to a reference point
//! - [`gd_plus`] / [`igd_plus`]: dominance-compliant distances to a
//!   reference front
//!
//! [`ReferenceFront`] builds the shared reference and normalization for a
//! batch of runs and evaluates each front into a [`QualityReport`].

mod indicators;
mod reference;

pub use indicators::{distance_plus, gd_plus, hypervolume, igd_plus, spacing};
pub use reference::{non_dominated, Normalizer, QualityReport, ReferenceFront, HV_REFERENCE};

/// A point in objective space: `[power, network]`.
pub type Point = [f64; 2];
