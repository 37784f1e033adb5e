//! NSGA-II search over placements.
//!
//! A generic generational engine parameterized by the variation operators
//! of one encoding. The engine owns everything encoding-independent:
//! constrained non-dominated sorting, crowding distance, crowded
//! tournament selection, elitist truncation and the fixed generation
//! budget.
//!
//! # Core Trait
//!
//! - [`Reproduction`]: crossover and mutation for one solution encoding
//!
//! # Key Types
//!
//! - [`NsgaConfig`]: Algorithm parameters (population size, generations, rates)
//! - [`EvolutionEngine`]: Executes the evolutionary loop
//! - [`ClassicEngine`] / [`HybridEngine`]: the engine over each encoding
//! - [`NsgaResult`]: Final population with per-generation statistics
//! - [`Repair`]: Bounded capacity repair shared by both operator sets
//!
//! # References
//!
//! - Deb et al. (2002), *A Fast and Elitist Multiobjective GA: NSGA-II*
//! - Falkenauer (1996), *A Hybrid Grouping Genetic Algorithm for Bin Packing*

mod classic;
mod config;
mod construction;
mod engine;
mod hybrid;
mod repair;
mod selection;
mod sorting;
mod types;

pub use classic::ClassicOperators;
pub use config::NsgaConfig;
pub use construction::random_first_fit;
pub use engine::{ClassicEngine, EvolutionEngine, GenerationStats, HybridEngine, NsgaResult};
pub use hybrid::{reinsert, HybridOperators};
pub use repair::{Repair, RepairOutcome};
pub use selection::{crowded_tournament, select_parents};
pub use sorting::{crowd_all_fronts, crowding_distance, fast_non_dominated_sort};
pub use types::Reproduction;
