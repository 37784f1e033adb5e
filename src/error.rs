//! Error types.
//!
//! The search itself never fails on a valid instance; every error here is
//! a precondition failure raised while loading a [`ProblemInstance`] or
//! validating an [`NsgaConfig`].
//!
//! [`ProblemInstance`]: crate::problem::ProblemInstance
//! [`NsgaConfig`]: crate::nsga::NsgaConfig

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type encompassing instance and configuration failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The instance has no hosts.
    #[error("problem instance must contain at least one host")]
    NoHosts,

    /// The instance has no placeable units.
    #[error("problem instance must contain at least one unit")]
    NoUnits,

    /// A matrix or vector does not match the unit or host count.
    #[error("{what} has length {actual}, expected {expected}")]
    DimensionMismatch {
        /// Which input is malformed.
        what: &'static str,
        /// Length implied by the unit/host counts.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },

    /// A demand, capacity, cost or power value is negative, NaN or infinite.
    #[error("{what}[{index}] = {value} is not a finite non-negative number")]
    InvalidValue {
        /// Which input is malformed.
        what: &'static str,
        /// Position of the offending entry (row-major for matrices).
        index: usize,
        /// The offending value.
        value: f64,
    },

    /// A host's idle power exceeds its max power.
    #[error("host {host}: idle power {idle} exceeds max power {max}")]
    PowerModel {
        /// Host index.
        host: usize,
        /// Idle power.
        idle: f64,
        /// Max power.
        max: f64,
    },

    /// The unit traffic matrix is not symmetric.
    #[error("traffic matrix is not symmetric at ({row}, {col})")]
    AsymmetricTraffic {
        /// Row index.
        row: usize,
        /// Column index.
        col: usize,
    },

    /// An engine parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
