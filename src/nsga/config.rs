//! NSGA-II configuration.
//!
//! [`NsgaConfig`] holds all parameters that control the generational loop.

use crate::error::{Error, Result};

/// Configuration for the evolutionary placement search.
///
/// The generation budget is fixed: the loop always runs exactly
/// `max_generations` iterations, with no early termination.
///
/// # Defaults
///
/// ```
/// use u_placement::nsga::NsgaConfig;
///
/// let config = NsgaConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.max_generations, 100);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_placement::nsga::NsgaConfig;
///
/// let config = NsgaConfig::default()
///     .with_population_size(60)
///     .with_max_generations(40)
///     .with_mutation_probability(0.2)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NsgaConfig {
    /// Number of solutions kept after every truncation.
    ///
    /// Also the number of offspring produced per generation.
    pub population_size: usize,

    /// Number of generations to run.
    pub max_generations: usize,

    /// Probability of recombining a pair of parents (0.0–1.0).
    ///
    /// When crossover is skipped both parents are cloned unchanged.
    pub crossover_probability: f64,

    /// Probability of mutating each child (0.0–1.0).
    pub mutation_probability: f64,

    /// Probability that a biased-uniform crossover gene comes from the
    /// better parent (0.0–1.0). Only used by the direct encoding.
    pub crossover_bias: f64,

    /// Maximum number of relocation attempts per repair call.
    pub repair_attempts: usize,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for NsgaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 100,
            crossover_probability: 0.9,
            mutation_probability: 0.1,
            crossover_bias: 0.7,
            repair_attempts: 50,
            seed: None,
        }
    }
}

impl NsgaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the generation budget.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the crossover probability.
    pub fn with_crossover_probability(mut self, p: f64) -> Self {
        self.crossover_probability = p.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation probability.
    pub fn with_mutation_probability(mut self, p: f64) -> Self {
        self.mutation_probability = p.clamp(0.0, 1.0);
        self
    }

    /// Sets the biased-uniform crossover bias.
    pub fn with_crossover_bias(mut self, bias: f64) -> Self {
        self.crossover_bias = bias.clamp(0.0, 1.0);
        self
    }

    /// Sets the repair attempt cap.
    pub fn with_repair_attempts(mut self, n: usize) -> Self {
        self.repair_attempts = n;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] describing the first invalid
    /// parameter.
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(invalid("population_size must be at least 2"));
        }
        if self.max_generations == 0 {
            return Err(invalid("max_generations must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.crossover_probability) {
            return Err(invalid("crossover_probability must be in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.mutation_probability) {
            return Err(invalid("mutation_probability must be in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.crossover_bias) {
            return Err(invalid("crossover_bias must be in [0, 1]"));
        }
        if self.repair_attempts == 0 {
            return Err(invalid("repair_attempts must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> Error {
    Error::InvalidConfig(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NsgaConfig::default();
        assert_eq!(config.population_size, 100);
        assert_eq!(config.max_generations, 100);
        assert!((config.crossover_probability - 0.9).abs() < 1e-10);
        assert!((config.mutation_probability - 0.1).abs() < 1e-10);
        assert!((config.crossover_bias - 0.7).abs() < 1e-10);
        assert_eq!(config.repair_attempts, 50);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = NsgaConfig::default()
            .with_population_size(40)
            .with_max_generations(25)
            .with_crossover_probability(0.8)
            .with_mutation_probability(0.3)
            .with_crossover_bias(0.6)
            .with_repair_attempts(10)
            .with_seed(7);

        assert_eq!(config.population_size, 40);
        assert_eq!(config.max_generations, 25);
        assert!((config.crossover_probability - 0.8).abs() < 1e-10);
        assert!((config.mutation_probability - 0.3).abs() < 1e-10);
        assert!((config.crossover_bias - 0.6).abs() < 1e-10);
        assert_eq!(config.repair_attempts, 10);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_validate_ok() {
        assert!(NsgaConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_population_too_small() {
        let config = NsgaConfig::default().with_population_size(1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_generations() {
        let config = NsgaConfig::default().with_max_generations(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_repair_budget() {
        let config = NsgaConfig::default().with_repair_attempts(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_raw_probability_out_of_range() {
        let config = NsgaConfig {
            mutation_probability: 1.5,
            ..NsgaConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(Error::InvalidConfig(
                "mutation_probability must be in [0, 1]".into()
            ))
        );
    }

    #[test]
    fn test_clamp_rates() {
        let config = NsgaConfig::default()
            .with_crossover_probability(-0.5)
            .with_mutation_probability(2.0)
            .with_crossover_bias(1.2);

        assert!((config.crossover_probability - 0.0).abs() < 1e-10);
        assert!((config.mutation_probability - 1.0).abs() < 1e-10);
        assert!((config.crossover_bias - 1.0).abs() < 1e-10);
    }
}
