//! GA configuration.
//!
//! [`GaConfig`] holds all parameters the evolutionary loop recognizes.

use serde::{Deserialize, Serialize};

use crate::decode::MachineSelection;
use crate::error::Error;

/// Configuration for the genetic search engine.
///
/// # Defaults
///
/// ```
/// use flexshop::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 50);
/// assert_eq!(config.generations, 100);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use flexshop::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(100)
///     .with_crossover_rate(0.9)
///     .with_mutation_rate(0.05)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaConfig {
    /// Number of genomes in the population. At least 2; an even number is
    /// recommended so pairwise crossover covers everyone.
    pub population_size: usize,

    /// Number of generations to run. 0 evaluates the initial population once
    /// and returns its best with an empty convergence history.
    pub generations: usize,

    /// Probability that a consecutive parent pair is recombined rather than
    /// cloned, in `[0, 1]`.
    pub crossover_rate: f64,

    /// Probability that an offspring undergoes one swap mutation, in `[0, 1]`.
    pub mutation_rate: f64,

    /// Machine-selection policy used when decoding genomes for fitness.
    pub machine_selection: MachineSelection,

    /// Whether to decode the population in parallel (effective only with the
    /// `parallel` cargo feature). Decoding is pure, so this never changes
    /// results.
    pub parallel: bool,

    /// Random seed for reproducibility. `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 100,
            crossover_rate: 0.8,
            mutation_rate: 0.1,
            machine_selection: MachineSelection::default(),
            parallel: false,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the generation count.
    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    /// Sets the crossover rate, clamped to `[0, 1]`.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation rate, clamped to `[0, 1]`.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the machine-selection policy for decoding.
    pub fn with_machine_selection(mut self, policy: MachineSelection) -> Self {
        self.machine_selection = policy;
        self
    }

    /// Enables or disables parallel fitness evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// Runs before any generation; an invalid configuration never starts a
    /// search.
    ///
    /// # Errors
    /// [`Error::InvalidConfiguration`] naming the offending parameter.
    pub fn validate(&self) -> Result<(), Error> {
        if self.population_size < 2 {
            return Err(Error::invalid_configuration(
                "population_size must be at least 2",
            ));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(Error::invalid_configuration(format!(
                "crossover_rate {} outside [0, 1]",
                self.crossover_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(Error::invalid_configuration(format!(
                "mutation_rate {} outside [0, 1]",
                self.mutation_rate
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GaConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.population_size, 50);
        assert_eq!(config.generations, 100);
        assert!((config.crossover_rate - 0.8).abs() < 1e-12);
        assert!((config.mutation_rate - 0.1).abs() < 1e-12);
        assert_eq!(config.machine_selection, MachineSelection::FirstEligible);
        assert!(!config.parallel);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = GaConfig::default()
            .with_population_size(200)
            .with_generations(500)
            .with_crossover_rate(0.9)
            .with_mutation_rate(0.05)
            .with_machine_selection(MachineSelection::EarliestCompletion)
            .with_parallel(true)
            .with_seed(42);

        assert_eq!(config.population_size, 200);
        assert_eq!(config.generations, 500);
        assert!((config.crossover_rate - 0.9).abs() < 1e-12);
        assert!((config.mutation_rate - 0.05).abs() < 1e-12);
        assert_eq!(
            config.machine_selection,
            MachineSelection::EarliestCompletion
        );
        assert!(config.parallel);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_builders_clamp_rates() {
        let config = GaConfig::default()
            .with_crossover_rate(1.5)
            .with_mutation_rate(-0.3);
        assert!((config.crossover_rate - 1.0).abs() < 1e-12);
        assert!((config.mutation_rate - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_validate_population_too_small() {
        let config = GaConfig::default().with_population_size(1);
        assert!(matches!(
            config.validate().unwrap_err(),
            Error::InvalidConfiguration(_)
        ));
    }

    #[test]
    fn test_validate_out_of_range_rate() {
        // Struct literals can bypass the clamping builders.
        let config = GaConfig {
            mutation_rate: 1.5,
            ..GaConfig::default()
        };
        assert!(matches!(
            config.validate().unwrap_err(),
            Error::InvalidConfiguration(_)
        ));
    }

    #[test]
    fn test_zero_generations_is_valid() {
        assert!(GaConfig::default().with_generations(0).validate().is_ok());
    }
}
