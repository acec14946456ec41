//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the incremental
//! evolutionary loop.

use crate::error::{Result, ShopError};
use serde::{Deserialize, Serialize};

/// Configuration for the genetic solver.
///
/// # Defaults
///
/// ```
/// use u_shoptimise::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 1000);
/// assert_eq!(config.replacement_count(), 500);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_shoptimise::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(200)
///     .with_tournament_size(20)
///     .with_replacement_ratio(0.25)
///     .with_mutation_rate(0.05)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaConfig {
    /// Catalog size at which the solver wakes up and seeds its population.
    pub min_seen_items: usize,

    /// Number of individuals in the population.
    pub population_size: usize,

    /// Individuals sampled (with replacement) per tournament.
    ///
    /// Higher values mean stronger selection pressure.
    pub tournament_size: usize,

    /// Fraction of the population replaced by offspring each generation.
    ///
    /// The replaced individuals are always the least fit, so anything above
    /// the replaced fraction survives unchanged.
    pub replacement_ratio: f64,

    /// Probability that a parent pair is recombined (0.0–1.0).
    ///
    /// A pair that is not recombined passes clones of itself on.
    pub crossover_rate: f64,

    /// Per-index probability that a child's count moves by one (0.0–1.0).
    pub mutation_rate: f64,

    /// Random item increments given to each individual at seeding time.
    pub initial_increments: usize,

    /// The solver runs once every this many control-loop ticks.
    pub think_ticks: u64,

    /// Whether to breed offspring in parallel using rayon.
    ///
    /// Only honoured when the `parallel` feature is enabled. Results are
    /// identical either way.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            min_seen_items: 10,
            population_size: 1000,
            tournament_size: 200,
            replacement_ratio: 0.5,
            crossover_rate: 1.0,
            mutation_rate: 1.0 / 9.0,
            initial_increments: 10,
            think_ticks: 25,
            parallel: true,
            seed: None,
        }
    }
}

impl GaConfig {
    pub fn with_min_seen_items(mut self, n: usize) -> Self {
        self.min_seen_items = n;
        self
    }

    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.tournament_size = k;
        self
    }

    pub fn with_replacement_ratio(mut self, ratio: f64) -> Self {
        self.replacement_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_initial_increments(mut self, n: usize) -> Self {
        self.initial_increments = n;
        self
    }

    pub fn with_think_ticks(mut self, ticks: u64) -> Self {
        self.think_ticks = ticks;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Preset for small catalogs and tests: population 100, tournament 10,
    /// one generation every 5 ticks.
    pub fn fast() -> Self {
        Self {
            population_size: 100,
            tournament_size: 10,
            think_ticks: 5,
            ..Self::default()
        }
    }

    /// Number of offspring per generation, `G`.
    ///
    /// Rounded down to an even number since parents breed in pairs.
    pub fn replacement_count(&self) -> usize {
        let g = (self.population_size as f64 * self.replacement_ratio) as usize;
        g - g % 2
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(ShopError::config("population_size must be at least 2"));
        }
        if self.tournament_size == 0 {
            return Err(ShopError::config("tournament_size must be at least 1"));
        }
        let g = self.replacement_count();
        if g < 2 {
            return Err(ShopError::config(
                "replacement_ratio too low: fewer than two offspring per generation",
            ));
        }
        if g > self.population_size {
            return Err(ShopError::config("replacement_ratio must not exceed 1.0"));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(ShopError::config("crossover_rate must be within [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ShopError::config("mutation_rate must be within [0, 1]"));
        }
        if self.min_seen_items == 0 {
            return Err(ShopError::config("min_seen_items must be at least 1"));
        }
        if self.think_ticks == 0 {
            return Err(ShopError::config("think_ticks must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GaConfig::default();
        assert_eq!(config.min_seen_items, 10);
        assert_eq!(config.population_size, 1000);
        assert_eq!(config.tournament_size, 200);
        assert!((config.replacement_ratio - 0.5).abs() < 1e-10);
        assert!((config.crossover_rate - 1.0).abs() < 1e-10);
        assert!((config.mutation_rate - 1.0 / 9.0).abs() < 1e-10);
        assert_eq!(config.initial_increments, 10);
        assert_eq!(config.think_ticks, 25);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = GaConfig::default()
            .with_min_seen_items(3)
            .with_population_size(50)
            .with_tournament_size(4)
            .with_replacement_ratio(0.3)
            .with_crossover_rate(0.8)
            .with_mutation_rate(0.05)
            .with_initial_increments(2)
            .with_think_ticks(1)
            .with_parallel(false)
            .with_seed(7);

        assert_eq!(config.min_seen_items, 3);
        assert_eq!(config.population_size, 50);
        assert_eq!(config.tournament_size, 4);
        assert_eq!(config.replacement_count(), 14);
        assert!((config.crossover_rate - 0.8).abs() < 1e-10);
        assert!((config.mutation_rate - 0.05).abs() < 1e-10);
        assert_eq!(config.initial_increments, 2);
        assert_eq!(config.think_ticks, 1);
        assert!(!config.parallel);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_replacement_count_is_even() {
        let config = GaConfig::default()
            .with_population_size(11)
            .with_replacement_ratio(0.5);
        assert_eq!(config.replacement_count(), 4);
    }

    #[test]
    fn test_clamp_rates() {
        let config = GaConfig::default()
            .with_replacement_ratio(1.5)
            .with_crossover_rate(-0.5)
            .with_mutation_rate(2.0);

        assert!((config.replacement_ratio - 1.0).abs() < 1e-10);
        assert!((config.crossover_rate - 0.0).abs() < 1e-10);
        assert!((config.mutation_rate - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_validate_population_too_small() {
        let config = GaConfig::default().with_population_size(1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_too_few_offspring() {
        let config = GaConfig::default()
            .with_population_size(10)
            .with_replacement_ratio(0.1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_throttle() {
        assert!(GaConfig::default().with_think_ticks(0).validate().is_err());
    }

    #[test]
    fn test_preset_fast() {
        let config = GaConfig::fast().with_seed(1);
        assert_eq!(config.population_size, 100);
        assert_eq!(config.tournament_size, 10);
        assert_eq!(config.think_ticks, 5);
        assert!(config.validate().is_ok());
    }
}
