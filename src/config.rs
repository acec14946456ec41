//! Top-level shopper configuration.
//!
//! [`ShopperConfig`] bundles the world parameters every agent shares (cart
//! capacity, the ranges items are generated from, pickup reach) with the
//! per-solver configurations. It can be built in code or loaded from JSON;
//! missing JSON fields fall back to their defaults.

use crate::dp::{DpConfig, KnapsackBounds, KnapsackSolver};
use crate::error::{Result, ShopError};
use crate::ga::GaConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Static configuration consumed at startup.
///
/// # Examples
///
/// ```
/// use u_shoptimise::config::ShopperConfig;
///
/// let config = ShopperConfig::from_json_str(
///     r#"{ "cart_capacity": 25.0, "ga": { "population_size": 200 } }"#,
/// ).unwrap();
/// assert_eq!(config.cart_capacity, 25.0);
/// assert_eq!(config.ga.population_size, 200);
/// assert_eq!(config.ga.tournament_size, 200);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopperConfig {
    /// Maximum total size a cart may hold.
    pub cart_capacity: f64,

    /// Smallest size an item can have.
    pub min_size: f64,

    /// Largest size an item can have.
    pub max_size: f64,

    /// Smallest saving an item can carry.
    pub min_saving: f64,

    /// Largest saving an item can carry.
    pub max_saving: f64,

    /// How close an agent must stand to an item to add or remove it.
    pub max_pickup_distance: f64,

    pub ga: GaConfig,

    pub dp: DpConfig,
}

impl Default for ShopperConfig {
    fn default() -> Self {
        Self {
            cart_capacity: 50.0,
            min_size: 1.0,
            max_size: 10.0,
            min_saving: 0.5,
            max_saving: 50.0,
            max_pickup_distance: 2.0,
            ga: GaConfig::default(),
            dp: DpConfig::default(),
        }
    }
}

impl ShopperConfig {
    pub fn with_cart_capacity(mut self, capacity: f64) -> Self {
        self.cart_capacity = capacity;
        self
    }

    /// Sets the item size range and keeps the knapsack bounds in step.
    pub fn with_size_range(mut self, min: f64, max: f64) -> Self {
        self.min_size = min;
        self.max_size = max;
        self.dp.bounds = KnapsackBounds::new(min, max);
        self
    }

    pub fn with_saving_range(mut self, min: f64, max: f64) -> Self {
        self.min_saving = min;
        self.max_saving = max;
        self
    }

    pub fn with_max_pickup_distance(mut self, distance: f64) -> Self {
        self.max_pickup_distance = distance;
        self
    }

    pub fn with_ga(mut self, ga: GaConfig) -> Self {
        self.ga = ga;
        self
    }

    pub fn with_dp(mut self, dp: DpConfig) -> Self {
        self.dp = dp;
        self
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Exact solver for this cart.
    pub fn knapsack_solver(&self) -> KnapsackSolver {
        KnapsackSolver::new(self.cart_capacity, self.dp.bounds)
    }

    /// Validates the configuration, including the nested solver configs.
    pub fn validate(&self) -> Result<()> {
        if !self.cart_capacity.is_finite() || self.cart_capacity < 0.0 {
            return Err(ShopError::config("cart_capacity must be finite and non-negative"));
        }
        if !(self.min_size > 0.0 && self.min_size < self.max_size) {
            return Err(ShopError::config("size range must satisfy 0 < min_size < max_size"));
        }
        if !(self.min_saving >= 0.0 && self.min_saving < self.max_saving) {
            return Err(ShopError::config(
                "saving range must satisfy 0 <= min_saving < max_saving",
            ));
        }
        if self.max_pickup_distance.is_nan() || self.max_pickup_distance < 0.0 {
            return Err(ShopError::config("max_pickup_distance must be non-negative"));
        }
        self.ga.validate()?;
        self.dp.validate()?;
        Ok(())
    }
}
