//! Knapsack solver configuration.

use crate::error::{Result, ShopError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Expected range of item sizes.
///
/// The solver widens these to cover the catalog it is given, so they act as
/// sizing hints for the weight-indexed tables rather than hard filters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KnapsackBounds {
    pub min_weight: f64,
    pub max_weight: f64,
}

impl KnapsackBounds {
    pub fn new(min_weight: f64, max_weight: f64) -> Self {
        Self {
            min_weight,
            max_weight,
        }
    }
}

impl Default for KnapsackBounds {
    fn default() -> Self {
        Self::new(1.0, 10.0)
    }
}

/// Configuration for the knapsack worker.
///
/// # Examples
///
/// ```
/// use u_shoptimise::dp::{DpConfig, KnapsackBounds};
///
/// let config = DpConfig::default()
///     .with_bounds(KnapsackBounds::new(0.5, 8.0))
///     .with_poll_interval_ms(2);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DpConfig {
    /// Item size range used to size the solver tables.
    pub bounds: KnapsackBounds,

    /// How long the worker waits for a new catalog snapshot, or for the
    /// result slot to free up, before re-checking its stop signal.
    pub poll_interval_ms: u64,
}

impl Default for DpConfig {
    fn default() -> Self {
        Self {
            bounds: KnapsackBounds::default(),
            poll_interval_ms: 5,
        }
    }
}

impl DpConfig {
    pub fn with_bounds(mut self, bounds: KnapsackBounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_poll_interval_ms(mut self, ms: u64) -> Self {
        self.poll_interval_ms = ms;
        self
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn validate(&self) -> Result<()> {
        let KnapsackBounds {
            min_weight,
            max_weight,
        } = self.bounds;
        if !min_weight.is_finite() || min_weight <= 0.0 {
            return Err(ShopError::config("min_weight must be finite and positive"));
        }
        if !max_weight.is_finite() || max_weight < min_weight {
            return Err(ShopError::config("max_weight must be finite and >= min_weight"));
        }
        if self.poll_interval_ms == 0 {
            return Err(ShopError::config("poll_interval_ms must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DpConfig::default();
        assert_eq!(config.bounds, KnapsackBounds::new(1.0, 10.0));
        assert_eq!(config.poll_interval(), Duration::from_millis(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_bounds() {
        let inverted = DpConfig::default().with_bounds(KnapsackBounds::new(5.0, 2.0));
        assert!(inverted.validate().is_err());

        let zero = DpConfig::default().with_bounds(KnapsackBounds::new(0.0, 2.0));
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_validate_poll_interval() {
        assert!(DpConfig::default().with_poll_interval_ms(0).validate().is_err());
    }
}
