//! Item and geometry value types.

use crate::error::{Result, ShopError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of an item as reported by perception.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Position of an item in a [`Catalog`](super::Catalog).
///
/// Assigned on discovery and never reused or reordered.
pub type ItemIndex = usize;

/// A location in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    pub const ORIGIN: Point = Point {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// Facing direction as a yaw angle in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Heading(pub f64);

/// A discovered item.
///
/// Items are immutable facts: the optimizer reads `size` as the knapsack
/// weight and `saved_value` as the profit, and never re-derives either.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    /// Weight in cart capacity units. Must be finite and strictly positive.
    pub size: f64,
    /// Amount saved by taking the item. Must be finite and non-negative.
    pub saved_value: f64,
    /// Discount fraction applied to the item's base price.
    pub discount: f64,
    /// Where the item sits; the executor navigates here.
    pub position: Point,
}

impl Item {
    /// Creates an item at the origin with no discount information.
    pub fn new(id: u64, size: f64, saved_value: f64) -> Self {
        Self {
            id: ItemId(id),
            size,
            saved_value,
            discount: 0.0,
            position: Point::ORIGIN,
        }
    }

    /// Derives the saved value from a base price and discount fraction.
    pub fn priced(id: u64, size: f64, base_value: f64, discount: f64) -> Self {
        Self {
            id: ItemId(id),
            size,
            saved_value: base_value * discount,
            discount,
            position: Point::ORIGIN,
        }
    }

    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = discount;
        self
    }

    pub fn at(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    /// Saved value per unit of size.
    pub fn efficiency(&self) -> f64 {
        self.saved_value / self.size
    }

    /// Rejects items the optimizers cannot reason about.
    pub fn validate(&self) -> Result<()> {
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(ShopError::invalid_item(
                self.id,
                format!("size must be finite and positive, got {}", self.size),
            ));
        }
        if !self.saved_value.is_finite() || self.saved_value < 0.0 {
            return Err(ShopError::invalid_item(
                self.id,
                format!(
                    "saved value must be finite and non-negative, got {}",
                    self.saved_value
                ),
            ));
        }
        Ok(())
    }
}
