//! Error types.
//!
//! Only malformed input and infrastructure failures are errors. Expected
//! outcomes of the optimization loop are expressed in-band instead:
//!
//! - an over-capacity [`Solution`](crate::solution::Solution) has fitness `-1`
//! - a rejected commit is a `false` from the
//!   [`CapacityAuthority`](crate::authority::CapacityAuthority)
//! - a solution shorter than the catalog reads zero past its end

use crate::catalog::ItemId;
use thiserror::Error;

/// Result type alias using [`ShopError`].
pub type Result<T> = std::result::Result<T, ShopError>;

/// Unified error type for cart optimization.
#[derive(Debug, Error)]
pub enum ShopError {
    #[error("invalid item {id}: {reason}")]
    InvalidItem { id: ItemId, reason: String },

    #[error("item {0} is already in the catalog")]
    DuplicateItem(ItemId),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("knapsack worker is no longer running")]
    WorkerUnavailable,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ShopError {
    pub(crate) fn invalid_item(id: ItemId, reason: impl Into<String>) -> Self {
        ShopError::InvalidItem {
            id,
            reason: reason.into(),
        }
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        ShopError::InvalidConfig(msg.into())
    }
}
