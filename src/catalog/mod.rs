//! Append-only record of discovered items.
//!
//! The catalog is owned by the control loop. Background consumers never see
//! it directly; they receive a [`CatalogSnapshot`], an immutable copy taken
//! at the moment of the call, so an append can never race with a read.

mod types;

pub use types::{Heading, Item, ItemId, ItemIndex, Point};

use crate::error::{Result, ShopError};
use std::collections::HashSet;
use std::ops::Deref;
use std::sync::Arc;
use tracing::warn;

/// Ordered, append-only sequence of discovered items.
///
/// An item's [`ItemIndex`] is its position at discovery time.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<Item>,
    seen: HashSet<ItemId>,
    rejected: HashSet<ItemId>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: ItemIndex) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.seen.contains(&id)
    }

    /// Appends a new item and returns its index.
    ///
    /// Fails with [`ShopError::DuplicateItem`] if the id was recorded before,
    /// or [`ShopError::InvalidItem`] if the item is malformed.
    pub fn push(&mut self, item: Item) -> Result<ItemIndex> {
        if self.seen.contains(&item.id) {
            return Err(ShopError::DuplicateItem(item.id));
        }
        item.validate()?;
        self.seen.insert(item.id);
        self.items.push(item);
        Ok(self.items.len() - 1)
    }

    /// Records `item` if it has not been seen yet.
    ///
    /// Returns `Ok(None)` for a re-observation of a known item.
    pub fn observe(&mut self, item: &Item) -> Result<Option<ItemIndex>> {
        if self.seen.contains(&item.id) {
            return Ok(None);
        }
        self.push(item.clone()).map(Some)
    }

    /// Records every unseen item in `items`, returning how many were new.
    ///
    /// Malformed items are skipped so they cannot hide the rest of the view;
    /// each one is logged the first time it is seen.
    pub fn observe_all<'a>(&mut self, items: impl IntoIterator<Item = &'a Item>) -> usize {
        let mut added = 0;
        for item in items {
            match self.observe(item) {
                Ok(Some(_)) => added += 1,
                Ok(None) => {}
                Err(e) => {
                    if self.rejected.insert(item.id) {
                        warn!(item = %item.id, error = %e, "ignoring malformed item");
                    }
                }
            }
        }
        added
    }

    /// Number of distinct malformed items turned away by
    /// [`observe_all`](Self::observe_all).
    pub fn rejected(&self) -> usize {
        self.rejected.len()
    }

    /// Copies the current contents into an immutable snapshot.
    pub fn snapshot(&self) -> CatalogSnapshot {
        CatalogSnapshot {
            items: Arc::from(self.items.as_slice()),
        }
    }
}

/// Immutable, cheaply clonable copy of a catalog prefix.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    items: Arc<[Item]>,
}

impl CatalogSnapshot {
    pub fn items(&self) -> &[Item] {
        &self.items
    }
}

impl Deref for CatalogSnapshot {
    type Target = [Item];

    fn deref(&self) -> &[Item] {
        &self.items
    }
}

impl From<Vec<Item>> for CatalogSnapshot {
    fn from(items: Vec<Item>) -> Self {
        Self {
            items: Arc::from(items),
        }
    }
}
