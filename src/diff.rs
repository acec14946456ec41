//! Conversion of solution changes into fetch/discard operations.
//!
//! The differ is stateless: callers keep the last committed [`Solution`]
//! and invoke [`diff`] once per newly accepted one. All discards are emitted
//! before any fetch so the cart never transiently exceeds capacity when a
//! heavy item replaces several light ones.

use crate::catalog::{Item, ItemIndex};
use crate::solution::Solution;
use serde::{Deserialize, Serialize};

/// What an [`Operation`] does to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    /// Walk to the item and add one unit to the cart.
    Fetch,
    /// Walk to the item and put one unit back.
    Discard,
}

/// One unit of cart change against a specific catalog item.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub kind: OperationKind,
    pub index: ItemIndex,
    pub item: Item,
}

impl Operation {
    pub fn fetch(index: ItemIndex, item: Item) -> Self {
        Self {
            kind: OperationKind::Fetch,
            index,
            item,
        }
    }

    pub fn discard(index: ItemIndex, item: Item) -> Self {
        Self {
            kind: OperationKind::Discard,
            index,
            item,
        }
    }
}

/// Signed per-index difference `new[i] - old[i]` over `[0, len)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delta {
    changes: Vec<i64>,
}

impl Delta {
    /// Computes the delta over the index domain `[0, domain)`.
    ///
    /// Either side may be shorter than `domain`; missing entries count as
    /// zero.
    pub fn between(old: &Solution, new: &Solution, domain: usize) -> Self {
        let changes = (0..domain)
            .map(|i| new.get(i) as i64 - old.get(i) as i64)
            .collect();
        Self { changes }
    }

    pub fn get(&self, index: ItemIndex) -> i64 {
        self.changes.get(index).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Whether applying this delta changes nothing.
    pub fn is_zero(&self) -> bool {
        self.changes.iter().all(|&c| c == 0)
    }

    /// Expands the delta into unit operations.
    ///
    /// Discards for every negative entry come first, then fetches for every
    /// positive entry; both passes walk indices in ascending order.
    ///
    /// # Panics
    /// Panics if `items` is shorter than the delta's domain.
    pub fn operations(&self, items: &[Item]) -> Vec<Operation> {
        let total: u64 = self.changes.iter().map(|c| c.unsigned_abs()).sum();
        let mut ops = Vec::with_capacity(total as usize);
        for (i, &change) in self.changes.iter().enumerate() {
            if change < 0 {
                for _ in 0..change.unsigned_abs() {
                    ops.push(Operation::discard(i, items[i].clone()));
                }
            }
        }
        for (i, &change) in self.changes.iter().enumerate() {
            if change > 0 {
                for _ in 0..change {
                    ops.push(Operation::fetch(i, items[i].clone()));
                }
            }
        }
        ops
    }
}

/// Operations that turn `old` into `new` over the whole of `items`.
pub fn diff(old: &Solution, new: &Solution, items: &[Item]) -> Vec<Operation> {
    Delta::between(old, new, items.len()).operations(items)
}

/// Applies operations to a solution in order.
///
/// A discard of an index holding nothing is ignored.
pub fn apply(solution: &mut Solution, ops: &[Operation], items: &[Item]) {
    for op in ops {
        let held = solution.get(op.index);
        match op.kind {
            OperationKind::Fetch => solution.put(op.index, held + 1, items),
            OperationKind::Discard => solution.put(op.index, held.saturating_sub(1), items),
        }
    }
}
