//! Sparse, growable count vectors over the catalog.
//!
//! A [`Solution`] maps catalog indices to held counts and caches its
//! aggregate size and saved value. The catalog grows while solutions are
//! alive, so every read past the end of the stored vector yields zero and
//! every write past the end backfills zeros first.

use crate::catalog::{Item, ItemIndex};

/// Fitness of a solution whose total size exceeds the capacity.
pub const INVALID_FITNESS: f64 = -1.0;

/// Minimum fitness gain treated as an improvement.
///
/// Aggregates are maintained incrementally, so two solutions holding the
/// same items may differ in the last few bits.
pub const FITNESS_EPSILON: f64 = 1e-9;

/// A held count per catalog index, plus cached aggregates.
#[derive(Debug, Clone, Default)]
pub struct Solution {
    counts: Vec<u32>,
    total_size: f64,
    total_value: f64,
}

impl Solution {
    /// The empty solution: nothing held.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a solution from explicit counts.
    ///
    /// `counts[i]` refers to `items[i]`; entries past `items.len()` are
    /// dropped since they name no item.
    pub fn from_counts(mut counts: Vec<u32>, items: &[Item]) -> Self {
        counts.truncate(items.len());
        let (total_size, total_value) = counts
            .iter()
            .zip(items)
            .fold((0.0, 0.0), |(s, v), (&c, item)| {
                (s + item.size * c as f64, v + item.saved_value * c as f64)
            });
        Self {
            counts,
            total_size,
            total_value,
        }
    }

    /// Count held at `index`; zero for indices never written.
    pub fn get(&self, index: ItemIndex) -> u32 {
        self.counts.get(index).copied().unwrap_or(0)
    }

    /// Number of indices explicitly stored.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// Total number of held units across all indices.
    pub fn total_count(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    pub fn total_size(&self) -> f64 {
        self.total_size
    }

    pub fn total_value(&self) -> f64 {
        self.total_value
    }

    /// Adds one unit of `items[index]`.
    ///
    /// # Panics
    /// Panics if `index` is out of range for `items`.
    pub fn increment(&mut self, index: ItemIndex, items: &[Item]) {
        let item = &items[index];
        self.backfill_to(index);
        self.counts[index] += 1;
        self.total_size += item.size;
        self.total_value += item.saved_value;
    }

    /// Sets the count at `index`, keeping the aggregates consistent.
    ///
    /// # Panics
    /// Panics if `index` is out of range for `items`.
    pub fn put(&mut self, index: ItemIndex, count: u32, items: &[Item]) {
        let item = &items[index];
        self.backfill_to(index);
        let old = self.counts[index] as f64;
        let new = count as f64;
        self.total_size += item.size * (new - old);
        self.total_value += item.saved_value * (new - old);
        self.counts[index] = count;
    }

    /// Whether the aggregate size fits within `capacity`.
    pub fn is_valid(&self, capacity: f64) -> bool {
        self.total_size <= capacity
    }

    /// Aggregate saved value, or [`INVALID_FITNESS`] when over capacity.
    pub fn fitness(&self, capacity: f64) -> f64 {
        if self.is_valid(capacity) {
            self.total_value
        } else {
            INVALID_FITNESS
        }
    }

    /// Compares held counts index-wise, treating missing entries as zero.
    pub fn same_counts(&self, other: &Solution) -> bool {
        let n = self.counts.len().max(other.counts.len());
        (0..n).all(|i| self.get(i) == other.get(i))
    }

    /// Iterates over `(index, count)` for every index holding at least one unit.
    pub fn held(&self) -> impl Iterator<Item = (ItemIndex, u32)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &c)| c > 0)
            .map(|(i, &c)| (i, c))
    }

    fn backfill_to(&mut self, index: ItemIndex) {
        if index >= self.counts.len() {
            self.counts.resize(index + 1, 0);
        }
    }
}
