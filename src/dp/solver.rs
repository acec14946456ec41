//! Exact unbounded-knapsack solver (UKP5).
//!
//! Item sizes are rounded up and the capacity down to integers, so the
//! returned solution never exceeds the real capacity. The solver is exact
//! for the rounded problem, which is the real problem only when sizes and
//! capacity are whole numbers. With fractional sizes a finer search (the
//! genetic solver, say) can pack more: one item of size 2.5 in a cart of
//! 10 is taken 3 times here, though 4 fit.
//!
//! # Algorithm
//!
//! `g[y]` is the best saved value found for total weight exactly `y` and
//! `d[y]` the position (in efficiency order) of the last item used to reach
//! it. Base cases are seeded from each item's own weight. The sweep then
//! visits `y` upward from the smallest weight; a `y` whose value does not beat
//! the best seen so far is dominated and skipped, otherwise every item up to
//! position `d[y]` relaxes `g[y + w_i]`. Restricting extensions to positions
//! `<= d[y]` enumerates each multiset once, and sorting by efficiency first
//! keeps the restriction from losing any optimum.
//!
//! # References
//!
//! - Becker & Buriol (2016), "An empirical analysis of exact algorithms for
//!   the unbounded knapsack problem"

use super::config::KnapsackBounds;
use crate::catalog::Item;
use crate::error::Result;
use crate::solution::Solution;
use std::cmp::Ordering;

/// Deterministic exact solver, recomputed from scratch per call.
#[derive(Debug, Clone)]
pub struct KnapsackSolver {
    capacity: f64,
    bounds: KnapsackBounds,
}

impl KnapsackSolver {
    pub fn new(capacity: f64, bounds: KnapsackBounds) -> Self {
        Self { capacity, bounds }
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Returns the count vector maximizing saved value within capacity.
    ///
    /// Any item may be taken any number of times. An empty catalog yields the
    /// empty solution.
    ///
    /// # Errors
    /// [`ShopError::InvalidItem`](crate::error::ShopError::InvalidItem) if an
    /// item has a non-positive size or a negative saved value.
    pub fn solve(&self, items: &[Item]) -> Result<Solution> {
        for item in items {
            item.validate()?;
        }
        let n = items.len();
        if n == 0 || self.capacity.is_nan() || self.capacity < 1.0 {
            return Ok(Solution::from_counts(vec![0; n], items));
        }

        let c = self.capacity.floor() as usize;
        let weights: Vec<usize> = items.iter().map(|it| integer_weight(it.size)).collect();

        // Items heavier than the cart can never be taken; keeping them out
        // also keeps the tables bounded by the capacity.
        let mut order = efficiency_order(items, &weights);
        order.retain(|&i| weights[i] <= c);
        if order.is_empty() {
            return Ok(Solution::from_counts(vec![0; n], items));
        }

        let observed_min = order.iter().map(|&i| weights[i]).min().unwrap_or(1);
        let observed_max = order.iter().map(|&i| weights[i]).max().unwrap_or(1);
        let wmin = integer_weight(self.bounds.min_weight).min(observed_min);
        let wmax = integer_weight(self.bounds.max_weight).max(observed_max).min(c);

        let len = c + wmax + 1;
        let mut g = vec![0.0f64; len];
        let mut d = vec![order.len() - 1; len];

        for (pos, &i) in order.iter().enumerate() {
            let wi = weights[i];
            let vi = items[i].saved_value;
            if g[wi] < vi {
                g[wi] = vi;
                d[wi] = pos;
            }
        }

        let mut opt = 0.0f64;
        let mut yopt = 0usize;

        for y in wmin..=c {
            if g[y] <= opt {
                continue;
            }
            opt = g[y];
            yopt = y;

            for (pos, &i) in order.iter().enumerate().take(d[y] + 1) {
                let candidate = g[y] + items[i].saved_value;
                let target = y + weights[i];
                if g[target] < candidate {
                    g[target] = candidate;
                    d[target] = pos;
                }
            }
        }

        let mut counts = vec![0u32; n];
        let mut y = yopt;
        while y > 0 {
            let i = order[d[y]];
            counts[i] += 1;
            y = y.saturating_sub(weights[i]);
        }

        Ok(Solution::from_counts(counts, items))
    }
}

/// Smallest integer weight not below `size`, never zero.
fn integer_weight(size: f64) -> usize {
    (size.ceil() as usize).max(1)
}

/// Catalog indices sorted by non-increasing value per integer weight.
///
/// Ties prefer the lighter item, then the lower index, so the order is
/// deterministic.
fn efficiency_order(items: &[Item], weights: &[usize]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| {
        let ea = items[a].saved_value / weights[a] as f64;
        let eb = items[b].saved_value / weights[b] as f64;
        eb.partial_cmp(&ea)
            .unwrap_or(Ordering::Equal)
            .then(weights[a].cmp(&weights[b]))
            .then(a.cmp(&b))
    });
    order
}
