//! Tournament selection.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"

use super::types::Individual;
use rand::Rng;

/// Picks `k` individuals at random (with replacement) and returns the index
/// of the fittest. Higher fitness wins; ties keep the earlier draw.
///
/// # Panics
/// Panics if `population` is empty.
pub fn tournament<R: Rng>(population: &[Individual], k: usize, rng: &mut R) -> usize {
    assert!(
        !population.is_empty(),
        "cannot select from empty population"
    );
    let k = k.max(1);
    let n = population.len();

    let mut best_idx = rng.random_range(0..n);
    for _ in 1..k {
        let idx = rng.random_range(0..n);
        if population[idx].fitness > population[best_idx].fitness {
            best_idx = idx;
        }
    }
    best_idx
}

/// Runs `count` independent tournaments.
pub fn select_parents<R: Rng>(
    population: &[Individual],
    k: usize,
    count: usize,
    rng: &mut R,
) -> Vec<usize> {
    (0..count).map(|_| tournament(population, k, rng)).collect()
}
