//! Genetic operators over sparse count vectors.
//!
//! All operators take the current catalog `items` as the index domain, so
//! individuals created before the catalog grew are extended with zero
//! counts on the fly.
//!
//! - [`random_individual`]: seed a solution with random unit increments
//! - [`uniform_crossover`]: per-index parent choice, complementary siblings
//! - [`step_mutation`]: per-index ±1 with a floor at zero

use crate::catalog::Item;
use crate::solution::Solution;
use rand::Rng;

/// Creates a solution by adding `increments` units of uniformly chosen items.
///
/// # Panics
/// Panics if `items` is empty.
pub fn random_individual<R: Rng>(items: &[Item], increments: usize, rng: &mut R) -> Solution {
    assert!(!items.is_empty(), "cannot seed from an empty catalog");
    let mut solution = Solution::new();
    for _ in 0..increments {
        solution.increment(rng.random_range(0..items.len()), items);
    }
    solution
}

/// Uniform crossover.
///
/// For every index independently, child one takes its count from a parent
/// chosen with equal probability and child two takes the other parent's
/// count, so the pair together preserves both parents' genes.
///
/// # Complexity
/// O(n) in the catalog size
pub fn uniform_crossover<R: Rng>(
    a: &Solution,
    b: &Solution,
    items: &[Item],
    rng: &mut R,
) -> (Solution, Solution) {
    let n = items.len();
    let mut first = Vec::with_capacity(n);
    let mut second = Vec::with_capacity(n);
    for i in 0..n {
        if rng.random_bool(0.5) {
            first.push(b.get(i));
            second.push(a.get(i));
        } else {
            first.push(a.get(i));
            second.push(b.get(i));
        }
    }
    (
        Solution::from_counts(first, items),
        Solution::from_counts(second, items),
    )
}

/// Step mutation.
///
/// Each index independently, with probability `rate`, gains or loses one
/// unit with equal chance. A decrement that would go below zero is skipped.
pub fn step_mutation<R: Rng>(solution: &mut Solution, items: &[Item], rate: f64, rng: &mut R) {
    if rate <= 0.0 {
        return;
    }
    for i in 0..items.len() {
        if !rng.random_bool(rate) {
            continue;
        }
        let held = solution.get(i);
        if rng.random_bool(0.5) {
            solution.put(i, held + 1, items);
        } else if held > 0 {
            solution.put(i, held - 1, items);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn items(n: u64) -> Vec<Item> {
        (0..n).map(|i| Item::new(i, 1.0, 1.0 + i as f64)).collect()
    }

    #[test]
    fn test_random_individual_increments() {
        let items = items(5);
        let mut rng = StdRng::seed_from_u64(3);
        let s = random_individual(&items, 10, &mut rng);
        assert_eq!(s.total_count(), 10);
        assert!((s.total_size() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_crossover_children_are_complementary() {
        let items = items(6);
        let a = Solution::from_counts(vec![1, 2, 3, 4, 5, 6], &items);
        let b = Solution::from_counts(vec![9, 8, 7], &items);
        let mut rng = StdRng::seed_from_u64(11);

        let (c1, c2) = uniform_crossover(&a, &b, &items, &mut rng);
        for i in 0..items.len() {
            let pair = (c1.get(i), c2.get(i));
            assert!(
                pair == (a.get(i), b.get(i)) || pair == (b.get(i), a.get(i)),
                "index {i}: {pair:?}"
            );
        }
        let parents = a.total_value() + b.total_value();
        assert!((c1.total_value() + c2.total_value() - parents).abs() < 1e-9);
    }

    #[test]
    fn test_crossover_covers_grown_catalog() {
        let items = items(4);
        let a = Solution::from_counts(vec![1], &items[..1]);
        let b = Solution::from_counts(vec![0, 1], &items[..2]);
        let mut rng = StdRng::seed_from_u64(5);
        let (c1, c2) = uniform_crossover(&a, &b, &items, &mut rng);
        assert_eq!(c1.len(), 4);
        assert_eq!(c2.len(), 4);
        assert_eq!(c1.get(3) + c2.get(3), 0);
    }

    #[test]
    fn test_mutation_keeps_aggregates_consistent() {
        let items = items(8);
        let mut rng = StdRng::seed_from_u64(9);
        let mut s = Solution::new();
        for _ in 0..200 {
            step_mutation(&mut s, &items, 1.0, &mut rng);
        }
        let recomputed = Solution::from_counts(s.counts().to_vec(), &items);
        assert!((s.total_size() - recomputed.total_size()).abs() < 1e-6);
    }

    #[test]
    fn test_zero_rate_is_noop() {
        let items = items(3);
        let mut s = Solution::from_counts(vec![1, 1, 1], &items);
        let before = s.clone();
        let mut rng = StdRng::seed_from_u64(1);
        step_mutation(&mut s, &items, 0.0, &mut rng);
        assert!(s.same_counts(&before));
    }

    #[test]
    fn test_full_rate_moves_every_index_by_one() {
        let items = items(10);
        let base = Solution::from_counts(vec![3; 10], &items);
        let mut s = base.clone();
        let mut rng = StdRng::seed_from_u64(2);
        step_mutation(&mut s, &items, 1.0, &mut rng);
        for i in 0..10 {
            let moved = s.get(i) as i64 - base.get(i) as i64;
            assert!(moved.abs() == 1, "index {i} moved by {moved}");
        }
    }
}
