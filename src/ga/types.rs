//! Population member type.

use crate::solution::{Solution, INVALID_FITNESS};

/// A candidate solution in the GA population.
///
/// Fitness is computed once when the individual is created; items are
/// immutable, so it stays correct as the catalog grows.
#[derive(Debug, Clone)]
pub struct Individual {
    pub solution: Solution,
    pub fitness: f64,
}

impl Individual {
    /// Wraps a solution, evaluating it against `capacity`.
    pub fn evaluate(solution: Solution, capacity: f64) -> Self {
        let fitness = solution.fitness(capacity);
        Self { solution, fitness }
    }

    pub fn is_valid(&self) -> bool {
        self.fitness != INVALID_FITNESS
    }
}

/// Summary of the population after a generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationStats {
    pub generation: usize,
    pub best_fitness: f64,
    /// Mean fitness over valid individuals; zero if none are valid.
    pub mean_valid_fitness: f64,
    pub invalid_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Item;

    #[test]
    fn test_evaluate_marks_overweight_invalid() {
        let items = vec![Item::new(0, 6.0, 2.0)];
        let ok = Individual::evaluate(Solution::from_counts(vec![1], &items), 10.0);
        let heavy = Individual::evaluate(Solution::from_counts(vec![2], &items), 10.0);
        assert!(ok.is_valid());
        assert!((ok.fitness - 2.0).abs() < 1e-12);
        assert!(!heavy.is_valid());
        assert_eq!(heavy.fitness, INVALID_FITNESS);
    }
}
