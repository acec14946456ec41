//! Incremental evolutionary loop.
//!
//! [`GeneticSolver`] is driven by the control loop rather than run to
//! completion: every [`on_tick`](GeneticSolver::on_tick) call that passes the
//! throttle performs one generation over the catalog as it stands, and
//! reports the operations needed to move the cart from the last emitted best
//! to a strictly better one.
//!
//! One generation:
//! tournament selection → pairwise uniform crossover → step mutation →
//! replace the `G` least fit → re-sort.

use super::config::GaConfig;
use super::operators::{random_individual, step_mutation, uniform_crossover};
use super::selection::select_parents;
use super::types::{GenerationStats, Individual};
use crate::catalog::Item;
use crate::diff::{diff, Operation};
use crate::error::Result;
use crate::solution::{Solution, FITNESS_EPSILON, INVALID_FITNESS};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cmp::Ordering;
use tracing::{debug, info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// What a call to [`GeneticSolver::on_tick`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum GaStep {
    /// Not a thinking tick.
    Throttled,
    /// The catalog is still below the activation threshold.
    Dormant,
    /// A generation ran without beating the emitted best.
    Evolved,
    /// A generation found a strictly better valid solution; the operations
    /// move the cart from the previous best to it.
    Improved(Vec<Operation>),
}

/// Population-based approximate solver for the cart problem.
#[derive(Debug)]
pub struct GeneticSolver {
    config: GaConfig,
    capacity: f64,
    rng: StdRng,
    population: Vec<Individual>,
    emitted: Option<Individual>,
    generation: usize,
}

impl GeneticSolver {
    /// Creates a dormant solver.
    ///
    /// # Errors
    /// [`ShopError::InvalidConfig`](crate::error::ShopError::InvalidConfig)
    /// if the configuration does not validate.
    pub fn new(capacity: f64, config: GaConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };
        Ok(Self {
            config,
            capacity,
            rng,
            population: Vec::new(),
            emitted: None,
            generation: 0,
        })
    }

    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// Whether the population has been seeded.
    pub fn is_active(&self) -> bool {
        !self.population.is_empty()
    }

    /// Generations run so far.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// The population, fittest first.
    pub fn population(&self) -> &[Individual] {
        &self.population
    }

    /// The fittest individual currently in the population.
    pub fn best(&self) -> Option<&Individual> {
        self.population.first()
    }

    /// The last solution reported through [`GaStep::Improved`].
    pub fn emitted(&self) -> Option<&Solution> {
        self.emitted.as_ref().map(|ind| &ind.solution)
    }

    /// Runs a generation if `tick` is a thinking tick.
    pub fn on_tick(&mut self, tick: u64, items: &[Item]) -> GaStep {
        if tick % self.config.think_ticks != 0 {
            return GaStep::Throttled;
        }
        self.step(items)
    }

    /// Runs one generation over `items`, activating first if the catalog has
    /// just reached the threshold.
    pub fn step(&mut self, items: &[Item]) -> GaStep {
        if !self.is_active() {
            if items.len() < self.config.min_seen_items {
                return GaStep::Dormant;
            }
            self.seed_population(items);
        }

        let g = self.config.replacement_count();
        let parents = select_parents(
            &self.population,
            self.config.tournament_size,
            g,
            &mut self.rng,
        );
        let seeds: Vec<u64> = (0..g / 2).map(|_| self.rng.random()).collect();
        let children = self.breed(&parents, &seeds, items);

        self.population.truncate(self.config.population_size - g);
        self.population.extend(children);
        sort_fittest_first(&mut self.population);
        self.generation += 1;

        self.check_improvement(items)
    }

    /// Fitness summary of the current population.
    pub fn stats(&self) -> GenerationStats {
        let valid: Vec<f64> = self
            .population
            .iter()
            .filter(|ind| ind.is_valid())
            .map(|ind| ind.fitness)
            .collect();
        let mean_valid_fitness = if valid.is_empty() {
            0.0
        } else {
            valid.iter().sum::<f64>() / valid.len() as f64
        };
        GenerationStats {
            generation: self.generation,
            best_fitness: self.best().map_or(INVALID_FITNESS, |ind| ind.fitness),
            mean_valid_fitness,
            invalid_count: self.population.len() - valid.len(),
        }
    }

    fn seed_population(&mut self, items: &[Item]) {
        let increments = self.config.initial_increments;
        self.population = (0..self.config.population_size)
            .map(|_| {
                let solution = random_individual(items, increments, &mut self.rng);
                Individual::evaluate(solution, self.capacity)
            })
            .collect();
        sort_fittest_first(&mut self.population);
        info!(
            items = items.len(),
            population = self.population.len(),
            "genetic solver activated"
        );
    }

    /// Produces two children per parent pair.
    ///
    /// Each pair draws from its own RNG seeded from `seeds`, so the result
    /// does not depend on whether pairs are bred in parallel.
    fn breed(&self, parents: &[usize], seeds: &[u64], items: &[Item]) -> Vec<Individual> {
        let make_pair = |pair: usize, seed: u64| -> [Individual; 2] {
            let mut rng = StdRng::seed_from_u64(seed);
            let a = &self.population[parents[2 * pair]].solution;
            let b = &self.population[parents[2 * pair + 1]].solution;

            let (mut c1, mut c2) = if rng.random_bool(self.config.crossover_rate) {
                uniform_crossover(a, b, items, &mut rng)
            } else {
                (a.clone(), b.clone())
            };
            step_mutation(&mut c1, items, self.config.mutation_rate, &mut rng);
            step_mutation(&mut c2, items, self.config.mutation_rate, &mut rng);
            [
                Individual::evaluate(c1, self.capacity),
                Individual::evaluate(c2, self.capacity),
            ]
        };

        #[cfg(feature = "parallel")]
        if self.config.parallel {
            return seeds
                .par_iter()
                .enumerate()
                .flat_map_iter(|(pair, &seed)| make_pair(pair, seed))
                .collect();
        }

        seeds
            .iter()
            .enumerate()
            .flat_map(|(pair, &seed)| make_pair(pair, seed))
            .collect()
    }

    fn check_improvement(&mut self, items: &[Item]) -> GaStep {
        let Some(best) = self.population.first() else {
            return GaStep::Evolved;
        };
        if !best.is_valid() {
            warn!(generation = self.generation, "best solution in population is invalid");
            return GaStep::Evolved;
        }

        let improved = match &self.emitted {
            None => true,
            Some(prev) => {
                best.fitness > prev.fitness + FITNESS_EPSILON
                    && !best.solution.same_counts(&prev.solution)
            }
        };
        if !improved {
            return GaStep::Evolved;
        }

        let empty = Solution::new();
        let previous = self.emitted.as_ref().map_or(&empty, |ind| &ind.solution);
        let ops = diff(previous, &best.solution, items);
        debug!(
            generation = self.generation,
            fitness = best.fitness,
            operations = ops.len(),
            "genetic solver improved"
        );
        self.emitted = Some(best.clone());
        GaStep::Improved(ops)
    }
}

fn sort_fittest_first(population: &mut [Individual]) {
    population.sort_by(|a, b| b.fitness.partial_cmp(&a.fitness).unwrap_or(Ordering::Equal));
}
