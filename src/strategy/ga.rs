use super::{SelectionStrategy, TickContext};
use crate::catalog::Catalog;
use crate::diff::Operation;
use crate::error::Result;
use crate::ga::{GaConfig, GaStep, GeneticSolver};

/// Plans the cart with a [`GeneticSolver`] stepped on the control loop.
#[derive(Debug)]
pub struct GaStrategy {
    catalog: Catalog,
    solver: GeneticSolver,
}

impl GaStrategy {
    pub fn new(capacity: f64, config: GaConfig) -> Result<Self> {
        Ok(Self {
            catalog: Catalog::new(),
            solver: GeneticSolver::new(capacity, config)?,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn solver(&self) -> &GeneticSolver {
        &self.solver
    }
}

impl SelectionStrategy for GaStrategy {
    fn name(&self) -> &str {
        "genetic"
    }

    fn on_tick(&mut self, ctx: &TickContext<'_>) -> Result<Vec<Operation>> {
        self.catalog.observe_all(ctx.observed);
        match self.solver.on_tick(ctx.tick, self.catalog.items()) {
            GaStep::Improved(ops) => Ok(ops),
            GaStep::Throttled | GaStep::Dormant | GaStep::Evolved => Ok(Vec::new()),
        }
    }
}
