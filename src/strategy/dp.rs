use super::{SelectionStrategy, TickContext};
use crate::catalog::Catalog;
use crate::diff::{diff, Operation};
use crate::dp::{DpConfig, DpWorker, KnapsackSolver};
use crate::error::Result;
use crate::solution::Solution;
use tracing::debug;

/// Plans the cart with the exact knapsack solver running on a worker
/// thread.
///
/// Catalog growth is sent to the worker as a snapshot; finished solutions
/// are picked up on later ticks and turned into operations against the last
/// plan this strategy committed to.
pub struct DpStrategy {
    catalog: Catalog,
    worker: DpWorker,
    committed: Solution,
}

impl DpStrategy {
    /// Spawns the worker.
    pub fn new(capacity: f64, config: &DpConfig) -> Result<Self> {
        config.validate()?;
        let solver = KnapsackSolver::new(capacity, config.bounds);
        Ok(Self {
            catalog: Catalog::new(),
            worker: DpWorker::spawn(solver, config.poll_interval())?,
            committed: Solution::new(),
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The plan the emitted operations lead to.
    pub fn committed(&self) -> &Solution {
        &self.committed
    }

    /// Stops the worker thread and waits for it.
    pub fn shutdown(self) {
        self.worker.shutdown();
    }
}

impl SelectionStrategy for DpStrategy {
    fn name(&self) -> &str {
        "dynamic-programming"
    }

    fn on_tick(&mut self, ctx: &TickContext<'_>) -> Result<Vec<Operation>> {
        if self.catalog.observe_all(ctx.observed) > 0 {
            self.worker.submit(self.catalog.snapshot())?;
        }

        let Some(outcome) = self.worker.try_recv() else {
            return Ok(Vec::new());
        };
        let ops = diff(&self.committed, &outcome.solution, self.catalog.items());
        if !ops.is_empty() {
            debug!(
                catalog = outcome.catalog_len,
                value = outcome.solution.total_value(),
                operations = ops.len(),
                "knapsack plan accepted"
            );
        }
        self.committed = outcome.solution;
        Ok(ops)
    }
}
