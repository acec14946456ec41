use super::{SelectionStrategy, TickContext};
use crate::diff::Operation;
use crate::error::Result;
use tracing::debug;

/// Takes the most discounted item in view whenever it fits.
#[derive(Debug, Default)]
pub struct GreedySelection;

impl GreedySelection {
    pub fn new() -> Self {
        Self
    }
}

impl SelectionStrategy for GreedySelection {
    fn name(&self) -> &str {
        "greedy"
    }

    fn on_tick(&mut self, ctx: &TickContext<'_>) -> Result<Vec<Operation>> {
        let mut best = None;
        let mut max_discount = f64::NEG_INFINITY;
        for item in ctx.observed {
            if item.discount > max_discount {
                max_discount = item.discount;
                best = Some(item);
            }
        }

        if let Some(item) = best {
            if ctx.authority.can_add(ctx.agent, item)
                && ctx.authority.add_item(ctx.agent, ctx.position, item)
            {
                debug!(agent = %ctx.agent, item = %item.id, discount = item.discount, "greedy pick");
            }
        }
        Ok(Vec::new())
    }
}
