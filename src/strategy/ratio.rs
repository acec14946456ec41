use super::{SelectionStrategy, TickContext};
use crate::catalog::{Item, ItemId};
use crate::config::ShopperConfig;
use crate::diff::Operation;
use crate::error::Result;
use tracing::debug;

/// Normalized saving/size ratio an item must exceed to be taken.
pub const ACCEPTANCE_THRESHOLD: f64 = 1.7;

/// Takes the item directly ahead when its saving is high relative to its
/// size.
///
/// Saving and size are both normalized into `[0, 1]` against the ranges
/// items are generated from, and each item is judged once per sighting.
#[derive(Debug, Clone)]
pub struct SavingsRatioSelection {
    min_saving: f64,
    max_saving: f64,
    min_size: f64,
    max_size: f64,
    last_viewed: Option<ItemId>,
}

impl SavingsRatioSelection {
    pub fn new(config: &ShopperConfig) -> Self {
        Self {
            min_saving: config.min_saving,
            max_saving: config.max_saving,
            min_size: config.min_size,
            max_size: config.max_size,
            last_viewed: None,
        }
    }

    /// Normalized saving divided by normalized size.
    pub fn ratio(&self, item: &Item) -> f64 {
        let saving = (item.saved_value - self.min_saving) / (self.max_saving - self.min_saving);
        let size = (item.size - self.min_size) / (self.max_size - self.min_size);
        saving / size
    }
}

impl SelectionStrategy for SavingsRatioSelection {
    fn name(&self) -> &str {
        "savings-ratio"
    }

    fn on_tick(&mut self, ctx: &TickContext<'_>) -> Result<Vec<Operation>> {
        let Some(item) = ctx.peeked else {
            return Ok(Vec::new());
        };
        if self.last_viewed == Some(item.id) {
            return Ok(Vec::new());
        }

        let ratio = self.ratio(item);
        if ratio > ACCEPTANCE_THRESHOLD
            && ctx.authority.can_add(ctx.agent, item)
            && ctx.authority.add_item(ctx.agent, ctx.position, item)
        {
            debug!(agent = %ctx.agent, item = %item.id, ratio, "ratio pick");
        }
        self.last_viewed = Some(item.id);
        Ok(Vec::new())
    }
}
