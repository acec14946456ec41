//! Item selection strategies.
//!
//! A [`SelectionStrategy`] decides, tick by tick, what the agent should put
//! in its cart. Optimizing strategies return [`Operation`]s for the
//! executor to carry out; opportunistic ones commit directly through the
//! authority when the item is at hand.
//!
//! | Strategy | Decision |
//! |---|---|
//! | [`DpStrategy`] | exact unbounded knapsack, solved on a worker thread |
//! | [`GaStrategy`] | incremental genetic search on the control loop |
//! | [`GreedySelection`] | highest discount in sight |
//! | [`SavingsRatioSelection`] | normalized saving/size ratio threshold |

mod dp;
mod ga;
mod greedy;
mod ratio;

pub use dp::DpStrategy;
pub use ga::GaStrategy;
pub use greedy::GreedySelection;
pub use ratio::{SavingsRatioSelection, ACCEPTANCE_THRESHOLD};

use crate::authority::{AgentId, CapacityAuthority};
use crate::catalog::{Item, Point};
use crate::diff::Operation;
use crate::error::Result;

/// What a strategy can see and do on one control-loop tick.
pub struct TickContext<'a> {
    pub tick: u64,
    pub agent: AgentId,
    pub position: Point,
    /// Every item currently in view.
    pub observed: &'a [Item],
    /// The item directly ahead, if any.
    pub peeked: Option<&'a Item>,
    pub authority: &'a dyn CapacityAuthority,
}

/// Per-agent item selection policy.
pub trait SelectionStrategy: Send {
    fn name(&self) -> &str;

    /// Reacts to one tick and returns operations to queue, in order.
    ///
    /// # Errors
    /// Fails if a background solver has gone away. Malformed items in view
    /// are skipped, not reported.
    fn on_tick(&mut self, ctx: &TickContext<'_>) -> Result<Vec<Operation>>;
}
