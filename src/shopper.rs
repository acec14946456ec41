//! The shopping agent.
//!
//! A [`Shopper`] owns one [`SelectionStrategy`] and one [`Executor`] and
//! advances both once per control-loop tick. The strategy only runs while
//! the agent is free; once operations are queued it stays suspended until
//! the executor has carried them out and brought the agent back.

use crate::authority::{AgentId, CapacityAuthority};
use crate::catalog::Item;
use crate::error::Result;
use crate::executor::{Executor, Navigator};
use crate::strategy::{SelectionStrategy, TickContext};
use std::sync::Arc;

pub struct Shopper<N: Navigator> {
    name: String,
    strategy: Box<dyn SelectionStrategy>,
    executor: Executor<N>,
    tick: u64,
}

impl<N: Navigator> Shopper<N> {
    pub fn new(
        name: impl Into<String>,
        agent: AgentId,
        navigator: N,
        authority: Arc<dyn CapacityAuthority>,
        strategy: Box<dyn SelectionStrategy>,
    ) -> Self {
        Self {
            name: name.into(),
            strategy,
            executor: Executor::new(agent, navigator, authority),
            tick: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn agent(&self) -> AgentId {
        self.executor.agent()
    }

    pub fn strategy(&self) -> &dyn SelectionStrategy {
        self.strategy.as_ref()
    }

    pub fn executor(&self) -> &Executor<N> {
        &self.executor
    }

    pub fn executor_mut(&mut self) -> &mut Executor<N> {
        &mut self.executor
    }

    /// Ticks completed so far.
    pub fn ticks(&self) -> u64 {
        self.tick
    }

    /// Runs one control-loop tick.
    ///
    /// `observed` is everything currently in view and `peeked` the item
    /// directly ahead. Both are ignored while the executor is busy.
    ///
    /// The executor advances even when the strategy fails; the strategy's
    /// error is returned afterwards.
    pub fn tick(&mut self, observed: &[Item], peeked: Option<&Item>) -> Result<()> {
        let mut planned = Ok(());
        if !self.executor.is_interrupted() {
            let ctx = TickContext {
                tick: self.tick,
                agent: self.executor.agent(),
                position: self.executor.navigator().position(),
                observed,
                peeked,
                authority: self.executor.authority(),
            };
            let outcome = self.strategy.on_tick(&ctx);
            planned = outcome.map(|ops| self.executor.enqueue_all(ops));
        }
        self.executor.tick();
        self.tick += 1;
        planned
    }
}
