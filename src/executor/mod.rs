//! Per-agent operation queue and its navigation state machine.
//!
//! The [`Executor`] drains a FIFO of [`Operation`]s one at a time: walk to
//! the item, ask the [`CapacityAuthority`] to commit, and once the queue is
//! empty walk back to where the agent was when the work arrived.
//!
//! ```text
//!            queue non-empty
//!   Idle ───────────────────────▶ Executing(op)
//!    ▲  ▲                            │   │ commit rejected: retry next tick
//!    │  └──── commit ok, queue ◀─────┘   │
//!    │        non-empty                  │ commit ok, queue empty
//!    │                                   ▼
//!    └────────── reached point ────── Returning
//! ```

mod types;

pub use types::{ExecutionState, Navigator, ReturnContext};

use crate::authority::{AgentId, CapacityAuthority};
use crate::catalog::{Item, ItemIndex};
use crate::diff::{Operation, OperationKind};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, warn};

/// Sequential executor for one agent.
pub struct Executor<N: Navigator> {
    agent: AgentId,
    navigator: N,
    authority: Arc<dyn CapacityAuthority>,
    queue: VecDeque<Operation>,
    state: ExecutionState,
    return_context: Option<ReturnContext>,
    rejected_commits: u64,
}

impl<N: Navigator> Executor<N> {
    pub fn new(agent: AgentId, navigator: N, authority: Arc<dyn CapacityAuthority>) -> Self {
        Self {
            agent,
            navigator,
            authority,
            queue: VecDeque::new(),
            state: ExecutionState::Idle,
            return_context: None,
            rejected_commits: 0,
        }
    }

    pub fn agent(&self) -> AgentId {
        self.agent
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut N {
        &mut self.navigator
    }

    pub fn authority(&self) -> &dyn CapacityAuthority {
        self.authority.as_ref()
    }

    pub fn state(&self) -> &ExecutionState {
        &self.state
    }

    pub fn return_context(&self) -> Option<&ReturnContext> {
        self.return_context.as_ref()
    }

    /// Operations waiting behind the one in flight.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Commit attempts the authority has turned down so far.
    ///
    /// Rejected operations are retried every tick without limit; a counter
    /// that keeps growing means the agent is stuck on one operation.
    pub fn rejected_commits(&self) -> u64 {
        self.rejected_commits
    }

    /// Whether queued work has taken over from the agent's own behavior.
    pub fn is_interrupted(&self) -> bool {
        self.return_context.is_some()
    }

    /// Queues a fetch of one unit of `item`.
    pub fn fetch(&mut self, index: ItemIndex, item: Item) {
        self.enqueue(Operation::fetch(index, item));
    }

    /// Queues a discard of one unit of `item`.
    pub fn discard(&mut self, index: ItemIndex, item: Item) {
        self.enqueue(Operation::discard(index, item));
    }

    /// Appends an operation.
    ///
    /// The first operation to arrive while the agent is at rest records the
    /// [`ReturnContext`]; later ones leave it alone.
    pub fn enqueue(&mut self, op: Operation) {
        if self.return_context.is_none() {
            self.return_context = Some(ReturnContext::capture(&self.navigator));
        }
        self.queue.push_back(op);
    }

    pub fn enqueue_all(&mut self, ops: impl IntoIterator<Item = Operation>) {
        for op in ops {
            self.enqueue(op);
        }
    }

    /// Advances the state machine by one transition at most.
    pub fn tick(&mut self) {
        let state = std::mem::take(&mut self.state);
        self.state = match state {
            ExecutionState::Idle => self.start_next(),
            ExecutionState::Executing(op) => self.execute(op),
            ExecutionState::Returning => self.finish_return(),
        };
    }

    fn start_next(&mut self) -> ExecutionState {
        let Some(op) = self.queue.pop_front() else {
            return ExecutionState::Idle;
        };
        self.navigator.set_autonomy(false);
        self.navigator.set_destination(op.item.position);
        debug!(agent = %self.agent, kind = ?op.kind, item = %op.item.id, "operation started");
        ExecutionState::Executing(op)
    }

    fn execute(&mut self, op: Operation) -> ExecutionState {
        if !self.navigator.has_reached_point() {
            return ExecutionState::Executing(op);
        }

        let at = self.navigator.position();
        let committed = match op.kind {
            OperationKind::Fetch => self.authority.add_item(self.agent, at, &op.item),
            OperationKind::Discard => self.authority.remove_item(self.agent, at, &op.item),
        };
        if !committed {
            self.rejected_commits += 1;
            warn!(
                agent = %self.agent,
                kind = ?op.kind,
                item = %op.item.id,
                attempts = self.rejected_commits,
                "commit rejected, retrying"
            );
            return ExecutionState::Executing(op);
        }

        self.navigator.clear_destination();
        if !self.queue.is_empty() {
            return ExecutionState::Idle;
        }
        match self.return_context {
            Some(ctx) => {
                self.navigator.set_destination(ctx.point);
                ExecutionState::Returning
            }
            None => {
                self.navigator.set_autonomy(true);
                ExecutionState::Idle
            }
        }
    }

    fn finish_return(&mut self) -> ExecutionState {
        if !self.navigator.has_reached_point() {
            return ExecutionState::Returning;
        }
        self.navigator.clear_destination();

        // Work that arrived on the way back keeps the original context.
        if !self.queue.is_empty() {
            return ExecutionState::Idle;
        }

        if let Some(ctx) = self.return_context.take() {
            self.navigator.set_heading(ctx.heading);
            if let Some(destination) = ctx.destination {
                self.navigator.set_destination(destination);
            }
        }
        self.navigator.set_autonomy(true);
        ExecutionState::Idle
    }
}


#[cfg(test)]
mod tests {
    use super::testing::MockNavigator;
    use super::*;
    use crate::authority::SharedCarts;
    use crate::catalog::{Heading, ItemId, Point};
    use parking_lot::Mutex;

    const AGENT: AgentId = AgentId(7);
    const P0: Point = Point {
        x: 1.0,
        y: 0.0,
        z: 1.0,
    };
    const R0: Heading = Heading(0.25);

    fn item_at(id: u64, x: f64) -> Item {
        Item::new(id, 2.0, 3.0).at(Point::new(x, 0.0, 4.0))
    }

    fn executor(carts: Arc<SharedCarts>) -> Executor<MockNavigator> {
        carts.register(AGENT, "tester");
        Executor::new(AGENT, MockNavigator::at(P0, R0), carts)
    }

    /// Authority that rejects every commit until told otherwise.
    struct Gate {
        open: Mutex<bool>,
    }

    impl CapacityAuthority for Gate {
        fn can_add(&self, _: AgentId, _: &Item) -> bool {
            *self.open.lock()
        }

        fn add_item(&self, _: AgentId, _: Point, _: &Item) -> bool {
            *self.open.lock()
        }

        fn remove_item(&self, _: AgentId, _: Point, _: &Item) -> bool {
            *self.open.lock()
        }
    }

    fn run_until_idle(exec: &mut Executor<MockNavigator>, max_ticks: usize) {
        for _ in 0..max_ticks {
            exec.tick();
            if exec.state().is_idle() && !exec.is_interrupted() {
                return;
            }
        }
        panic!("executor did not settle: {:?}", exec.state());
    }

    #[test]
    fn test_two_fetches_return_to_start() {
        let carts = Arc::new(SharedCarts::new(10.0, 0.5));
        let mut exec = executor(Arc::clone(&carts));
        exec.fetch(0, item_at(0, 5.0));
        exec.fetch(1, item_at(1, 9.0));

        let ctx = *exec.return_context().unwrap();
        assert_eq!(ctx.point, P0);
        assert_eq!(ctx.heading, R0);
        assert_eq!(ctx.destination, None);

        run_until_idle(&mut exec, 10);

        assert_eq!(carts.contents(AGENT), vec![ItemId(0), ItemId(1)]);
        assert_eq!(exec.state(), &ExecutionState::Idle);
        assert_eq!(exec.navigator().position, P0);
        assert_eq!(exec.navigator().heading, R0);
        assert_eq!(exec.navigator().destination, None);
        assert!(exec.navigator().autonomous);
    }

    #[test]
    fn test_transitions_step_by_step() {
        let carts = Arc::new(SharedCarts::new(10.0, 0.5));
        let mut exec = executor(carts);
        let a = item_at(0, 5.0);
        exec.fetch(0, a.clone());

        exec.tick();
        assert_eq!(exec.state().current().map(|op| op.item.id), Some(a.id));
        assert!(!exec.navigator().autonomous);

        exec.tick();
        assert_eq!(exec.state(), &ExecutionState::Returning);

        exec.tick();
        assert_eq!(exec.state(), &ExecutionState::Idle);
        assert!(!exec.is_interrupted());
    }

    #[test]
    fn test_rejected_commit_retries_same_operation() {
        let gate = Arc::new(Gate {
            open: Mutex::new(false),
        });
        let mut exec = Executor::new(AGENT, MockNavigator::at(P0, R0), gate.clone());
        let a = item_at(0, 5.0);
        exec.fetch(0, a.clone());
        exec.fetch(1, item_at(1, 6.0));

        exec.tick();
        for attempt in 1..=3 {
            exec.tick();
            let current = exec.state().current().expect("still executing");
            assert_eq!(current.item.id, a.id);
            assert_eq!(current.kind, OperationKind::Fetch);
            assert_eq!(exec.rejected_commits(), attempt);
            assert_eq!(exec.pending(), 1);
        }

        *gate.open.lock() = true;
        exec.tick();
        assert_eq!(exec.state(), &ExecutionState::Idle);
        assert_eq!(exec.pending(), 1);
    }

    #[test]
    fn test_waits_until_item_reached() {
        let carts = Arc::new(SharedCarts::new(10.0, 0.5));
        carts.register(AGENT, "tester");
        let nav = MockNavigator::at(P0, R0).manual();
        let mut exec = Executor::new(AGENT, nav, carts.clone());
        exec.fetch(0, item_at(0, 5.0));

        exec.tick();
        exec.tick();
        exec.tick();
        assert!(exec.state().current().is_some());
        assert!(carts.contents(AGENT).is_empty());
        assert_eq!(exec.rejected_commits(), 0);

        exec.navigator_mut().arrive();
        exec.tick();
        assert_eq!(exec.state(), &ExecutionState::Returning);
        assert_eq!(carts.contents(AGENT), vec![ItemId(0)]);

        exec.tick();
        assert_eq!(exec.state(), &ExecutionState::Returning);
        exec.navigator_mut().arrive();
        exec.tick();
        assert_eq!(exec.state(), &ExecutionState::Idle);
        assert_eq!(exec.navigator().heading, R0);
    }

    #[test]
    fn test_prior_destination_resumed() {
        let carts = Arc::new(SharedCarts::new(10.0, 0.5));
        carts.register(AGENT, "tester");
        let mut nav = MockNavigator::at(P0, R0).manual();
        let goal = Point::new(-3.0, 0.0, -3.0);
        nav.destination = Some(goal);
        let mut exec = Executor::new(AGENT, nav, carts);

        exec.fetch(0, item_at(0, 5.0));
        assert_eq!(exec.return_context().unwrap().destination, Some(goal));

        exec.tick();
        exec.navigator_mut().arrive();
        exec.tick();
        exec.navigator_mut().arrive();
        exec.tick();

        assert_eq!(exec.state(), &ExecutionState::Idle);
        assert_eq!(exec.navigator().position, P0);
        assert_eq!(exec.navigator().destination, Some(goal));
        assert!(exec.navigator().autonomous);
    }

    #[test]
    fn test_discard_removes_from_cart() {
        let carts = Arc::new(SharedCarts::new(10.0, 0.5));
        let mut exec = executor(Arc::clone(&carts));
        let a = item_at(0, 5.0);
        exec.fetch(0, a.clone());
        exec.fetch(0, a.clone());
        exec.discard(0, a);
        run_until_idle(&mut exec, 20);
        assert_eq!(carts.contents(AGENT), vec![ItemId(0)]);
    }

    #[test]
    fn test_context_captured_once_per_batch() {
        let carts = Arc::new(SharedCarts::new(10.0, 0.5));
        let mut exec = executor(carts);
        exec.fetch(0, item_at(0, 5.0));
        exec.tick();
        exec.fetch(1, item_at(1, 6.0));
        assert_eq!(exec.return_context().unwrap().point, P0);

        run_until_idle(&mut exec, 10);
        assert_eq!(exec.navigator().position, P0);
    }

    #[test]
    fn test_work_arriving_while_returning_keeps_context() {
        let carts = Arc::new(SharedCarts::new(10.0, 0.5));
        carts.register(AGENT, "tester");
        let mut exec = Executor::new(AGENT, MockNavigator::at(P0, R0).manual(), carts);
        exec.fetch(0, item_at(0, 5.0));
        exec.tick();
        exec.navigator_mut().arrive();
        exec.tick();
        assert_eq!(exec.state(), &ExecutionState::Returning);

        exec.fetch(1, item_at(1, 6.0));
        exec.navigator_mut().arrive();
        exec.tick();
        assert_eq!(exec.state(), &ExecutionState::Idle);
        assert!(exec.is_interrupted());
        assert!(!exec.navigator().autonomous);

        exec.tick();
        exec.navigator_mut().arrive();
        exec.tick();
        exec.navigator_mut().arrive();
        exec.tick();
        assert_eq!(exec.navigator().position, P0);
        assert_eq!(exec.navigator().heading, R0);
        assert!(!exec.is_interrupted());
    }

    #[test]
    fn test_idle_with_empty_queue_is_noop() {
        let carts = Arc::new(SharedCarts::new(10.0, 0.5));
        let mut exec = executor(carts);
        exec.tick();
        assert_eq!(exec.state(), &ExecutionState::Idle);
        assert!(exec.navigator().autonomous);
        assert!(!exec.is_interrupted());
    }
}
