//! Executor state and the navigation boundary.

use crate::catalog::{Heading, Point};
use crate::diff::Operation;

/// Movement layer an [`Executor`](super::Executor) drives.
///
/// Path planning and locomotion live behind this trait; the executor only
/// sets destinations and asks whether the last one has been reached.
pub trait Navigator {
    fn position(&self) -> Point;

    fn heading(&self) -> Heading;

    fn set_heading(&mut self, heading: Heading);

    /// The point currently being navigated to, if any.
    fn destination(&self) -> Option<Point>;

    fn set_destination(&mut self, point: Point);

    /// Stops moving and forgets the current destination.
    fn clear_destination(&mut self);

    /// Whether the agent has arrived at its destination, or has none.
    fn has_reached_point(&self) -> bool;

    /// Suspends or resumes the agent's own exploration and selection
    /// behavior.
    fn set_autonomy(&mut self, enabled: bool);
}

/// Where an executor is in its cycle.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ExecutionState {
    /// Nothing in flight.
    #[default]
    Idle,
    /// Travelling to, or committing, one operation.
    Executing(Operation),
    /// Queue drained; heading back to the [`ReturnContext`] point.
    Returning,
}

impl ExecutionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, ExecutionState::Idle)
    }

    /// The operation in flight, if any.
    pub fn current(&self) -> Option<&Operation> {
        match self {
            ExecutionState::Executing(op) => Some(op),
            _ => None,
        }
    }
}

/// What the agent was doing before its queue became non-empty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnContext {
    pub point: Point,
    pub heading: Heading,
    /// Destination that was active at capture time, resumed on return.
    pub destination: Option<Point>,
}

impl ReturnContext {
    pub fn capture<N: Navigator + ?Sized>(navigator: &N) -> Self {
        Self {
            point: navigator.position(),
            heading: navigator.heading(),
            destination: navigator.destination(),
        }
    }
}
