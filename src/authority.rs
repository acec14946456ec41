//! Authoritative cart state.
//!
//! Every cart mutation goes through a [`CapacityAuthority`]. Agents receive
//! it at construction as an `Arc<dyn CapacityAuthority>`; they never touch
//! cart state directly. Rejections are ordinary `false` results, never
//! errors.
//!
//! [`SharedCarts`] is the in-process implementation: one cart per
//! registered agent, capacity and proximity checks, and a savings ranking.

use crate::catalog::{Item, ItemId, Point};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};

/// Identity of an agent as known to the authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct AgentId(pub u64);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent-{}", self.0)
    }
}

/// Validates and commits cart changes.
///
/// Implementations must serialize the three operations per cart so that
/// concurrent agents cannot lose updates.
pub trait CapacityAuthority: Send + Sync {
    /// Whether `item` would fit in `agent`'s cart right now.
    fn can_add(&self, agent: AgentId, item: &Item) -> bool;

    /// Adds one unit of `item` to `agent`'s cart. `at` is where the agent
    /// stands when it asks.
    fn add_item(&self, agent: AgentId, at: Point, item: &Item) -> bool;

    /// Removes one unit of `item` from `agent`'s cart.
    fn remove_item(&self, agent: AgentId, at: Point, item: &Item) -> bool;
}

#[derive(Debug, Clone)]
struct Cart {
    name: String,
    items: Vec<Item>,
    total_size: f64,
    total_savings: f64,
}

impl Cart {
    fn new(name: String) -> Self {
        Self {
            name,
            items: Vec::new(),
            total_size: 0.0,
            total_savings: 0.0,
        }
    }
}

#[derive(Debug, Default)]
struct Carts {
    by_agent: HashMap<AgentId, Cart>,
    registration: Vec<AgentId>,
}

/// One row of the savings ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    /// 1-based position in the ranking.
    pub rank: usize,
    pub agent: AgentId,
    pub name: String,
    pub item_count: usize,
    pub total_size: f64,
    pub total_savings: f64,
    /// Percentage of capacity in use, rounded to two decimals.
    pub fill_percent: f64,
}

impl fmt::Display for Standing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} : ${:.2} ({}% full)",
            self.name, self.total_savings, self.fill_percent
        )
    }
}

/// In-process [`CapacityAuthority`] holding every agent's cart.
#[derive(Debug)]
pub struct SharedCarts {
    capacity: f64,
    max_pickup_distance: f64,
    carts: Mutex<Carts>,
}

impl SharedCarts {
    pub fn new(capacity: f64, max_pickup_distance: f64) -> Self {
        Self {
            capacity,
            max_pickup_distance,
            carts: Mutex::new(Carts::default()),
        }
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn max_pickup_distance(&self) -> f64 {
        self.max_pickup_distance
    }

    /// Gives `agent` an empty cart.
    ///
    /// Returns `false` if the agent already has one; its cart is kept.
    pub fn register(&self, agent: AgentId, name: impl Into<String>) -> bool {
        let mut carts = self.carts.lock();
        if carts.by_agent.contains_key(&agent) {
            warn!(%agent, "agent registered twice");
            return false;
        }
        carts.by_agent.insert(agent, Cart::new(name.into()));
        carts.registration.push(agent);
        true
    }

    pub fn is_registered(&self, agent: AgentId) -> bool {
        self.carts.lock().by_agent.contains_key(&agent)
    }

    /// Ids of the items in `agent`'s cart, one entry per unit, in the order
    /// they were added.
    pub fn contents(&self, agent: AgentId) -> Vec<ItemId> {
        self.carts
            .lock()
            .by_agent
            .get(&agent)
            .map(|cart| cart.items.iter().map(|item| item.id).collect())
            .unwrap_or_default()
    }

    pub fn total_savings(&self, agent: AgentId) -> Option<f64> {
        self.carts.lock().by_agent.get(&agent).map(|c| c.total_savings)
    }

    pub fn total_size(&self, agent: AgentId) -> Option<f64> {
        self.carts.lock().by_agent.get(&agent).map(|c| c.total_size)
    }

    /// All carts ranked by total savings, highest first. Ties keep
    /// registration order.
    pub fn standings(&self) -> Vec<Standing> {
        let carts = self.carts.lock();
        let mut rows: Vec<Standing> = carts
            .registration
            .iter()
            .filter_map(|agent| carts.by_agent.get(agent).map(|cart| (*agent, cart)))
            .map(|(agent, cart)| Standing {
                rank: 0,
                agent,
                name: cart.name.clone(),
                item_count: cart.items.len(),
                total_size: cart.total_size,
                total_savings: cart.total_savings,
                fill_percent: fill_percent(cart.total_size, self.capacity),
            })
            .collect();
        rows.sort_by(|a, b| b.total_savings.total_cmp(&a.total_savings));
        for (i, row) in rows.iter_mut().enumerate() {
            row.rank = i + 1;
        }
        rows
    }

    fn within_reach(&self, agent: AgentId, at: Point, item: &Item) -> bool {
        let distance = at.distance(&item.position);
        if distance > self.max_pickup_distance {
            warn!(
                %agent,
                item = %item.id,
                distance,
                max = self.max_pickup_distance,
                "item out of reach"
            );
            return false;
        }
        true
    }
}

impl CapacityAuthority for SharedCarts {
    fn can_add(&self, agent: AgentId, item: &Item) -> bool {
        self.carts
            .lock()
            .by_agent
            .get(&agent)
            .is_some_and(|cart| cart.total_size + item.size <= self.capacity)
    }

    fn add_item(&self, agent: AgentId, at: Point, item: &Item) -> bool {
        if !self.within_reach(agent, at, item) {
            return false;
        }
        let mut carts = self.carts.lock();
        let Some(cart) = carts.by_agent.get_mut(&agent) else {
            warn!(%agent, item = %item.id, "add for unregistered agent");
            return false;
        };
        if cart.total_size + item.size > self.capacity {
            warn!(
                %agent,
                item = %item.id,
                size = item.size,
                used = cart.total_size,
                capacity = self.capacity,
                "no room for item"
            );
            return false;
        }
        cart.items.push(item.clone());
        cart.total_size += item.size;
        cart.total_savings += item.saved_value;
        debug!(%agent, item = %item.id, total_savings = cart.total_savings, "item added");
        true
    }

    fn remove_item(&self, agent: AgentId, at: Point, item: &Item) -> bool {
        if !self.within_reach(agent, at, item) {
            return false;
        }
        let mut carts = self.carts.lock();
        let Some(cart) = carts.by_agent.get_mut(&agent) else {
            warn!(%agent, item = %item.id, "remove for unregistered agent");
            return false;
        };
        let Some(pos) = cart.items.iter().position(|held| held.id == item.id) else {
            warn!(%agent, item = %item.id, "item not in cart");
            return false;
        };
        let removed = cart.items.remove(pos);
        cart.total_size -= removed.size;
        cart.total_savings -= removed.saved_value;
        debug!(%agent, item = %item.id, total_savings = cart.total_savings, "item removed");
        true
    }
}

fn fill_percent(size: f64, capacity: f64) -> f64 {
    if capacity <= 0.0 {
        return 0.0;
    }
    (100.0 * size / capacity * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    const ALICE: AgentId = AgentId(1);
    const BOB: AgentId = AgentId(2);

    fn carts() -> SharedCarts {
        let carts = SharedCarts::new(10.0, 2.0);
        carts.register(ALICE, "alice");
        carts.register(BOB, "bob");
        carts
    }

    fn item(id: u64, size: f64, saved: f64) -> Item {
        Item::new(id, size, saved)
    }

    #[test]
    fn test_add_within_capacity() {
        let carts = carts();
        assert!(carts.can_add(ALICE, &item(0, 4.0, 5.0)));
        assert!(carts.add_item(ALICE, Point::ORIGIN, &item(0, 4.0, 5.0)));
        assert!(carts.add_item(ALICE, Point::ORIGIN, &item(1, 6.0, 8.0)));
        assert_eq!(carts.total_size(ALICE), Some(10.0));
        assert_eq!(carts.total_savings(ALICE), Some(13.0));
        assert!(!carts.can_add(ALICE, &item(2, 0.5, 1.0)));
        assert!(!carts.add_item(ALICE, Point::ORIGIN, &item(2, 0.5, 1.0)));
    }

    #[test]
    fn test_out_of_reach_rejected() {
        let carts = carts();
        let far = item(0, 1.0, 1.0).at(Point::new(5.0, 0.0, 0.0));
        assert!(carts.can_add(ALICE, &far));
        assert!(!carts.add_item(ALICE, Point::ORIGIN, &far));
        assert!(carts.add_item(ALICE, Point::new(4.0, 0.0, 0.0), &far));
        assert!(!carts.remove_item(ALICE, Point::ORIGIN, &far));
        assert!(carts.remove_item(ALICE, Point::new(5.0, 1.0, 0.0), &far));
    }

    #[test]
    fn test_remove_only_held_units() {
        let carts = carts();
        let a = item(0, 2.0, 3.0);
        assert!(!carts.remove_item(ALICE, Point::ORIGIN, &a));
        assert!(carts.add_item(ALICE, Point::ORIGIN, &a));
        assert!(carts.add_item(ALICE, Point::ORIGIN, &a));
        assert!(carts.remove_item(ALICE, Point::ORIGIN, &a));
        assert_eq!(carts.contents(ALICE), vec![ItemId(0)]);
        assert_eq!(carts.total_size(ALICE), Some(2.0));
    }

    #[test]
    fn test_unregistered_agent_rejected() {
        let carts = carts();
        let stranger = AgentId(99);
        let a = item(0, 1.0, 1.0);
        assert!(!carts.can_add(stranger, &a));
        assert!(!carts.add_item(stranger, Point::ORIGIN, &a));
        assert!(!carts.remove_item(stranger, Point::ORIGIN, &a));
        assert!(!carts.register(ALICE, "again"));
    }

    #[test]
    fn test_standings_ranked_by_savings() {
        let carts = carts();
        carts.add_item(BOB, Point::ORIGIN, &item(0, 5.0, 9.0));
        carts.add_item(ALICE, Point::ORIGIN, &item(1, 2.5, 1.0));

        let rows = carts.standings();
        assert_eq!(rows[0].name, "bob");
        assert_eq!(rows[0].rank, 1);
        assert!((rows[0].fill_percent - 50.0).abs() < 1e-9);
        assert_eq!(rows[1].name, "alice");
        assert!((rows[1].fill_percent - 25.0).abs() < 1e-9);
        assert_eq!(rows[0].to_string(), "bob : $9.00 (50% full)");
    }

    #[test]
    fn test_concurrent_adds_never_exceed_capacity() {
        let carts = Arc::new(SharedCarts::new(100.0, 1.0));
        carts.register(ALICE, "alice");
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let carts = Arc::clone(&carts);
                thread::spawn(move || {
                    for i in 0..50 {
                        carts.add_item(ALICE, Point::ORIGIN, &Item::new(t * 100 + i, 1.0, 1.0));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(carts.total_size(ALICE), Some(100.0));
        assert_eq!(carts.contents(ALICE).len(), 100);
    }
}
