//! The pending-order store and the account-state aggregate it guards.
//!
//! `SimState` is the sole source of truth for the simulation (spec §3).
//! `SimStore` is the serialising primitive spec §4.2/§5 describe: every
//! externally observable read or write goes through `snapshot`,
//! `compute_and_commit`, or `compute_and_commit_with_result`.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

use crate::model::{Order, PendingLimitOrder, PendingMarketOrder};
use common::Amount;

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_millis() as i64
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_secs()
}

/// The central aggregate: virtual balances, pending orders, and the id
/// generator, all mutated together under `SimStore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimState {
    pub id_gen: u64,
    pub updated_utc_ms: i64,
    pub currency_balance: Amount,
    pub commodity_balance: Amount,
    pub pending_limit_orders: Vec<PendingLimitOrder>,
    pub pending_market_orders: Vec<PendingMarketOrder>,
}

impl SimState {
    /// Creates a fresh state with the given starting balances. `id_gen`
    /// is seeded from wall-clock seconds so ids remain distinct across
    /// process restarts in practice (spec §3).
    pub fn new(currency_balance: Amount, commodity_balance: Amount) -> Self {
        Self {
            id_gen: now_secs(),
            updated_utc_ms: now_ms(),
            currency_balance,
            commodity_balance,
            pending_limit_orders: Vec::new(),
            pending_market_orders: Vec::new(),
        }
    }

    /// Allocates the next order id. Strictly increasing within one
    /// process lifetime.
    pub fn new_id(&mut self) -> String {
        self.id_gen += 1;
        self.id_gen.to_string()
    }

    /// Attempts to reserve balance and add a pending limit order.
    /// Returns `false` (no-op) if the reserved side lacks funds.
    pub fn add_limit_order(&mut self, order: PendingLimitOrder) -> bool {
        match order.side {
            common::Side::Bid => {
                let reserve = order.volume * order.unit_price;
                if self.currency_balance < reserve {
                    return false;
                }
                self.currency_balance -= reserve;
            }
            common::Side::Ask => {
                if self.commodity_balance < order.volume {
                    return false;
                }
                self.commodity_balance -= order.volume;
            }
        }
        self.pending_limit_orders.push(order);
        true
    }

    /// Attempts to reserve balance and add a pending market order.
    /// Returns `false` (no-op) if the reserved side lacks funds.
    pub fn add_market_order(&mut self, order: PendingMarketOrder) -> bool {
        match order.side {
            common::Side::Bid => {
                if self.currency_balance < order.amount {
                    return false;
                }
                self.currency_balance -= order.amount;
            }
            common::Side::Ask => {
                if self.commodity_balance < order.amount {
                    return false;
                }
                self.commodity_balance -= order.amount;
            }
        }
        self.pending_market_orders.push(order);
        true
    }

    /// Cancels a pending limit order and refunds its reservation.
    /// Silently does nothing if `id` is unknown or names a market order.
    pub fn cancel_limit_order(&mut self, id: &str) {
        let Some(pos) = self.pending_limit_orders.iter().position(|o| o.id == id) else {
            return;
        };
        let order = self.pending_limit_orders.remove(pos);
        match order.side {
            common::Side::Bid => self.currency_balance += order.volume * order.unit_price,
            common::Side::Ask => self.commodity_balance += order.volume,
        }
    }

    pub fn open_orders(&self) -> Vec<Order> {
        self.pending_limit_orders.iter().map(Order::from).collect()
    }
}

/// Serialising store for `SimState`. Guarded by a `parking_lot::Mutex`
/// so every transition is an atomic, non-reentrant swap (spec §5): the
/// lock is held only across the synchronous transformer, never across
/// an `.await`.
#[derive(Clone)]
pub struct SimStore {
    inner: Arc<Mutex<SimState>>,
}

impl SimStore {
    pub fn new(state: SimState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    /// Returns a consistent point-in-time copy of the state.
    pub fn snapshot(&self) -> SimState {
        self.inner.lock().clone()
    }

    /// Applies a pure transition atomically.
    pub fn compute_and_commit(&self, f: impl FnOnce(&SimState) -> SimState) {
        let mut guard = self.inner.lock();
        let next = f(&guard);
        *guard = next;
    }

    /// Applies a pure transition atomically, also returning a value
    /// computed alongside the new state (e.g. the id of a newly placed
    /// order, or whether placement succeeded).
    pub fn compute_and_commit_with_result<A>(
        &self,
        f: impl FnOnce(&SimState) -> (A, SimState),
    ) -> A {
        let mut guard = self.inner.lock();
        let (result, next) = f(&guard);
        *guard = next;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::Side;
    use rust_decimal_macros::dec;

    fn limit(id: &str, side: Side, volume: Amount, unit_price: Amount) -> PendingLimitOrder {
        PendingLimitOrder {
            id: id.to_string(),
            side,
            timestamp_ms: 0,
            volume,
            unit_price,
        }
    }

    fn market(id: &str, side: Side, amount: Amount) -> PendingMarketOrder {
        PendingMarketOrder {
            id: id.to_string(),
            side,
            timestamp_ms: 0,
            amount,
        }
    }

    #[test]
    fn test_add_limit_bid_reserves_currency() {
        let mut state = SimState::new(dec!(1000), dec!(0));
        assert!(state.add_limit_order(limit("1", Side::Bid, dec!(5), dec!(12))));
        assert_eq!(state.currency_balance, dec!(940));
        assert_eq!(state.commodity_balance, dec!(0));
        assert_eq!(state.pending_limit_orders.len(), 1);
    }

    #[test]
    fn test_add_limit_ask_reserves_commodity() {
        let mut state = SimState::new(dec!(0), dec!(10));
        assert!(state.add_limit_order(limit("1", Side::Ask, dec!(10), dec!(9))));
        assert_eq!(state.commodity_balance, dec!(0));
    }

    #[test]
    fn test_add_limit_insufficient_balance_is_a_no_op() {
        let mut state = SimState::new(dec!(10), dec!(0));
        assert!(!state.add_limit_order(limit("1", Side::Bid, dec!(2), dec!(10))));
        assert_eq!(state.currency_balance, dec!(10));
        assert!(state.pending_limit_orders.is_empty());
    }

    #[test]
    fn test_add_market_bid_reserves_currency() {
        let mut state = SimState::new(dec!(100), dec!(0));
        assert!(state.add_market_order(market("1", Side::Bid, dec!(100))));
        assert_eq!(state.currency_balance, dec!(0));
    }

    #[test]
    fn test_cancel_limit_order_refunds() {
        let mut state = SimState::new(dec!(1000), dec!(0));
        state.add_limit_order(limit("1", Side::Bid, dec!(5), dec!(12)));
        state.cancel_limit_order("1");
        assert_eq!(state.currency_balance, dec!(1000));
        assert!(state.pending_limit_orders.is_empty());
    }

    #[test]
    fn test_cancel_unknown_id_is_a_no_op() {
        let mut state = SimState::new(dec!(1000), dec!(0));
        state.cancel_limit_order("does-not-exist");
        assert_eq!(state.currency_balance, dec!(1000));
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut state = SimState::new(dec!(1000), dec!(0));
        state.add_limit_order(limit("1", Side::Bid, dec!(5), dec!(12)));
        state.cancel_limit_order("1");
        let after_first = state.clone();
        state.cancel_limit_order("1");
        assert_eq!(state, after_first);
    }

    #[test]
    fn test_new_id_strictly_increasing() {
        let mut state = SimState::new(dec!(0), dec!(0));
        let a: u64 = state.new_id().parse().unwrap();
        let b: u64 = state.new_id().parse().unwrap();
        let c: u64 = state.new_id().parse().unwrap();
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_store_compute_and_commit_is_visible_immediately() {
        let store = SimStore::new(SimState::new(dec!(1000), dec!(0)));
        store.compute_and_commit(|s| {
            let mut next = s.clone();
            next.add_limit_order(limit("1", Side::Bid, dec!(5), dec!(12)));
            next
        });
        assert_eq!(store.snapshot().pending_limit_orders.len(), 1);
    }

    #[test]
    fn test_store_compute_and_commit_with_result_returns_value() {
        let store = SimStore::new(SimState::new(dec!(1000), dec!(0)));
        let id = store.compute_and_commit_with_result(|s| {
            let mut next = s.clone();
            let id = next.new_id();
            next.add_limit_order(limit(&id, Side::Bid, dec!(1), dec!(1)));
            (id, next)
        });
        assert_eq!(store.snapshot().pending_limit_orders[0].id, id);
    }
}
