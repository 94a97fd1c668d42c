//! The matching engine: given a fresh order book, recent trades, and the
//! current state, produces the state that would hold after attempting to
//! satisfy every pending order against the observed market.
//!
//! `run_matching_cycle` is a pure function, `(book, trades, state) ->
//! state'`, the same "pure transition" shape the teacher's
//! `MatchingEngine::match_order` uses (`(old_state, order) -> (new_state,
//! trades)`). Callers commit the result via
//! [`crate::state::SimStore::compute_and_commit`].

use common::Side;

use crate::model::{OrderBook, OrderBookEntry, PendingLimitOrder, PendingMarketOrder, Trade};
use crate::pricing::{price_to_buy, price_to_sell, volume_buyable_for};
use crate::state::SimState;

/// Runs one matching cycle and returns the resulting state. Does not
/// mutate `state`; the caller is responsible for committing the result.
pub fn run_matching_cycle(book: &OrderBook, trades: &[Trade], state: &SimState) -> SimState {
    let mut next = state.clone();

    let watermark = effective_watermark(state);
    let effective_book = synthesize_effective_book(book, trades, watermark);

    run_market_orders(&mut next, &effective_book);
    run_limit_orders(&mut next, &effective_book);

    next.updated_utc_ms = watermark;
    next
}

fn earliest_ts(timestamps: impl Iterator<Item = i64>, fallback: i64) -> i64 {
    timestamps.min().unwrap_or(fallback)
}

fn effective_watermark(state: &SimState) -> i64 {
    let earliest_limit = earliest_ts(
        state.pending_limit_orders.iter().map(|o| o.timestamp_ms),
        state.updated_utc_ms,
    );
    let earliest_market = earliest_ts(
        state.pending_market_orders.iter().map(|o| o.timestamp_ms),
        state.updated_utc_ms,
    );
    state.updated_utc_ms.max(earliest_limit.min(earliest_market))
}

/// Appends recent trades that printed after `watermark` to the book as
/// additional depth: a trade at price P for volume V represents
/// counterparty willingness at that level this cycle. Trades that carry
/// no timestamp cannot be judged stale and are always retained.
fn synthesize_effective_book(book: &OrderBook, trades: &[Trade], watermark: i64) -> OrderBook {
    let mut effective = book.clone();

    for trade in trades {
        let is_fresh = trade.timestamp_ms.map_or(true, |ts| ts > watermark);
        if !is_fresh {
            continue;
        }
        let entry = OrderBookEntry::new(trade.unit_price, trade.volume);
        match trade.side {
            Side::Bid => effective.bids.push(entry),
            Side::Ask => effective.asks.push(entry),
        }
    }

    effective
}

/// Sorts orders newest-first by id (ids are monotonically increasing
/// decimal strings; parsed numerically so "10" sorts after "9"). This is
/// a contractual convention inherited from the system this was
/// distilled from, preserved here for reproducibility (spec's Open
/// Question: no rationale is recorded upstream for it).
fn sort_ids_newest_first(ids: &mut [u64]) {
    ids.sort_unstable_by(|a, b| b.cmp(a));
}

fn run_market_orders(state: &mut SimState, book: &OrderBook) {
    let mut order_ids: Vec<u64> = state
        .pending_market_orders
        .iter()
        .filter_map(|o| o.id.parse().ok())
        .collect();
    sort_ids_newest_first(&mut order_ids);

    for id in order_ids {
        let id_str = id.to_string();
        let Some(pos) = state
            .pending_market_orders
            .iter()
            .position(|o| o.id == id_str)
        else {
            continue;
        };
        let order: PendingMarketOrder = state.pending_market_orders.remove(pos);

        match order.side {
            Side::Bid => match volume_buyable_for(order.amount, book) {
                Some(v) => state.commodity_balance += v,
                None => state.currency_balance += order.amount,
            },
            Side::Ask => match price_to_sell(order.amount, book) {
                Some(p) => state.currency_balance += p,
                None => state.commodity_balance += order.amount,
            },
        }
    }
}

fn run_limit_orders(state: &mut SimState, book: &OrderBook) {
    let mut order_ids: Vec<u64> = state
        .pending_limit_orders
        .iter()
        .filter_map(|o| o.id.parse().ok())
        .collect();
    sort_ids_newest_first(&mut order_ids);

    for id in order_ids {
        let id_str = id.to_string();
        let Some(pos) = state
            .pending_limit_orders
            .iter()
            .position(|o| o.id == id_str)
        else {
            continue;
        };
        let order: &PendingLimitOrder = &state.pending_limit_orders[pos];

        match order.side {
            Side::Bid => {
                let max_cost = order.volume * order.unit_price;
                if let Some(cost) = price_to_buy(order.volume, book) {
                    if cost <= max_cost {
                        let volume = order.volume;
                        let refund = max_cost - cost;
                        state.pending_limit_orders.remove(pos);
                        state.commodity_balance += volume;
                        state.currency_balance += refund;
                    }
                }
            }
            Side::Ask => {
                let min_proceeds = order.volume * order.unit_price;
                if let Some(proceeds) = price_to_sell(order.volume, book) {
                    if proceeds >= min_proceeds {
                        state.pending_limit_orders.remove(pos);
                        state.currency_balance += proceeds;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OrderBookEntry;
    use common::Amount;
    use rust_decimal_macros::dec;

    fn book(bids: Vec<(Amount, Amount)>, asks: Vec<(Amount, Amount)>) -> OrderBook {
        OrderBook {
            bids: bids
                .into_iter()
                .map(|(p, v)| OrderBookEntry::new(p, v))
                .collect(),
            asks: asks
                .into_iter()
                .map(|(p, v)| OrderBookEntry::new(p, v))
                .collect(),
        }
    }

    fn limit(id: &str, side: Side, volume: Amount, unit_price: Amount, ts: i64) -> PendingLimitOrder {
        PendingLimitOrder {
            id: id.to_string(),
            side,
            timestamp_ms: ts,
            volume,
            unit_price,
        }
    }

    fn market(id: &str, side: Side, amount: Amount, ts: i64) -> PendingMarketOrder {
        PendingMarketOrder {
            id: id.to_string(),
            side,
            timestamp_ms: ts,
            amount,
        }
    }

    // Scenario 1 (spec.md §8): limit buy fills with refund.
    #[test]
    fn test_limit_buy_fills_with_refund() {
        let mut state = SimState::new(dec!(1000), dec!(0));
        state.updated_utc_ms = 0;
        state.add_limit_order(limit("1", Side::Bid, dec!(5), dec!(12), 1));
        assert_eq!(state.currency_balance, dec!(940));

        let b = book(vec![], vec![(dec!(10), dec!(5))]);
        let next = run_matching_cycle(&b, &[], &state);

        assert!(next.pending_limit_orders.is_empty());
        assert_eq!(next.currency_balance, dec!(950));
        assert_eq!(next.commodity_balance, dec!(5));
    }

    // Scenario 2: limit sell blocked by price.
    #[test]
    fn test_limit_sell_blocked_by_price() {
        let mut state = SimState::new(dec!(0), dec!(10));
        state.updated_utc_ms = 0;
        state.add_limit_order(limit("1", Side::Ask, dec!(10), dec!(9), 1));

        let b = book(vec![(dec!(8), dec!(10))], vec![]);
        let next = run_matching_cycle(&b, &[], &state);

        assert_eq!(next.pending_limit_orders.len(), 1);
        assert_eq!(next.currency_balance, dec!(0));
        assert_eq!(next.commodity_balance, dec!(0));
    }

    // Scenario 3: market buy refund on thin book.
    #[test]
    fn test_market_buy_refund_on_thin_book() {
        let mut state = SimState::new(dec!(100), dec!(0));
        state.updated_utc_ms = 0;
        state.add_market_order(market("1", Side::Bid, dec!(100), 1));

        let b = book(vec![], vec![(dec!(1), dec!(10))]);
        let next = run_matching_cycle(&b, &[], &state);

        assert!(next.pending_market_orders.is_empty());
        assert_eq!(next.currency_balance, dec!(100));
        assert_eq!(next.commodity_balance, dec!(0));
    }

    // Scenario 4: market sell settles.
    #[test]
    fn test_market_sell_settles() {
        let mut state = SimState::new(dec!(0), dec!(5));
        state.updated_utc_ms = 0;
        state.add_market_order(market("1", Side::Ask, dec!(5), 1));

        let b = book(vec![(dec!(20), dec!(10))], vec![]);
        let next = run_matching_cycle(&b, &[], &state);

        assert_eq!(next.currency_balance, dec!(100));
        assert_eq!(next.commodity_balance, dec!(0));
    }

    // Scenario 5: recent trade augments depth.
    #[test]
    fn test_recent_trade_augments_depth() {
        let mut state = SimState::new(dec!(1000), dec!(0));
        state.updated_utc_ms = 0;
        state.add_limit_order(limit("1", Side::Bid, dec!(5), dec!(10), 1));

        let b = book(vec![], vec![]);
        let trades = [Trade {
            timestamp_ms: Some(2),
            side: Side::Ask,
            unit_price: dec!(10),
            volume: dec!(5),
        }];
        let next = run_matching_cycle(&b, &trades, &state);

        assert!(next.pending_limit_orders.is_empty());
        assert_eq!(next.commodity_balance, dec!(5));
    }

    #[test]
    fn test_stale_trades_are_ignored() {
        let mut state = SimState::new(dec!(1000), dec!(0));
        state.updated_utc_ms = 100;
        state.add_limit_order(limit("1", Side::Bid, dec!(5), dec!(10), 100));

        let b = book(vec![], vec![]);
        let trades = [Trade {
            timestamp_ms: Some(50), // older than the watermark
            side: Side::Ask,
            unit_price: dec!(10),
            volume: dec!(5),
        }];
        let next = run_matching_cycle(&b, &trades, &state);

        assert_eq!(next.pending_limit_orders.len(), 1);
    }

    #[test]
    fn test_market_orders_processed_before_limit_orders() {
        // A market sell consumes the single bid level; the limit sell
        // placed afterwards should then find no depth and stay pending.
        let mut state = SimState::new(dec!(0), dec!(10));
        state.updated_utc_ms = 0;
        state.add_market_order(market("1", Side::Ask, dec!(5), 1));
        state.add_limit_order(limit("2", Side::Ask, dec!(5), dec!(1), 2));

        let b = book(vec![(dec!(20), dec!(5))], vec![]);
        let next = run_matching_cycle(&b, &[], &state);

        assert!(next.pending_market_orders.is_empty());
        assert_eq!(next.pending_limit_orders.len(), 1);
        assert_eq!(next.currency_balance, dec!(100));
    }

    #[test]
    fn test_newest_limit_order_processed_first() {
        // Only enough depth for one of the two equally-priced limit
        // buys; the newer id ("2") should win.
        let mut state = SimState::new(dec!(1000), dec!(0));
        state.updated_utc_ms = 0;
        state.add_limit_order(limit("1", Side::Bid, dec!(5), dec!(10), 1));
        state.add_limit_order(limit("2", Side::Bid, dec!(5), dec!(10), 2));

        let b = book(vec![], vec![(dec!(10), dec!(5))]);
        let next = run_matching_cycle(&b, &[], &state);

        assert_eq!(next.pending_limit_orders.len(), 1);
        assert_eq!(next.pending_limit_orders[0].id, "1");
    }
}
