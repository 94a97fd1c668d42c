//! Domain types for the simulation core.
//!
//! These mirror the wire-agnostic domain model a real exchange adapter
//! would convert into at its edge: venue-specific JSON/REST shapes never
//! appear here, only the canonical types the matching engine operates on.

use common::{Amount, Side};
use serde::{Deserialize, Serialize};

/// A single resting price level in an order book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookEntry {
    pub price: Amount,
    pub volume: Amount,
}

impl OrderBookEntry {
    pub fn new(price: Amount, volume: Amount) -> Self {
        Self { price, volume }
    }
}

/// A snapshot of resting bids and asks. Order within each side is
/// arbitrary at ingress; the pricing calculator sorts on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBook {
    pub bids: Vec<OrderBookEntry>,
    pub asks: Vec<OrderBookEntry>,
}

impl OrderBook {
    pub fn new(bids: Vec<OrderBookEntry>, asks: Vec<OrderBookEntry>) -> Self {
        Self { bids, asks }
    }
}

/// A single recent trade observed on the live venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub timestamp_ms: Option<i64>,
    pub side: Side,
    pub unit_price: Amount,
    pub volume: Amount,
}

/// A resting limit order in the simulation's pending-order store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingLimitOrder {
    pub id: String,
    pub side: Side,
    pub timestamp_ms: i64,
    pub volume: Amount,
    pub unit_price: Amount,
}

/// A resting market order in the simulation's pending-order store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingMarketOrder {
    pub id: String,
    pub side: Side,
    pub timestamp_ms: i64,
    /// Currency to spend for a BID, commodity to sell for an ASK.
    pub amount: Amount,
}

/// Public projection of a [`PendingLimitOrder`], returned from
/// [`crate::exchange::Spot::current_open_orders`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub side: Side,
    pub timestamp_ms: i64,
    pub volume: Amount,
    pub unit_price: Amount,
}

impl From<&PendingLimitOrder> for Order {
    fn from(o: &PendingLimitOrder) -> Self {
        Self {
            id: o.id.clone(),
            side: o.side,
            timestamp_ms: o.timestamp_ms,
            volume: o.volume,
            unit_price: o.unit_price,
        }
    }
}

/// Virtual account balances held by the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balances {
    pub currency: Amount,
    pub commodity: Amount,
}

/// A venue's best-bid/best-ask snapshot, forwarded unchanged by `Sim<E>`
/// from the wrapped exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerData {
    pub bid: Amount,
    pub ask: Amount,
    pub last: Amount,
}

/// A single OHLCV candle, forwarded unchanged by `Sim<E>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candle {
    pub open_time_ms: i64,
    pub open: Amount,
    pub high: Amount,
    pub low: Amount,
    pub close: Amount,
    pub volume: Amount,
}
