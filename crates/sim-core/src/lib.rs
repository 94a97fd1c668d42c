//! In-memory paper-trading simulation layered in front of a real spot
//! exchange client.
//!
//! [`exchange::Sim`] wraps any venue client that implements the
//! market-data capability traits in [`exchange`] and adds a simulated
//! [`exchange::Spot`] surface backed by [`state::SimStore`] and a
//! background [`runner`] that periodically matches pending orders
//! against the venue's live book and trade history via [`engine`].

pub mod engine;
pub mod error;
pub mod exchange;
pub mod model;
pub mod paper;
pub mod pricing;
pub mod runner;
pub mod shutdown;
pub mod state;

pub use error::{SimError, UpstreamError};
pub use exchange::{Candles, OrderBookSource, Sim, Spot, Ticker, TradeHistory};
pub use model::{
    Balances, Candle, Order, OrderBook, OrderBookEntry, PendingLimitOrder, PendingMarketOrder,
    TickerData, Trade,
};
pub use state::{SimState, SimStore};
