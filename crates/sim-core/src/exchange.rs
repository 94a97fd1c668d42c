//! Capability traits for venue market data, and the `Sim<E>` facade that
//! wraps any venue client implementing them with a simulated spot
//! trading surface.

use std::sync::Arc;

use async_trait::async_trait;
use common::{Amount, Side};
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::error::{SimError, UpstreamError};
use crate::model::{Balances, Candle, Order, OrderBook, TickerData, Trade};
use crate::runner;
use crate::shutdown::ShutdownController;
use crate::state::{SimState, SimStore};

/// Current best bid/ask/last trade for the wrapped venue.
#[async_trait]
pub trait Ticker {
    async fn ticker(&self) -> Result<TickerData, UpstreamError>;
}

/// Historical OHLCV candles at the given interval (venue-defined, e.g.
/// `"1m"`, `"1h"`).
#[async_trait]
pub trait Candles {
    async fn candles(&self, interval: &str) -> Result<Vec<Candle>, UpstreamError>;
}

/// A full order book snapshot, fresh enough for the matching engine to
/// sweep against.
#[async_trait]
pub trait OrderBookSource {
    async fn order_book(&self) -> Result<OrderBook, UpstreamError>;
}

/// Recent trade prints, used to augment thin order books (spec §4.3).
#[async_trait]
pub trait TradeHistory {
    async fn trade_history(&self) -> Result<Vec<Trade>, UpstreamError>;
}

/// The simulated spot trading surface: virtual balances and pending
/// orders, settled against a real venue's market data.
#[async_trait]
pub trait Spot {
    fn balances(&self) -> Balances;
    fn current_open_orders(&self) -> Vec<Order>;
    async fn place_limit_order(
        &self,
        side: Side,
        volume: Amount,
        unit_price: Amount,
    ) -> Result<String, SimError>;
    async fn place_market_order(&self, side: Side, amount: Amount) -> Result<String, SimError>;
    async fn cancel_order(&self, id: &str);
}

/// Wraps a venue client `E` with a simulated spot surface. Every
/// market-data capability `E` implements is forwarded unchanged; `Spot`
/// is implemented against an in-process `SimStore` kept in sync by a
/// background [`runner::spawn`] task.
pub struct Sim<E> {
    exchange: Arc<E>,
    store: SimStore,
    shutdown: ShutdownController,
}

impl<E> Sim<E>
where
    E: OrderBookSource + TradeHistory + Send + Sync + 'static,
{
    /// Creates the simulation and starts its background runner. The
    /// runner is cancelled automatically when the returned `Sim` is
    /// dropped.
    pub fn new(
        currency_balance: Amount,
        commodity_balance: Amount,
        cycle_delay_ms: u64,
        exchange: E,
    ) -> Self {
        let exchange = Arc::new(exchange);
        let store = SimStore::new(SimState::new(currency_balance, commodity_balance));
        let shutdown = ShutdownController::new();

        runner::spawn(
            exchange.clone(),
            store.clone(),
            cycle_delay_ms,
            shutdown.child_token(),
        );

        Self {
            exchange,
            store,
            shutdown,
        }
    }

    /// Exposes the wrapped venue client, e.g. so callers can reach
    /// capabilities `Sim` doesn't forward a blanket impl for.
    pub fn inner(&self) -> &E {
        &self.exchange
    }

    fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.token()
    }
}

impl<E> Drop for Sim<E> {
    fn drop(&mut self) {
        self.shutdown.shutdown();
    }
}

#[async_trait]
impl<E> Ticker for Sim<E>
where
    E: Ticker + Send + Sync,
{
    async fn ticker(&self) -> Result<TickerData, UpstreamError> {
        self.exchange.ticker().await
    }
}

#[async_trait]
impl<E> Candles for Sim<E>
where
    E: Candles + Send + Sync,
{
    async fn candles(&self, interval: &str) -> Result<Vec<Candle>, UpstreamError> {
        self.exchange.candles(interval).await
    }
}

#[async_trait]
impl<E> OrderBookSource for Sim<E>
where
    E: OrderBookSource + Send + Sync,
{
    async fn order_book(&self) -> Result<OrderBook, UpstreamError> {
        self.exchange.order_book().await
    }
}

#[async_trait]
impl<E> TradeHistory for Sim<E>
where
    E: TradeHistory + Send + Sync,
{
    async fn trade_history(&self) -> Result<Vec<Trade>, UpstreamError> {
        self.exchange.trade_history().await
    }
}

#[async_trait]
impl<E> Spot for Sim<E>
where
    E: OrderBookSource + TradeHistory + Send + Sync + 'static,
{
    fn balances(&self) -> Balances {
        let snapshot = self.store.snapshot();
        Balances {
            currency: snapshot.currency_balance,
            commodity: snapshot.commodity_balance,
        }
    }

    fn current_open_orders(&self) -> Vec<Order> {
        self.store.snapshot().open_orders()
    }

    #[instrument(skip(self))]
    async fn place_limit_order(
        &self,
        side: Side,
        volume: Amount,
        unit_price: Amount,
    ) -> Result<String, SimError> {
        self.store.compute_and_commit_with_result(|state| {
            let mut next = state.clone();
            let id = next.new_id();
            let order = crate::model::PendingLimitOrder {
                id: id.clone(),
                side,
                timestamp_ms: now_ms(),
                volume,
                unit_price,
            };
            if next.add_limit_order(order) {
                (Ok(id), next)
            } else {
                (Err(SimError::InsufficientBalance), state.clone())
            }
        })
    }

    #[instrument(skip(self))]
    async fn place_market_order(&self, side: Side, amount: Amount) -> Result<String, SimError> {
        self.store.compute_and_commit_with_result(|state| {
            let mut next = state.clone();
            let id = next.new_id();
            let order = crate::model::PendingMarketOrder {
                id: id.clone(),
                side,
                timestamp_ms: now_ms(),
                amount,
            };
            if next.add_market_order(order) {
                (Ok(id), next)
            } else {
                (Err(SimError::InsufficientBalance), state.clone())
            }
        })
    }

    #[instrument(skip(self))]
    async fn cancel_order(&self, id: &str) {
        self.store.compute_and_commit(|state| {
            let mut next = state.clone();
            next.cancel_limit_order(id);
            next
        });
    }
}

fn now_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_millis() as i64
}
