//! The background simulation runner: periodically pulls a fresh order
//! book and recent trades from the wrapped venue and advances the
//! pending-order store by one matching cycle.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use crate::engine::run_matching_cycle;
use crate::exchange::{OrderBookSource, TradeHistory};
use crate::state::SimStore;

/// Spawns the background runner loop and returns its join handle. The
/// loop exits as soon as `shutdown` is cancelled.
pub fn spawn<E>(
    exchange: Arc<E>,
    store: SimStore,
    cycle_delay_ms: u64,
    shutdown: CancellationToken,
) -> tokio::task::JoinHandle<()>
where
    E: OrderBookSource + TradeHistory + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(cycle_delay_ms));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    debug!("simulation runner stopping");
                    return;
                }
                _ = interval.tick() => {
                    run_cycle(exchange.as_ref(), &store).await;
                }
            }
        }
    })
}

#[instrument(skip(exchange, store))]
async fn run_cycle<E>(exchange: &E, store: &SimStore)
where
    E: OrderBookSource + TradeHistory,
{
    let snapshot = store.snapshot();
    let has_pending =
        !snapshot.pending_limit_orders.is_empty() || !snapshot.pending_market_orders.is_empty();

    if has_pending {
        let book = exchange.order_book().await;
        let trades = exchange.trade_history().await;

        match (book, trades) {
            (Ok(book), Ok(trades)) => {
                store.compute_and_commit(|state| run_matching_cycle(&book, &trades, state));
            }
            (Err(err), _) | (_, Err(err)) => {
                warn!(error = %err, "skipping matching cycle: upstream fetch failed");
            }
        }
    }

    // The watermark advances every cycle, whether or not a match ran,
    // so a quiet period doesn't make later trades look artificially old.
    store.compute_and_commit(|state| {
        let mut next = state.clone();
        next.updated_utc_ms = now_ms();
        next
    });
}

fn now_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_millis() as i64
}
