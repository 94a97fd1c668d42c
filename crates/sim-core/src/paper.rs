//! A fixed/synthetic venue adapter used as a stand-in for a live
//! exchange client in the demo binary and in integration tests. Not a
//! real market-data source — every call returns the same book, ticker,
//! and trade history it was constructed with.

use async_trait::async_trait;
use common::{Amount, Side};

use crate::error::UpstreamError;
use crate::exchange::{Candles, OrderBookSource, Ticker, TradeHistory};
use crate::model::{Candle, OrderBook, OrderBookEntry, TickerData, Trade};

/// A venue client that always answers with the snapshot it was built
/// with. Useful for exercising [`crate::exchange::Sim`] without a
/// network dependency.
#[derive(Debug, Clone)]
pub struct PaperExchange {
    book: OrderBook,
    trades: Vec<Trade>,
}

impl PaperExchange {
    pub fn new(book: OrderBook, trades: Vec<Trade>) -> Self {
        Self { book, trades }
    }

    /// A small, symmetric synthetic book around `mid`, with `levels`
    /// price steps of `step` on each side and `depth` volume per level.
    pub fn synthetic(mid: Amount, step: Amount, depth: Amount, levels: u32) -> Self {
        let mut bids = Vec::with_capacity(levels as usize);
        let mut asks = Vec::with_capacity(levels as usize);
        for i in 1..=levels {
            let offset = step * Amount::from(i);
            bids.push(OrderBookEntry::new(mid - offset, depth));
            asks.push(OrderBookEntry::new(mid + offset, depth));
        }
        Self::new(OrderBook::new(bids, asks), Vec::new())
    }
}

#[async_trait]
impl Ticker for PaperExchange {
    async fn ticker(&self) -> Result<TickerData, UpstreamError> {
        let best_bid = self.book.bids.iter().map(|e| e.price).max();
        let best_ask = self.book.asks.iter().map(|e| e.price).min();
        Ok(TickerData {
            bid: best_bid.unwrap_or(Amount::ZERO),
            ask: best_ask.unwrap_or(Amount::ZERO),
            last: self.trades.last().map(|t| t.unit_price).unwrap_or(Amount::ZERO),
        })
    }
}

#[async_trait]
impl Candles for PaperExchange {
    async fn candles(&self, _interval: &str) -> Result<Vec<Candle>, UpstreamError> {
        Ok(Vec::new())
    }
}

#[async_trait]
impl OrderBookSource for PaperExchange {
    async fn order_book(&self) -> Result<OrderBook, UpstreamError> {
        Ok(self.book.clone())
    }
}

#[async_trait]
impl TradeHistory for PaperExchange {
    async fn trade_history(&self) -> Result<Vec<Trade>, UpstreamError> {
        Ok(self.trades.clone())
    }
}

/// Builds the default fixture used by the `simx` demo binary: a modest
/// book around a price of 100, with one recent trade on each side.
pub fn default_fixture() -> PaperExchange {
    use rust_decimal_macros::dec;

    let book = OrderBook::new(
        vec![
            OrderBookEntry::new(dec!(99), dec!(10)),
            OrderBookEntry::new(dec!(98), dec!(20)),
        ],
        vec![
            OrderBookEntry::new(dec!(101), dec!(10)),
            OrderBookEntry::new(dec!(102), dec!(20)),
        ],
    );
    let trades = vec![
        Trade {
            timestamp_ms: None,
            side: Side::Bid,
            unit_price: dec!(100),
            volume: dec!(1),
        },
        Trade {
            timestamp_ms: None,
            side: Side::Ask,
            unit_price: dec!(100),
            volume: dec!(1),
        },
    ];
    PaperExchange::new(book, trades)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_ticker_reports_best_bid_and_ask() {
        let exchange = default_fixture();
        let ticker = exchange.ticker().await.unwrap();
        assert_eq!(ticker.bid, dec!(99));
        assert_eq!(ticker.ask, dec!(101));
    }

    #[tokio::test]
    async fn test_order_book_round_trips_the_fixture() {
        let exchange = default_fixture();
        let book = exchange.order_book().await.unwrap();
        assert_eq!(book.bids.len(), 2);
        assert_eq!(book.asks.len(), 2);
    }

    #[test]
    fn test_synthetic_book_is_symmetric_around_mid() {
        let exchange = PaperExchange::synthetic(dec!(100), dec!(1), dec!(5), 3);
        assert_eq!(exchange.book.bids.len(), 3);
        assert_eq!(exchange.book.asks.len(), 3);
        assert!(exchange.book.bids.iter().all(|e| e.price < dec!(100)));
        assert!(exchange.book.asks.iter().all(|e| e.price > dec!(100)));
    }
}
