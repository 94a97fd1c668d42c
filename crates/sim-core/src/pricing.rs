//! Pure price/volume sweeps over an order book snapshot.
//!
//! No state, no I/O: these are the building blocks the matching engine
//! uses to decide whether a pending order would have executed against
//! the observed book.

use crate::model::OrderBook;
use common::Amount;

/// Price to buy `volume` units of commodity by sweeping `book.asks`
/// ascending. `None` if the book is too thin to fill the full volume.
pub fn price_to_buy(volume: Amount, book: &OrderBook) -> Option<Amount> {
    if volume.is_zero() {
        return Some(Amount::ZERO);
    }

    let mut levels: Vec<_> = book.asks.iter().collect();
    levels.sort_by(|a, b| a.price.cmp(&b.price));

    let mut remaining = volume;
    let mut total = Amount::ZERO;

    for level in levels {
        if remaining.is_zero() {
            break;
        }
        if level.volume.is_zero() {
            continue;
        }
        let consumed = remaining.min(level.volume);
        total += consumed * level.price;
        remaining -= consumed;
    }

    if remaining.is_zero() {
        Some(total)
    } else {
        None
    }
}

/// Price to sell `volume` units of commodity by sweeping `book.bids`
/// descending. `None` if the book is too thin to absorb the full volume.
pub fn price_to_sell(volume: Amount, book: &OrderBook) -> Option<Amount> {
    if volume.is_zero() {
        return Some(Amount::ZERO);
    }

    let mut levels: Vec<_> = book.bids.iter().collect();
    levels.sort_by(|a, b| b.price.cmp(&a.price));

    let mut remaining = volume;
    let mut total = Amount::ZERO;

    for level in levels {
        if remaining.is_zero() {
            break;
        }
        if level.volume.is_zero() {
            continue;
        }
        let consumed = remaining.min(level.volume);
        total += consumed * level.price;
        remaining -= consumed;
    }

    if remaining.is_zero() {
        Some(total)
    } else {
        None
    }
}

/// Commodity volume buyable for `amount` currency by sweeping
/// `book.asks` ascending. `None` if the book can't absorb the full
/// amount.
pub fn volume_buyable_for(amount: Amount, book: &OrderBook) -> Option<Amount> {
    if amount.is_zero() {
        return Some(Amount::ZERO);
    }

    let mut levels: Vec<_> = book.asks.iter().collect();
    levels.sort_by(|a, b| a.price.cmp(&b.price));

    let mut remaining = amount;
    let mut volume = Amount::ZERO;

    for level in levels {
        if remaining.is_zero() {
            break;
        }
        if level.volume.is_zero() || level.price.is_zero() {
            continue;
        }
        let level_cost = level.price * level.volume;
        let paid = remaining.min(level_cost);
        volume += paid / level.price;
        remaining -= paid;
    }

    if remaining.is_zero() {
        Some(volume)
    } else {
        None
    }
}
