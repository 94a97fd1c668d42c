//! Common types used across the workspace
//!
//! This module provides the fundamental domain types shared by the
//! configuration layer and the simulation core.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fixed-point monetary/quantity type used for prices, volumes and balances.
///
/// Re-exported so downstream crates depend on `common::Amount` rather than
/// pinning their own `rust_decimal` import.
pub type Amount = Decimal;

/// Order side (buy or sell) from the perspective of the order placer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy the commodity.
    Bid,
    /// Sell the commodity.
    Ask,
}

impl Side {
    /// Returns the opposite side.
    pub fn opposite(&self) -> Self {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }

    /// Returns true if this is a buy side.
    pub fn is_bid(&self) -> bool {
        matches!(self, Side::Bid)
    }

    /// Returns true if this is a sell side.
    pub fn is_ask(&self) -> bool {
        matches!(self, Side::Ask)
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Bid => write!(f, "bid"),
            Side::Ask => write!(f, "ask"),
        }
    }
}
