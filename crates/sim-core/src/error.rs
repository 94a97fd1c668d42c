//! Error types for the simulation layer.

use thiserror::Error;

/// Errors returned by [`crate::exchange::Spot`] operations against the
/// simulated account.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error("insufficient balance to reserve order")]
    InsufficientBalance,
    #[error("upstream exchange error: {0}")]
    Upstream(#[from] UpstreamError),
}

/// Errors surfaced by the wrapped venue client while the runner is
/// fetching the order book and trade history for a matching cycle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("upstream request failed: {0}")]
    Request(String),
    #[error("upstream response could not be parsed: {0}")]
    Parse(String),
}
