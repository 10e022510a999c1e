//! Gateway error taxonomy

use thiserror::Error;

/// Failure talking to the brokerage.
///
/// These propagate to the caller of the trading cycle; only order
/// submission failures are caught per-trade by the scheduler.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("http transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("brokerage api error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("api token environment variable `{0}` is not set")]
    MissingToken(String),

    #[error("portfolio snapshot error: {0}")]
    Snapshot(String),

    #[error("order rejected: {0}")]
    OrderRejected(String),
}
