//! Brokerage gateway boundary
//!
//! Everything that crosses the wire to a brokerage goes through the
//! [`BrokerGateway`] trait: portfolio snapshots, quotes, and order
//! submission. Two implementations: a REST client for a live account and
//! an in-memory simulated gateway for paper trading and tests.

mod error;
mod http;
mod paper;

pub use error::GatewayError;
pub use http::{RestConfig, RestGateway};
pub use paper::PaperGateway;

use crate::portfolio::Portfolio;
use crate::strategy::TradeAction;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Latest traded price for a symbol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub last_price: Decimal,
    pub as_of: DateTime<Utc>,
}

/// A fully resolved order, ready for submission
#[derive(Debug, Clone, Serialize)]
pub struct OrderSpec {
    pub symbol: String,
    pub action: TradeAction,
    pub quantity: Decimal,
}

/// Brokerage acknowledgement of an order submission.
///
/// A missing `order_id` on a live (non-dry-run) submission means the
/// order was not accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderReceipt {
    pub order_id: Option<String>,
}

/// Trait for brokerage implementations
#[async_trait]
pub trait BrokerGateway: Send + Sync {
    /// Fetch the current account snapshot with positions
    async fn get_portfolio(&self) -> Result<Portfolio, GatewayError>;

    /// Fetch quotes for the given symbols. Unknown symbols are simply
    /// absent from the returned map.
    async fn get_quotes(&self, symbols: &[String])
        -> Result<HashMap<String, Quote>, GatewayError>;

    /// Submit an order. With `dry_run` the order must not reach the
    /// account; the receipt carries no order id in that case.
    async fn place_order(
        &self,
        order: &OrderSpec,
        account_id: &str,
        dry_run: bool,
    ) -> Result<OrderReceipt, GatewayError>;
}
