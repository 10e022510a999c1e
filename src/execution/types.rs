//! Execution record types

use crate::strategy::TradeAction;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Terminal state of one processed recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeStatus {
    /// Dry run, order never reached the account
    Simulated,
    /// Brokerage accepted the order
    Completed,
    /// Submission raised or returned no order id
    Failed,
}

/// Immutable record of one executed (or attempted) trade
#[derive(Debug, Clone, Serialize)]
pub struct ExecutedTrade {
    pub symbol: String,
    pub action: TradeAction,
    pub quantity: Decimal,
    /// Quote price at validation time
    pub price: Option<Decimal>,
    /// Brokerage order id, present only on completed live orders
    pub order_id: Option<String>,
    pub status: TradeStatus,
    pub executed_at: DateTime<Utc>,
}
