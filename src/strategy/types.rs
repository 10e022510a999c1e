//! Recommendation types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeAction {
    Buy,
    Sell,
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeAction::Buy => write!(f, "BUY"),
            TradeAction::Sell => write!(f, "SELL"),
        }
    }
}

/// How much of a symbol a recommendation wants traded.
///
/// Absolute share count and percentage are mutually exclusive by
/// construction; `Unspecified` defers to the validator's defaults
/// (close the position for sells, 5% of cash for buys).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Sizing {
    /// Absolute number of shares
    Quantity(Decimal),
    /// Percentage of the position (sell) or of cash (buy)
    Percentage(Decimal),
    /// Let the validator pick a default
    Unspecified,
}

/// A proposed trade, pending validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    /// Unique recommendation identifier
    pub id: Uuid,
    /// Trade direction
    pub action: TradeAction,
    /// Ticker symbol
    pub symbol: String,
    /// Requested size
    pub sizing: Sizing,
    /// Human-readable justification
    pub rationale: String,
    /// Urgency; higher executes first
    pub priority: u8,
    /// Generation timestamp
    pub created_at: DateTime<Utc>,
}

impl Recommendation {
    /// Create a new pending recommendation
    pub fn new(
        action: TradeAction,
        symbol: impl Into<String>,
        sizing: Sizing,
        rationale: impl Into<String>,
        priority: u8,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            action,
            symbol: symbol.into(),
            sizing,
            rationale: rationale.into(),
            priority,
            created_at: Utc::now(),
        }
    }
}
