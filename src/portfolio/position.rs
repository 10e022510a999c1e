//! Position entity

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Broad asset class of a holding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    /// Common stock
    Equity,
    /// Exchange-traded fund
    Etf,
    /// Mutual fund
    MutualFund,
    /// Fixed income
    Bond,
    /// Listed option
    Option,
    /// Anything the brokerage reports that we do not model further
    Other,
}

/// Fundamental data attached to a position by the brokerage feed.
///
/// All fields are optional; risk scoring substitutes neutral defaults
/// where data is missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fundamentals {
    /// GICS-style sector name
    #[serde(default)]
    pub sector: Option<String>,
    /// Sensitivity to broad-market movement (1.0 = moves with market)
    #[serde(default)]
    pub beta: Option<f64>,
    /// Trailing price/earnings ratio
    #[serde(default)]
    pub pe_ratio: Option<f64>,
    /// Annual dividend yield, percent
    #[serde(default)]
    pub dividend_yield: Option<f64>,
}

/// A single holding in a portfolio
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    /// Ticker symbol
    pub symbol: String,
    /// Signed share count (long minus short)
    pub quantity: Decimal,
    /// Asset class tag
    pub asset_class: AssetClass,
    /// Cost basis per unit
    pub cost_basis: Decimal,
    /// Current market value of the holding
    pub market_value: Decimal,
    /// Last traded price
    pub current_price: Decimal,
    /// Fundamental data (sector, beta, ...)
    #[serde(default)]
    pub fundamentals: Fundamentals,
    /// Percent of account value. Derived state: owned by the portfolio,
    /// recomputed via [`Portfolio::refresh`] whenever position values
    /// change. Not an independent fact about the position.
    ///
    /// [`Portfolio::refresh`]: super::Portfolio::refresh
    #[serde(default)]
    pub weight: f64,
}

impl Position {
    /// Unrealized profit/loss in account currency
    pub fn unrealized_pl(&self) -> Decimal {
        self.market_value - self.cost_basis * self.quantity
    }

    /// Unrealized profit/loss as a percentage of cost
    pub fn unrealized_pl_percent(&self) -> f64 {
        if self.cost_basis.is_zero() || self.quantity.is_zero() {
            return 0.0;
        }
        let ratio: f64 = (self.current_price / self.cost_basis)
            .try_into()
            .unwrap_or(0.0);
        (ratio - 1.0) * 100.0
    }

    /// Sector name, defaulting to "Unknown" when the feed has none
    pub fn sector(&self) -> &str {
        self.fundamentals.sector.as_deref().unwrap_or("Unknown")
    }
}
