//! Portfolio entity with derived allocation state

use super::Position;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A snapshot of one brokerage account.
///
/// Constructed fresh on every retrieval from the gateway. Position weights
/// and sector allocations are derived state: any mutation of position
/// prices or values must go through [`apply_prices`] (or be followed by
/// [`refresh`]) before risk or recommendation math runs. Stale weights are
/// a correctness bug, not a style choice.
///
/// [`apply_prices`]: Portfolio::apply_prices
/// [`refresh`]: Portfolio::refresh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portfolio {
    /// Brokerage account identifier
    pub account_id: String,
    /// Holdings, in the order the gateway reported them
    pub positions: Vec<Position>,
    /// Total liquidation value including cash
    pub account_value: Decimal,
    /// Uninvested cash
    pub cash_balance: Decimal,
    /// Snapshot time
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    /// Sector name -> percent of account value. Derived, see [`refresh`].
    ///
    /// [`refresh`]: Portfolio::refresh
    #[serde(default)]
    pub sector_allocations: HashMap<String, f64>,
}

impl Portfolio {
    /// Create a portfolio snapshot and compute its derived state
    pub fn new(
        account_id: impl Into<String>,
        positions: Vec<Position>,
        account_value: Decimal,
        cash_balance: Decimal,
    ) -> Self {
        let mut portfolio = Self {
            account_id: account_id.into(),
            positions,
            account_value,
            cash_balance,
            timestamp: Utc::now(),
            sector_allocations: HashMap::new(),
        };
        portfolio.refresh();
        portfolio
    }

    /// Recompute position weights and sector allocations.
    ///
    /// Must be called after any change to position values or the account
    /// value. Weights sum with the cash allocation to ~100 when the
    /// account value is positive.
    pub fn refresh(&mut self) {
        if self.account_value.is_zero() {
            for position in &mut self.positions {
                position.weight = 0.0;
            }
            self.sector_allocations.clear();
            return;
        }

        for position in &mut self.positions {
            position.weight = (position.market_value / self.account_value * Decimal::ONE_HUNDRED)
                .try_into()
                .unwrap_or(0.0);
        }

        let mut allocations: HashMap<String, Decimal> = HashMap::new();
        for position in &self.positions {
            *allocations
                .entry(position.sector().to_string())
                .or_insert(Decimal::ZERO) += position.market_value;
        }
        self.sector_allocations = allocations
            .into_iter()
            .map(|(sector, value)| {
                let pct = (value / self.account_value * Decimal::ONE_HUNDRED)
                    .try_into()
                    .unwrap_or(0.0);
                (sector, pct)
            })
            .collect();
    }

    /// Refresh position prices and market values from a symbol -> last
    /// price map, then recompute the account value and derived state.
    pub fn apply_prices(&mut self, prices: &HashMap<String, Decimal>) {
        for position in &mut self.positions {
            if let Some(price) = prices.get(&position.symbol) {
                position.current_price = *price;
                position.market_value = position.quantity * *price;
            }
        }
        self.account_value = self.total_market_value() + self.cash_balance;
        self.refresh();
    }

    /// Percent of account value held as cash
    pub fn cash_allocation(&self) -> f64 {
        if self.account_value.is_zero() {
            return 0.0;
        }
        (self.cash_balance / self.account_value * Decimal::ONE_HUNDRED)
            .try_into()
            .unwrap_or(0.0)
    }

    /// Look up a position by symbol
    pub fn position(&self, symbol: &str) -> Option<&Position> {
        self.positions.iter().find(|p| p.symbol == symbol)
    }

    /// Combined market value of all positions
    pub fn total_market_value(&self) -> Decimal {
        self.positions.iter().map(|p| p.market_value).sum()
    }

    /// Combined cost basis of all positions
    pub fn total_cost_basis(&self) -> Decimal {
        self.positions
            .iter()
            .map(|p| p.cost_basis * p.quantity)
            .sum()
    }

    /// Combined unrealized profit/loss
    pub fn total_unrealized_pl(&self) -> Decimal {
        self.positions.iter().map(|p| p.unrealized_pl()).sum()
    }
}
