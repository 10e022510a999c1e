//! Trade validation against live account state
//!
//! Every recommendation is re-checked against the freshly fetched
//! portfolio and quotes immediately before submission. Rejection is a
//! value, not an error: the scheduler logs it and moves on.

use crate::config::PolicyLimits;
use crate::gateway::Quote;
use crate::portfolio::Portfolio;
use crate::strategy::{Recommendation, Sizing, TradeAction};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

/// Fraction of cash a buy with no explicit size resolves to
const DEFAULT_BUY_CASH_FRACTION: Decimal = dec!(0.05);

/// Outcome of validating one recommendation
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// Trade may be submitted with this resolved share count
    Accepted { quantity: Decimal },
    /// Trade must be skipped
    Rejected { reason: String },
}

fn reject(reason: impl Into<String>) -> Verdict {
    Verdict::Rejected {
        reason: reason.into(),
    }
}

/// Validate a recommendation against the live portfolio and quotes.
///
/// Checks run in order and short-circuit on the first failure: symbol
/// resolvable, quantity resolvable within the configured bounds, then
/// action-specific cash / reserve / weight checks for buys and holding /
/// remainder checks for sells.
pub fn validate(
    recommendation: &Recommendation,
    portfolio: &Portfolio,
    quotes: &HashMap<String, Quote>,
    limits: &PolicyLimits,
) -> Verdict {
    let symbol = &recommendation.symbol;

    let Some(quote) = quotes.get(symbol) else {
        return reject(format!("no quote available for {symbol}"));
    };
    let price = quote.last_price;
    if price <= Decimal::ZERO {
        return reject(format!("non-positive quote price for {symbol}"));
    }

    let held = portfolio.position(symbol);

    let resolved = match (recommendation.sizing, recommendation.action) {
        // An explicit sell quantity is checked against the holding here,
        // before the maximum clamp can shrink it back into range
        (Sizing::Quantity(quantity), TradeAction::Sell) => match held {
            Some(position) if quantity <= position.quantity => quantity,
            Some(position) => {
                return reject(format!(
                    "quantity {quantity} exceeds held {}",
                    position.quantity
                ));
            }
            None => return reject(format!("no position in {symbol} to sell")),
        },
        (Sizing::Quantity(quantity), TradeAction::Buy) => quantity,
        (Sizing::Percentage(pct), TradeAction::Buy) => {
            (portfolio.cash_balance * pct / Decimal::ONE_HUNDRED / price).floor()
        }
        (Sizing::Percentage(pct), TradeAction::Sell) => match held {
            Some(position) => (position.quantity * pct / Decimal::ONE_HUNDRED).floor(),
            None => return reject(format!("no position in {symbol} to sell")),
        },
        (Sizing::Unspecified, TradeAction::Buy) => {
            (portfolio.cash_balance * DEFAULT_BUY_CASH_FRACTION / price).floor()
        }
        (Sizing::Unspecified, TradeAction::Sell) => match held {
            Some(position) => position.quantity,
            None => return reject(format!("no position in {symbol} to sell")),
        },
    };

    if resolved <= Decimal::ZERO {
        return reject(format!("resolved quantity {resolved} is not positive"));
    }
    let quantity = resolved.min(limits.max_trade_quantity);
    if quantity < limits.min_trade_quantity {
        return reject(format!(
            "quantity {quantity} below minimum {}",
            limits.min_trade_quantity
        ));
    }

    match recommendation.action {
        TradeAction::Buy => {
            let cost = quantity * price;
            if cost > portfolio.cash_balance {
                return reject(format!(
                    "cost {cost} exceeds cash balance {}",
                    portfolio.cash_balance
                ));
            }

            let remaining_cash = portfolio.cash_balance - cost;
            let reserve = portfolio.account_value
                * Decimal::try_from(limits.min_cash_reserve_percent).unwrap_or_default()
                / Decimal::ONE_HUNDRED;
            if remaining_cash < reserve {
                return reject(format!(
                    "trade would leave cash {remaining_cash} below reserve {reserve}"
                ));
            }

            let existing_value = held.map(|p| p.market_value).unwrap_or(Decimal::ZERO);
            let denominator = portfolio.account_value + cost - existing_value;
            if denominator > Decimal::ZERO {
                let new_weight: f64 = ((existing_value + cost) / denominator
                    * Decimal::ONE_HUNDRED)
                    .try_into()
                    .unwrap_or(f64::MAX);
                if new_weight > limits.max_position_size_percent {
                    return reject(format!(
                        "resulting weight {new_weight:.1}% exceeds limit {}%",
                        limits.max_position_size_percent
                    ));
                }
            }
        }
        TradeAction::Sell => {
            let Some(position) = held else {
                return reject(format!("no position in {symbol} to sell"));
            };
            if quantity > position.quantity {
                return reject(format!(
                    "quantity {quantity} exceeds held {}",
                    position.quantity
                ));
            }
            let remainder = position.quantity - quantity;
            if remainder > Decimal::ZERO && remainder < limits.min_position_size {
                return reject(format!(
                    "sale would leave {remainder} shares, below minimum position size {}",
                    limits.min_position_size
                ));
            }
        }
    }

    Verdict::Accepted { quantity }
}
