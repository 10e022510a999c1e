//! Risk scoring functions
//!
//! Every function here is pure and deterministic over the portfolio
//! snapshot it is given; weights are assumed fresh (see
//! [`Portfolio::refresh`]).
//!
//! [`Portfolio::refresh`]: crate::portfolio::Portfolio::refresh

use super::stats::{population_std_dev, sample_std_dev};
use super::{PositionRisk, RiskReport};
use crate::portfolio::{AssetClass, Portfolio, Position};
use std::collections::{HashMap, HashSet};

/// Daily return series per symbol, oldest first
pub type ReturnSeries = HashMap<String, Vec<f64>>;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Score returned when a data-dependent factor has no data to work with
const UNKNOWN_SENTINEL: f64 = 50.0;

/// Assess a portfolio and produce its full risk report.
///
/// Volatility risk is only scored when `historical_returns` is supplied;
/// the overall blend shifts its weights accordingly.
pub fn assess(portfolio: &Portfolio, historical_returns: Option<&ReturnSeries>) -> RiskReport {
    let diversification = diversification_risk(portfolio);
    let concentration = concentration_risk(portfolio);
    let sector = sector_risk(portfolio);
    let market = market_risk(portfolio);
    let volatility = historical_returns.map(|returns| volatility_risk(portfolio, returns));

    let position_risks = portfolio
        .positions
        .iter()
        .map(|position| PositionRisk {
            symbol: position.symbol.clone(),
            risk_score: position_risk(position, portfolio),
            weight: position.weight,
            beta: position.fundamentals.beta,
        })
        .collect();

    let overall_score = match volatility {
        Some(vol) => {
            0.20 * diversification + 0.20 * concentration + 0.15 * sector + 0.25 * market
                + 0.20 * vol
        }
        None => 0.25 * diversification + 0.25 * concentration + 0.20 * sector + 0.30 * market,
    };

    RiskReport {
        overall_score,
        diversification_risk: diversification,
        concentration_risk: concentration,
        sector_risk: sector,
        market_risk: market,
        volatility_risk: volatility,
        position_risks,
    }
}

/// Diversification risk, 0-100, lower is better.
///
/// Base score by position-count tier, plus penalties for uneven sizing
/// and for holding few distinct asset classes.
pub fn diversification_risk(portfolio: &Portfolio) -> f64 {
    if portfolio.positions.is_empty() {
        return 0.0;
    }

    let count = portfolio.positions.len();
    let base = if count >= 20 {
        0.0
    } else if count >= 15 {
        20.0
    } else if count >= 10 {
        40.0
    } else if count >= 5 {
        60.0
    } else {
        80.0
    };

    let weights: Vec<f64> = portfolio.positions.iter().map(|p| p.weight).collect();
    let sizing_penalty = (population_std_dev(&weights) * 2.0).min(20.0);

    let classes: HashSet<AssetClass> = portfolio.positions.iter().map(|p| p.asset_class).collect();
    let class_penalty = (20.0 - classes.len() as f64 * 5.0).max(0.0);

    (base + sizing_penalty + class_penalty).min(100.0)
}

/// Concentration risk from the Herfindahl-Hirschman Index of position
/// weights, 0-100, lower is better.
///
/// The HHI is normalized from its [1/n, 1] range, then a surcharge of 2
/// points per percentage point is added for each position above 10%.
pub fn concentration_risk(portfolio: &Portfolio) -> f64 {
    if portfolio.positions.is_empty() {
        return 0.0;
    }

    let fractions: Vec<f64> = portfolio.positions.iter().map(|p| p.weight / 100.0).collect();
    let hhi: f64 = fractions.iter().map(|f| f * f).sum();

    let n = fractions.len();
    let normalized = if n > 1 {
        let min_hhi = 1.0 / n as f64;
        (hhi - min_hhi) / (1.0 - min_hhi)
    } else {
        1.0
    };

    let mut score = normalized * 100.0;
    for position in &portfolio.positions {
        if position.weight > 10.0 {
            score += (position.weight - 10.0) * 2.0;
        }
    }

    score.min(100.0)
}

/// Sector concentration risk, 0-100, lower is better.
///
/// Same HHI normalization as [`concentration_risk`] applied to sector
/// allocations, with a surcharge of 3 points per percentage point any
/// sector sits above 25%.
pub fn sector_risk(portfolio: &Portfolio) -> f64 {
    if portfolio.positions.is_empty() {
        return 0.0;
    }

    let allocations = &portfolio.sector_allocations;
    let hhi: f64 = allocations.values().map(|a| (a / 100.0).powi(2)).sum();

    let n = allocations.len();
    let normalized = if n > 1 {
        let min_hhi = 1.0 / n as f64;
        (hhi - min_hhi) / (1.0 - min_hhi)
    } else {
        1.0
    };

    let mut score = normalized * 100.0;
    for allocation in allocations.values() {
        if *allocation > 25.0 {
            score += (allocation - 25.0) * 3.0;
        }
    }

    score.min(100.0)
}

/// Market risk from the weighted-average beta, scaled so that beta 1.0
/// scores 50. Unlike the other factors this is not "lower is better";
/// it tracks co-movement with the broad market.
///
/// Positions without beta are excluded and the average is renormalized
/// over the covered weight. When nothing carries beta (including an
/// empty portfolio, whose covered weight is algebraically zero) the
/// unknown sentinel 50 is returned.
pub fn market_risk(portfolio: &Portfolio) -> f64 {
    let mut weighted_beta = 0.0;
    let mut covered_weight = 0.0;

    for position in &portfolio.positions {
        if let Some(beta) = position.fundamentals.beta {
            weighted_beta += position.weight / 100.0 * beta;
            covered_weight += position.weight / 100.0;
        }
    }

    if covered_weight == 0.0 {
        return UNKNOWN_SENTINEL;
    }
    if covered_weight < 1.0 {
        weighted_beta /= covered_weight;
    }

    (50.0 * weighted_beta).clamp(0.0, 100.0)
}

/// Volatility risk from weighted annualized realized volatility, 0-100,
/// lower is better. 40% annualized volatility (twice a typical broad
/// index) scores 100.
///
/// Positions without a return series are excluded with the same
/// renormalize-or-sentinel rule as [`market_risk`].
pub fn volatility_risk(portfolio: &Portfolio, historical_returns: &ReturnSeries) -> f64 {
    let mut weighted_volatility = 0.0;
    let mut covered_weight = 0.0;

    for position in &portfolio.positions {
        let Some(series) = historical_returns.get(&position.symbol) else {
            continue;
        };
        if series.len() < 2 {
            continue;
        }
        let annualized = sample_std_dev(series) * TRADING_DAYS_PER_YEAR.sqrt();
        weighted_volatility += position.weight / 100.0 * annualized;
        covered_weight += position.weight / 100.0;
    }

    if covered_weight == 0.0 {
        return UNKNOWN_SENTINEL;
    }
    if covered_weight < 1.0 {
        weighted_volatility /= covered_weight;
    }

    (weighted_volatility / 0.40 * 100.0).clamp(0.0, 100.0)
}

/// Risk score for a single position, 0-100, lower is better.
///
/// Blend of size risk (ramps at the 5/10/15% weight marks), beta risk
/// (beta x 50, or 50 when unknown) and the sector-allocation risk of the
/// position's sector, weighted 0.4 / 0.4 / 0.2.
pub fn position_risk(position: &Position, portfolio: &Portfolio) -> f64 {
    let weight = position.weight;
    let size_risk = if weight > 15.0 {
        100.0
    } else if weight > 10.0 {
        50.0 + (weight - 10.0) * 10.0
    } else if weight > 5.0 {
        (weight - 5.0) * 10.0
    } else {
        0.0
    };

    let beta_risk = position
        .fundamentals
        .beta
        .map(|beta| (beta * 50.0).clamp(0.0, 100.0))
        .unwrap_or(UNKNOWN_SENTINEL);

    let allocation = portfolio
        .sector_allocations
        .get(position.sector())
        .copied()
        .unwrap_or(0.0);
    let sector_score = if allocation > 25.0 {
        50.0 + (allocation - 25.0) * 2.0
    } else {
        allocation / 25.0 * 50.0
    };

    (0.4 * size_risk + 0.4 * beta_risk + 0.2 * sector_score).min(100.0)
}
