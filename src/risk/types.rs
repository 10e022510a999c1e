//! Risk report types

use serde::{Deserialize, Serialize};

/// Risk entry for a single position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionRisk {
    /// Ticker symbol
    pub symbol: String,
    /// Blended risk score, 0-100 (lower is better)
    pub risk_score: f64,
    /// Position weight at assessment time, percent
    pub weight: f64,
    /// Beta, if the feed supplied one
    pub beta: Option<f64>,
}

/// Risk assessment of a portfolio snapshot.
///
/// All scores are on a 0-100 scale. Diversification, concentration,
/// sector and volatility scores read "lower is better". Market risk does
/// not: it tracks co-movement with the broad market (50 = market beta),
/// and returns exactly 50 as an "unknown" sentinel when no position
/// carries beta data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskReport {
    /// Weighted blend of the sub-scores
    pub overall_score: f64,
    /// Position count and sizing evenness
    pub diversification_risk: f64,
    /// Herfindahl-Hirschman concentration of position weights
    pub concentration_risk: f64,
    /// Herfindahl-Hirschman concentration of sector allocations
    pub sector_risk: f64,
    /// Weighted-average beta, scaled
    pub market_risk: f64,
    /// Weighted annualized realized volatility; only computed when a
    /// historical return series was supplied
    pub volatility_risk: Option<f64>,
    /// Per-position risk entries, in portfolio order
    pub position_risks: Vec<PositionRisk>,
}
