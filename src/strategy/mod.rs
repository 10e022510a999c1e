//! Recommendation strategies
//!
//! A [`Strategy`] turns a portfolio snapshot plus its risk report into an
//! ordered list of trade recommendations, under the policy limits it is
//! handed. Concrete strategies are selected by configuration.

mod defined_risk;
mod risk_averse;
mod types;

pub use defined_risk::DefinedRiskStrategy;
pub use risk_averse::RiskAverseStrategy;
pub use types::{Recommendation, Sizing, TradeAction};

use crate::config::{PolicyLimits, StrategyConfig, StrategyKind};
use crate::portfolio::Portfolio;
use crate::risk::RiskReport;

/// Capability interface for recommendation strategies.
///
/// Implementations must be pure: no side effects, no ambient
/// configuration, the same inputs always produce the same output.
pub trait Strategy: Send + Sync {
    /// Strategy name, for logs and reports
    fn name(&self) -> &'static str;

    /// Produce recommendations sorted by priority, highest first
    fn recommend(
        &self,
        portfolio: &Portfolio,
        report: &RiskReport,
        limits: &PolicyLimits,
    ) -> Vec<Recommendation>;
}

/// Build the configured strategy
pub fn build(config: &StrategyConfig) -> Box<dyn Strategy> {
    match config.kind {
        StrategyKind::RiskAverse => Box::new(RiskAverseStrategy::new(
            config.market_proxy_symbol.clone(),
        )),
        StrategyKind::DefinedRisk => Box::new(DefinedRiskStrategy),
    }
}
