//! Defined-risk strategy placeholder
//!
//! Reserved for option-structure based recommendations (collars, spreads)
//! with a bounded downside. Selectable via configuration but produces no
//! recommendations yet.

use super::{Recommendation, Strategy};
use crate::config::PolicyLimits;
use crate::portfolio::Portfolio;
use crate::risk::RiskReport;

pub struct DefinedRiskStrategy;

impl Strategy for DefinedRiskStrategy {
    fn name(&self) -> &'static str {
        "defined-risk"
    }

    fn recommend(
        &self,
        _portfolio: &Portfolio,
        _report: &RiskReport,
        _limits: &PolicyLimits,
    ) -> Vec<Recommendation> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_produces_no_recommendations() {
        let portfolio = Portfolio::new("acct", vec![], Decimal::ZERO, Decimal::ZERO);
        let report = crate::risk::assess(&portfolio, None);
        let recs = DefinedRiskStrategy.recommend(&portfolio, &report, &PolicyLimits::default());
        assert!(recs.is_empty());
    }
}
