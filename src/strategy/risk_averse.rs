//! Risk-averse strategy focused on capital preservation
//!
//! Five independent checks, each appending recommendations on its own:
//! oversized positions, sector over-exposure, high-risk positions, idle
//! cash, and weight rebalancing. Checks deliberately overlap; a single
//! portfolio can receive several recommendations for the same symbol.
//! Deduplication is the validator's job, re-evaluated against live state
//! at execution time.

use super::{Recommendation, Sizing, Strategy, TradeAction};
use crate::config::PolicyLimits;
use crate::portfolio::{AssetClass, Portfolio, Position};
use crate::risk::stats::population_std_dev;
use crate::risk::RiskReport;
use rust_decimal::Decimal;
use std::cmp::Ordering;

const PRIORITY_POSITION_SIZE: u8 = 10;
const PRIORITY_SECTOR_EXPOSURE: u8 = 9;
const PRIORITY_HIGH_RISK: u8 = 8;
const PRIORITY_REBALANCE: u8 = 6;
const PRIORITY_CASH_DEPLOYMENT: u8 = 5;

/// Cash-deployment only fires once cash sits this many points above target
const CASH_DEPLOYMENT_SLACK: f64 = 10.0;

/// Weight stdev above which the portfolio counts as uneven
const REBALANCE_SPREAD_THRESHOLD: f64 = 8.0;

/// Minimum transfer percentage worth recommending
const REBALANCE_MIN_TRANSFER: f64 = 5.0;

fn to_f64(value: Decimal) -> f64 {
    value.try_into().unwrap_or(0.0)
}

fn from_f64(value: f64) -> Decimal {
    Decimal::try_from(value).unwrap_or_default()
}

/// The default strategy: trims breaches of the policy limits and nudges
/// the portfolio toward even, diversified sizing.
pub struct RiskAverseStrategy {
    /// Symbol bought when deploying idle cash into a new holding
    market_proxy_symbol: String,
}

impl RiskAverseStrategy {
    pub fn new(market_proxy_symbol: impl Into<String>) -> Self {
        Self {
            market_proxy_symbol: market_proxy_symbol.into(),
        }
    }

    /// Recommend trimming every position above the size limit
    fn check_position_sizes(
        &self,
        portfolio: &Portfolio,
        limits: &PolicyLimits,
        recommendations: &mut Vec<Recommendation>,
    ) {
        for position in &portfolio.positions {
            if position.weight <= limits.max_position_size_percent {
                continue;
            }
            let excess = position.weight - limits.max_position_size_percent;
            let reduction_pct = (excess / position.weight * 100.0).round();
            recommendations.push(Recommendation::new(
                TradeAction::Sell,
                &position.symbol,
                Sizing::Percentage(from_f64(reduction_pct)),
                format!(
                    "Position exceeds maximum size of {}%. Reducing to compliance level.",
                    limits.max_position_size_percent
                ),
                PRIORITY_POSITION_SIZE,
            ));
        }
    }

    /// For every over-exposed sector, trim its largest position
    fn check_sector_exposures(
        &self,
        portfolio: &Portfolio,
        limits: &PolicyLimits,
        recommendations: &mut Vec<Recommendation>,
    ) {
        let mut sectors: Vec<(&String, f64)> = portfolio
            .sector_allocations
            .iter()
            .map(|(sector, allocation)| (sector, *allocation))
            .collect();
        sectors.sort_by(|a, b| a.0.cmp(b.0));

        for (sector, allocation) in sectors {
            if allocation <= limits.max_sector_exposure_percent {
                continue;
            }
            let Some(largest) = portfolio
                .positions
                .iter()
                .filter(|p| p.sector() == sector.as_str())
                .max_by(|a, b| a.weight.partial_cmp(&b.weight).unwrap_or(Ordering::Equal))
            else {
                continue;
            };

            let excess_pct = allocation - limits.max_sector_exposure_percent;
            let excess_value = excess_pct / 100.0 * to_f64(portfolio.account_value);
            let market_value = to_f64(largest.market_value);
            if market_value <= 0.0 {
                continue;
            }
            let reduction_pct = (excess_value / market_value * 100.0).min(50.0).round();
            if reduction_pct <= 0.0 {
                continue;
            }
            recommendations.push(Recommendation::new(
                TradeAction::Sell,
                &largest.symbol,
                Sizing::Percentage(from_f64(reduction_pct)),
                format!(
                    "Sector {} exceeds maximum exposure of {}%. Reducing largest position.",
                    sector, limits.max_sector_exposure_percent
                ),
                PRIORITY_SECTOR_EXPOSURE,
            ));
        }
    }

    /// Trim positions whose blended risk score exceeds what the
    /// configured risk tolerance accepts
    fn check_high_risk_positions(
        &self,
        portfolio: &Portfolio,
        report: &RiskReport,
        limits: &PolicyLimits,
        recommendations: &mut Vec<Recommendation>,
    ) {
        let threshold = 100.0 - f64::from(limits.risk_tolerance) * 10.0;
        for entry in &report.position_risks {
            if entry.risk_score <= threshold {
                continue;
            }
            if portfolio.position(&entry.symbol).is_none() {
                continue;
            }
            let reduction_pct = (entry.risk_score - threshold).min(50.0).round();
            if reduction_pct <= 0.0 {
                continue;
            }
            recommendations.push(Recommendation::new(
                TradeAction::Sell,
                &entry.symbol,
                Sizing::Percentage(from_f64(reduction_pct)),
                format!(
                    "Position has high risk score ({:.1}/100). Reducing exposure.",
                    entry.risk_score
                ),
                PRIORITY_HIGH_RISK,
            ));
        }
    }

    /// Put idle cash to work once it drifts well above the tolerance-derived
    /// target: a broad-market buy for small portfolios, topping up an
    /// existing low-risk holding for large ones (at most one recommendation)
    fn check_cash_deployment(
        &self,
        portfolio: &Portfolio,
        limits: &PolicyLimits,
        recommendations: &mut Vec<Recommendation>,
    ) {
        let target_cash_pct = (20.0 - f64::from(limits.risk_tolerance) * 1.5).max(5.0);
        let current_cash_pct = portfolio.cash_allocation();
        if current_cash_pct <= target_cash_pct + CASH_DEPLOYMENT_SLACK {
            return;
        }
        let excess_cash_pct = current_cash_pct - target_cash_pct;

        if portfolio.positions.len() < 15 {
            recommendations.push(Recommendation::new(
                TradeAction::Buy,
                &self.market_proxy_symbol,
                Sizing::Percentage(from_f64(excess_cash_pct / 2.0)),
                format!(
                    "Cash allocation ({current_cash_pct:.1}%) above target ({target_cash_pct:.1}%). \
                     Recommending broad-market ETF for diversification."
                ),
                PRIORITY_CASH_DEPLOYMENT,
            ));
            return;
        }

        for position in &portfolio.positions {
            let low_beta = position.fundamentals.beta.unwrap_or(1.5) < 1.0;
            let is_safe = position.asset_class == AssetClass::Etf || low_beta;
            let is_small = position.weight < limits.max_position_size_percent / 2.0;
            if is_safe && is_small {
                recommendations.push(Recommendation::new(
                    TradeAction::Buy,
                    &position.symbol,
                    Sizing::Percentage(from_f64(excess_cash_pct / 3.0)),
                    format!(
                        "Cash allocation ({current_cash_pct:.1}%) above target ({target_cash_pct:.1}%). \
                         Increasing position in low-risk asset."
                    ),
                    PRIORITY_CASH_DEPLOYMENT,
                ));
                break;
            }
        }
    }

    /// When weights are very uneven, shift a slice from the largest
    /// position to the smallest as a paired sell/buy
    fn check_rebalancing(
        &self,
        portfolio: &Portfolio,
        recommendations: &mut Vec<Recommendation>,
    ) {
        if portfolio.positions.len() < 3 {
            return;
        }

        let weights: Vec<f64> = portfolio.positions.iter().map(|p| p.weight).collect();
        let spread = population_std_dev(&weights);
        if spread <= REBALANCE_SPREAD_THRESHOLD {
            return;
        }

        let by_weight = |a: &&Position, b: &&Position| {
            a.weight.partial_cmp(&b.weight).unwrap_or(Ordering::Equal)
        };
        let Some(largest) = portfolio.positions.iter().max_by(by_weight) else {
            return;
        };
        let Some(smallest) = portfolio.positions.iter().min_by(by_weight) else {
            return;
        };
        if smallest.weight <= 0.0 || largest.weight <= 3.0 * smallest.weight {
            return;
        }

        let transfer_pct = ((largest.weight - smallest.weight) * 0.2).round();
        if transfer_pct < REBALANCE_MIN_TRANSFER {
            return;
        }

        let rationale = format!(
            "Portfolio weights are uneven (std dev: {spread:.1}%). \
             Rebalancing from largest to smallest position."
        );
        recommendations.push(Recommendation::new(
            TradeAction::Sell,
            &largest.symbol,
            Sizing::Percentage(from_f64(transfer_pct)),
            rationale.clone(),
            PRIORITY_REBALANCE,
        ));
        recommendations.push(Recommendation::new(
            TradeAction::Buy,
            &smallest.symbol,
            Sizing::Percentage(from_f64(transfer_pct)),
            rationale,
            PRIORITY_REBALANCE,
        ));
    }
}

impl Strategy for RiskAverseStrategy {
    fn name(&self) -> &'static str {
        "risk-averse"
    }

    fn recommend(
        &self,
        portfolio: &Portfolio,
        report: &RiskReport,
        limits: &PolicyLimits,
    ) -> Vec<Recommendation> {
        let mut recommendations = Vec::new();

        self.check_position_sizes(portfolio, limits, &mut recommendations);
        self.check_sector_exposures(portfolio, limits, &mut recommendations);
        self.check_high_risk_positions(portfolio, report, limits, &mut recommendations);
        self.check_cash_deployment(portfolio, limits, &mut recommendations);
        self.check_rebalancing(portfolio, &mut recommendations);

        // Stable: equal priorities keep their generation order
        recommendations.sort_by(|a, b| b.priority.cmp(&a.priority));
        recommendations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::Fundamentals;
    use crate::risk::PositionRisk;
    use rust_decimal_macros::dec;

    fn position(symbol: &str, market_value: i64, sector: &str) -> Position {
        Position {
            symbol: symbol.to_string(),
            quantity: Decimal::from(10),
            asset_class: AssetClass::Equity,
            cost_basis: Decimal::from(market_value / 10),
            market_value: Decimal::from(market_value),
            current_price: Decimal::from(market_value / 10),
            fundamentals: Fundamentals {
                sector: Some(sector.to_string()),
                ..Fundamentals::default()
            },
            weight: 0.0,
        }
    }

    fn empty_report() -> RiskReport {
        RiskReport {
            overall_score: 0.0,
            diversification_risk: 0.0,
            concentration_risk: 0.0,
            sector_risk: 0.0,
            market_risk: 50.0,
            volatility_risk: None,
            position_risks: vec![],
        }
    }

    fn limits() -> PolicyLimits {
        PolicyLimits::default()
    }

    fn strategy() -> RiskAverseStrategy {
        RiskAverseStrategy::new("VTI")
    }

    #[test]
    fn test_position_size_check_worked_example() {
        // 34% weight against a 25% cap: sell round(100 * 9 / 34) = 26%
        let portfolio = Portfolio::new(
            "acct",
            vec![
                position("BIG", 3_400, "Tech"),
                position("OTHER", 6_600, "Health"),
            ],
            Decimal::from(10_000),
            Decimal::ZERO,
        );
        let mut limits = limits();
        limits.max_position_size_percent = 25.0;
        limits.max_sector_exposure_percent = 80.0;

        let recs = strategy().recommend(&portfolio, &empty_report(), &limits);
        let sizing: Vec<_> = recs
            .iter()
            .filter(|r| r.priority == PRIORITY_POSITION_SIZE)
            .collect();
        // OTHER at 66% breaches too; find the BIG one
        let big = sizing.iter().find(|r| r.symbol == "BIG").unwrap();
        assert_eq!(big.action, TradeAction::Sell);
        assert_eq!(big.sizing, Sizing::Percentage(dec!(26)));
    }

    #[test]
    fn test_sector_check_worked_example() {
        // Technology at 40% of a $5000 account, cap 25%: excess value
        // = 0.15 * 5000 = 750; against the largest position ($1200)
        // that is 62.5%, capped at 50%
        let portfolio = Portfolio::new(
            "acct",
            vec![
                position("TECH1", 1_200, "Technology"),
                position("TECH2", 800, "Technology"),
                position("STPL", 1_000, "Staples"),
            ],
            Decimal::from(5_000),
            Decimal::from(2_000),
        );
        let mut limits = limits();
        limits.max_position_size_percent = 60.0;
        limits.max_sector_exposure_percent = 25.0;

        let recs = strategy().recommend(&portfolio, &empty_report(), &limits);
        let sector: Vec<_> = recs
            .iter()
            .filter(|r| r.priority == PRIORITY_SECTOR_EXPOSURE)
            .collect();
        assert_eq!(sector.len(), 1);
        assert_eq!(sector[0].symbol, "TECH1");
        assert_eq!(sector[0].action, TradeAction::Sell);
        assert_eq!(sector[0].sizing, Sizing::Percentage(dec!(50)));
    }

    #[test]
    fn test_high_risk_check() {
        let portfolio = Portfolio::new(
            "acct",
            vec![
                position("RISKY", 2_000, "Tech"),
                position("CALM", 8_000, "Health"),
            ],
            Decimal::from(10_000),
            Decimal::ZERO,
        );
        let mut report = empty_report();
        report.position_risks = vec![
            PositionRisk {
                symbol: "RISKY".to_string(),
                risk_score: 80.0,
                weight: 20.0,
                beta: Some(2.2),
            },
            PositionRisk {
                symbol: "GONE".to_string(), // no longer held, must be skipped
                risk_score: 95.0,
                weight: 0.0,
                beta: None,
            },
        ];
        let mut limits = limits();
        limits.risk_tolerance = 5; // threshold 50
        limits.max_position_size_percent = 90.0;
        limits.max_sector_exposure_percent = 90.0;

        let recs = strategy().recommend(&portfolio, &report, &limits);
        let high_risk: Vec<_> = recs
            .iter()
            .filter(|r| r.priority == PRIORITY_HIGH_RISK)
            .collect();
        assert_eq!(high_risk.len(), 1);
        assert_eq!(high_risk[0].symbol, "RISKY");
        // round(min(80 - 50, 50)) = 30
        assert_eq!(high_risk[0].sizing, Sizing::Percentage(dec!(30)));
    }

    #[test]
    fn test_cash_deployment_small_portfolio_buys_proxy() {
        // Cash at 40%, tolerance 5 -> target 12.5, trigger above 22.5
        let portfolio = Portfolio::new(
            "acct",
            vec![
                position("A", 2_000, "Tech"),
                position("B", 2_000, "Health"),
                position("C", 2_000, "Energy"),
            ],
            Decimal::from(10_000),
            Decimal::from(4_000),
        );
        let mut limits = limits();
        limits.max_position_size_percent = 50.0;
        limits.max_sector_exposure_percent = 50.0;

        let recs = strategy().recommend(&portfolio, &empty_report(), &limits);
        let cash: Vec<_> = recs
            .iter()
            .filter(|r| r.priority == PRIORITY_CASH_DEPLOYMENT)
            .collect();
        assert_eq!(cash.len(), 1);
        assert_eq!(cash[0].symbol, "VTI");
        assert_eq!(cash[0].action, TradeAction::Buy);
        // Half of the 27.5-point excess
        assert_eq!(cash[0].sizing, Sizing::Percentage(dec!(13.75)));
    }

    #[test]
    fn test_cash_deployment_large_portfolio_tops_up_safe_holding() {
        let mut positions: Vec<Position> = (0..15)
            .map(|i| position(&format!("SYM{i}"), 400, "Tech"))
            .collect();
        // Make one holding a small ETF; it should receive the buy
        positions[7].asset_class = AssetClass::Etf;

        let portfolio = Portfolio::new("acct", positions, Decimal::from(10_000), Decimal::from(4_000));
        let mut limits = limits();
        limits.max_position_size_percent = 10.0;
        limits.max_sector_exposure_percent = 80.0;
        limits.risk_tolerance = 5;

        let recs = strategy().recommend(&portfolio, &empty_report(), &limits);
        let cash: Vec<_> = recs
            .iter()
            .filter(|r| r.priority == PRIORITY_CASH_DEPLOYMENT)
            .collect();
        assert_eq!(cash.len(), 1, "at most one deployment recommendation");
        assert_eq!(cash[0].symbol, "SYM7");
        assert_eq!(cash[0].action, TradeAction::Buy);
    }

    #[test]
    fn test_rebalancing_worked_example() {
        // Weights [34, 25, 20, 20, 1]: stdev ~ 10.8 > 8, ratio 34 > 3,
        // transfer = round(0.2 * 33) = 7
        let portfolio = Portfolio::new(
            "acct",
            vec![
                position("L", 3_400, "S1"),
                position("M1", 2_500, "S2"),
                position("M2", 2_000, "S3"),
                position("M3", 2_000, "S4"),
                position("S", 100, "S5"),
            ],
            Decimal::from(10_000),
            Decimal::ZERO,
        );
        let mut limits = limits();
        limits.max_position_size_percent = 50.0;
        limits.max_sector_exposure_percent = 50.0;

        let recs = strategy().recommend(&portfolio, &empty_report(), &limits);
        let rebalance: Vec<_> = recs
            .iter()
            .filter(|r| r.priority == PRIORITY_REBALANCE)
            .collect();
        assert_eq!(rebalance.len(), 2);
        assert_eq!(rebalance[0].action, TradeAction::Sell);
        assert_eq!(rebalance[0].symbol, "L");
        assert_eq!(rebalance[0].sizing, Sizing::Percentage(dec!(7)));
        assert_eq!(rebalance[1].action, TradeAction::Buy);
        assert_eq!(rebalance[1].symbol, "S");
        assert_eq!(rebalance[1].sizing, Sizing::Percentage(dec!(7)));
    }

    #[test]
    fn test_rebalancing_fires_above_min_transfer() {
        // Weights [35, 25, 25, 10, 5]: stdev ~ 11 > 8, ratio 7 > 3,
        // transfer = round(0.2 * 30) = 6 >= 5
        let portfolio = Portfolio::new(
            "acct",
            vec![
                position("L", 3_500, "S1"),
                position("M", 2_500, "S2"),
                position("M2", 2_500, "S3"),
                position("S", 1_000, "S4"),
                position("S2", 500, "S5"),
            ],
            Decimal::from(10_000),
            Decimal::ZERO,
        );
        let mut limits = limits();
        limits.max_position_size_percent = 50.0;
        limits.max_sector_exposure_percent = 50.0;

        let recs = strategy().recommend(&portfolio, &empty_report(), &limits);
        let rebalance_count = recs
            .iter()
            .filter(|r| r.priority == PRIORITY_REBALANCE)
            .count();
        assert_eq!(rebalance_count, 2);
    }

    #[test]
    fn test_rebalancing_skipped_below_min_transfer() {
        // Weights [27, 27, 27, 5, 5]: stdev ~ 10.8 > 8 and 27 > 3 * 5,
        // but transfer = round(0.2 * 22) = 4 < 5, so nothing is emitted
        let portfolio = Portfolio::new(
            "acct",
            vec![
                position("L1", 2_700, "S1"),
                position("L2", 2_700, "S2"),
                position("L3", 2_700, "S3"),
                position("T1", 500, "S4"),
                position("T2", 500, "S5"),
            ],
            Decimal::from(10_000),
            Decimal::from(900),
        );
        let mut limits = limits();
        limits.max_position_size_percent = 50.0;
        limits.max_sector_exposure_percent = 50.0;

        let recs = strategy().recommend(&portfolio, &empty_report(), &limits);
        assert_eq!(
            recs.iter()
                .filter(|r| r.priority == PRIORITY_REBALANCE)
                .count(),
            0
        );
    }

    #[test]
    fn test_rebalancing_skipped_when_spread_small() {
        // Weights [30, 25, 25, 20]: stdev ~ 3.5 <= 8
        let portfolio = Portfolio::new(
            "acct",
            vec![
                position("A", 3_000, "S1"),
                position("B", 2_500, "S2"),
                position("C", 2_500, "S3"),
                position("D", 2_000, "S4"),
            ],
            Decimal::from(10_000),
            Decimal::ZERO,
        );
        let mut limits = limits();
        limits.max_position_size_percent = 50.0;
        limits.max_sector_exposure_percent = 50.0;

        let recs = strategy().recommend(&portfolio, &empty_report(), &limits);
        assert_eq!(
            recs.iter()
                .filter(|r| r.priority == PRIORITY_REBALANCE)
                .count(),
            0
        );
    }

    #[test]
    fn test_recommendations_sorted_by_priority_descending() {
        // Portfolio breaching several checks at once
        let portfolio = Portfolio::new(
            "acct",
            vec![
                position("HUGE", 3_400, "Technology"),
                position("T2", 1_000, "Technology"),
                position("H1", 1_000, "Health"),
                position("S", 100, "Energy"),
            ],
            Decimal::from(10_000),
            Decimal::from(4_500),
        );
        let mut report = empty_report();
        report.position_risks = vec![PositionRisk {
            symbol: "HUGE".to_string(),
            risk_score: 90.0,
            weight: 34.0,
            beta: Some(1.8),
        }];
        let mut limits = limits();
        limits.max_position_size_percent = 25.0;
        limits.max_sector_exposure_percent = 25.0;

        let recs = strategy().recommend(&portfolio, &report, &limits);
        assert!(recs.len() >= 3);
        for pair in recs.windows(2) {
            assert!(
                pair[0].priority >= pair[1].priority,
                "not sorted: {:?}",
                recs.iter().map(|r| r.priority).collect::<Vec<_>>()
            );
        }
    }

    #[test]
    fn test_no_recommendations_for_compliant_portfolio() {
        let portfolio = Portfolio::new(
            "acct",
            vec![
                position("A", 2_000, "S1"),
                position("B", 2_000, "S2"),
                position("C", 2_000, "S3"),
                position("D", 2_000, "S4"),
                position("E", 1_000, "S5"),
            ],
            Decimal::from(10_000),
            Decimal::from(1_000),
        );
        let mut limits = limits();
        limits.max_position_size_percent = 25.0;
        limits.max_sector_exposure_percent = 25.0;

        let recs = strategy().recommend(&portfolio, &empty_report(), &limits);
        assert!(recs.is_empty(), "got {recs:?}");
    }
}
