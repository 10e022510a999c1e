//! Prometheus metrics

use crate::execution::TradeStatus;
use crate::risk::RiskReport;
use metrics::{counter, gauge};

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Blended portfolio risk score
    OverallRisk,
    /// Diversification sub-score
    DiversificationRisk,
    /// Concentration sub-score
    ConcentrationRisk,
    /// Sector exposure sub-score
    SectorRisk,
    /// Market beta sub-score
    MarketRisk,
    /// Account liquidation value
    AccountValue,
    /// Cash percentage of account value
    CashAllocation,
    /// Open position count
    PositionCount,
    /// Recommendations produced this cycle
    RecommendationCount,
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    let metric_name = match metric {
        GaugeMetric::OverallRisk => "folio_overall_risk_score",
        GaugeMetric::DiversificationRisk => "folio_diversification_risk_score",
        GaugeMetric::ConcentrationRisk => "folio_concentration_risk_score",
        GaugeMetric::SectorRisk => "folio_sector_risk_score",
        GaugeMetric::MarketRisk => "folio_market_risk_score",
        GaugeMetric::AccountValue => "folio_account_value_usd",
        GaugeMetric::CashAllocation => "folio_cash_allocation_pct",
        GaugeMetric::PositionCount => "folio_open_positions",
        GaugeMetric::RecommendationCount => "folio_recommendations",
    };
    gauge!(metric_name).set(value);
}

/// Publish every sub-score of a risk report
pub fn record_risk_report(report: &RiskReport) {
    set_gauge(GaugeMetric::OverallRisk, report.overall_score);
    set_gauge(GaugeMetric::DiversificationRisk, report.diversification_risk);
    set_gauge(GaugeMetric::ConcentrationRisk, report.concentration_risk);
    set_gauge(GaugeMetric::SectorRisk, report.sector_risk);
    set_gauge(GaugeMetric::MarketRisk, report.market_risk);
}

/// Count one processed trade by terminal status
pub fn count_trade(status: TradeStatus) {
    let label = match status {
        TradeStatus::Simulated => "simulated",
        TradeStatus::Completed => "completed",
        TradeStatus::Failed => "failed",
    };
    counter!("folio_trades_total", "status" => label).increment(1);
}

/// Count one recommendation the validator refused
pub fn count_trade_rejected() {
    counter!("folio_trades_rejected_total").increment(1);
}

/// Count one completed analysis/trading cycle
pub fn count_cycle() {
    counter!("folio_cycles_total").increment(1);
}
