//! Plain-text cycle summary

use crate::execution::{ExecutedTrade, TradeStatus};
use crate::session::Analysis;
use crate::strategy::Sizing;
use std::fmt::Write;

/// Render an analysis and any executed trades as plain text
pub fn render(analysis: &Analysis, executed: &[ExecutedTrade]) -> String {
    let portfolio = &analysis.portfolio;
    let report = &analysis.report;
    let mut out = String::new();

    // Infallible writes to a String
    let _ = writeln!(
        out,
        "Portfolio report - account {} ({})",
        portfolio.account_id,
        portfolio.timestamp.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(
        out,
        "Account value: ${:.2}   Cash: ${:.2} ({:.1}%)",
        portfolio.account_value,
        portfolio.cash_balance,
        portfolio.cash_allocation()
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "Risk scores (0 = lowest, 100 = highest)");
    let _ = writeln!(out, "  Overall:         {:6.1}", report.overall_score);
    let _ = writeln!(out, "  Diversification: {:6.1}", report.diversification_risk);
    let _ = writeln!(out, "  Concentration:   {:6.1}", report.concentration_risk);
    let _ = writeln!(out, "  Sector:          {:6.1}", report.sector_risk);
    let _ = writeln!(out, "  Market:          {:6.1}", report.market_risk);
    match report.volatility_risk {
        Some(volatility) => {
            let _ = writeln!(out, "  Volatility:      {volatility:6.1}");
        }
        None => {
            let _ = writeln!(out, "  Volatility:      n/a (no return history)");
        }
    }
    let _ = writeln!(out);

    if !portfolio.positions.is_empty() {
        let _ = writeln!(out, "Positions");
        for position in &portfolio.positions {
            let risk = report
                .position_risks
                .iter()
                .find(|r| r.symbol == position.symbol)
                .map(|r| format!("{:.1}", r.risk_score))
                .unwrap_or_else(|| "-".to_string());
            let _ = writeln!(
                out,
                "  {:<8} {:>6.1}%  ${:>12.2}  risk {}",
                position.symbol, position.weight, position.market_value, risk
            );
        }
        let _ = writeln!(out);
    }

    if analysis.recommendations.is_empty() {
        let _ = writeln!(out, "No recommendations.");
    } else {
        let _ = writeln!(out, "Recommendations");
        for rec in &analysis.recommendations {
            let sizing = match rec.sizing {
                Sizing::Quantity(quantity) => format!("{quantity} shares"),
                Sizing::Percentage(pct) => format!("{pct}%"),
                Sizing::Unspecified => "default size".to_string(),
            };
            let _ = writeln!(
                out,
                "  [p{}] {} {} ({}) - {}",
                rec.priority, rec.action, rec.symbol, sizing, rec.rationale
            );
        }
    }

    if !executed.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Executed trades");
        for trade in executed {
            let status = match trade.status {
                TradeStatus::Simulated => "SIMULATED",
                TradeStatus::Completed => "COMPLETED",
                TradeStatus::Failed => "FAILED",
            };
            let price = trade
                .price
                .map(|p| format!(" @ ${p}"))
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "  {status:<9} {} {} x {}{price}",
                trade.action, trade.symbol, trade.quantity
            );
        }
    }

    out
}
