//! One analysis / trading cycle
//!
//! Orchestrates the full pipeline: fetch the portfolio, refresh it with
//! live quotes, assess risk, generate recommendations, and (for a full
//! cycle) hand them to the execution scheduler. Callers must serialize
//! cycles against the same account; nothing here locks.

use crate::config::Config;
use crate::execution::{self, ExecutedTrade};
use crate::gateway::{BrokerGateway, GatewayError};
use crate::portfolio::Portfolio;
use crate::risk::{self, RiskReport};
use crate::strategy::{self, Recommendation};
use crate::telemetry::{self, GaugeMetric};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Read-only result of one analysis pass
#[derive(Debug, Clone)]
pub struct Analysis {
    pub portfolio: Portfolio,
    pub report: RiskReport,
    pub recommendations: Vec<Recommendation>,
}

/// Result of a full trading cycle
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    pub analysis: Analysis,
    pub executed: Vec<ExecutedTrade>,
}

/// Fetch, refresh, assess, and recommend. No orders are placed.
///
/// A failed quote refresh degrades to a warning and the gateway's
/// snapshot prices; a failed portfolio fetch aborts.
pub async fn analyze(
    gateway: &dyn BrokerGateway,
    config: &Config,
) -> Result<Analysis, GatewayError> {
    let mut portfolio = gateway.get_portfolio().await?;

    let symbols: Vec<String> = portfolio
        .positions
        .iter()
        .map(|p| p.symbol.clone())
        .collect();
    if !symbols.is_empty() {
        match gateway.get_quotes(&symbols).await {
            Ok(quotes) => {
                let prices: HashMap<String, Decimal> = quotes
                    .into_iter()
                    .map(|(symbol, quote)| (symbol, quote.last_price))
                    .collect();
                portfolio.apply_prices(&prices);
            }
            Err(error) => {
                tracing::warn!(%error, "Quote refresh failed, keeping snapshot prices");
            }
        }
    }

    let report = risk::assess(&portfolio, None);
    telemetry::record_risk_report(&report);
    telemetry::set_gauge(
        GaugeMetric::AccountValue,
        portfolio.account_value.try_into().unwrap_or(0.0),
    );
    telemetry::set_gauge(GaugeMetric::CashAllocation, portfolio.cash_allocation());
    telemetry::set_gauge(GaugeMetric::PositionCount, portfolio.positions.len() as f64);

    let strategy = strategy::build(&config.strategy);
    let recommendations = strategy.recommend(&portfolio, &report, &config.limits);
    telemetry::set_gauge(
        GaugeMetric::RecommendationCount,
        recommendations.len() as f64,
    );

    tracing::info!(
        account_id = %portfolio.account_id,
        overall_risk = report.overall_score,
        strategy = strategy.name(),
        recommendations = recommendations.len(),
        "Analysis complete"
    );

    Ok(Analysis {
        portfolio,
        report,
        recommendations,
    })
}

/// Analyze, then execute the resulting recommendations
pub async fn run_cycle(
    gateway: &dyn BrokerGateway,
    config: &Config,
) -> Result<CycleOutcome, GatewayError> {
    let analysis = analyze(gateway, config).await?;
    let executed = execution::execute_trades(
        analysis.recommendations.clone(),
        gateway,
        &config.limits,
        &config.execution,
    )
    .await?;
    telemetry::count_cycle();

    Ok(CycleOutcome { analysis, executed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        ExecutionConfig, GatewayConfig, GatewayMode, PolicyLimits, StrategyConfig, TelemetryConfig,
    };
    use crate::gateway::PaperGateway;
    use crate::portfolio::{AssetClass, Fundamentals, Position};
    use rust_decimal_macros::dec;

    fn config() -> Config {
        Config {
            gateway: GatewayConfig {
                mode: GatewayMode::Paper,
                account_id: "acct".to_string(),
                base_url: None,
                api_key_env: "UNUSED".to_string(),
                portfolio_file: None,
                timeout_secs: 10,
            },
            strategy: StrategyConfig::default(),
            limits: PolicyLimits::default(),
            execution: ExecutionConfig {
                trade_cooldown_ms: 0,
            },
            telemetry: TelemetryConfig {
                log_level: "info".to_string(),
                metrics_port: None,
            },
        }
    }

    fn gateway() -> PaperGateway {
        let positions = vec![Position {
            symbol: "AAPL".to_string(),
            quantity: dec!(10),
            asset_class: AssetClass::Equity,
            cost_basis: dec!(100),
            market_value: dec!(1500),
            current_price: dec!(150),
            fundamentals: Fundamentals::default(),
            weight: 0.0,
        }];
        let portfolio = Portfolio::new("acct", positions, dec!(10000), dec!(8500));
        PaperGateway::new(
            portfolio,
            std::collections::HashMap::from([("AAPL".to_string(), dec!(160))]),
        )
    }

    #[tokio::test]
    async fn test_analyze_refreshes_prices_from_quotes() {
        let analysis = analyze(&gateway(), &config()).await.unwrap();
        let position = analysis.portfolio.position("AAPL").unwrap();
        assert_eq!(position.current_price, dec!(160));
        assert_eq!(position.market_value, dec!(1600));
        assert_eq!(analysis.portfolio.account_value, dec!(10100));
        assert!(analysis.report.overall_score > 0.0);
    }

    #[tokio::test]
    async fn test_run_cycle_with_auto_trading_off_executes_nothing() {
        let outcome = run_cycle(&gateway(), &config()).await.unwrap();
        // One position with 40%+ cash yields recommendations, none executed
        assert!(outcome.executed.is_empty());
    }
}
