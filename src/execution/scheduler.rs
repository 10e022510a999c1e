//! Sequential trade execution
//!
//! Processes recommendations highest priority first, re-validating each
//! one against a fresh portfolio snapshot before submission. Gateway
//! fetch failures abort the cycle; per-trade submission failures are
//! recorded and never stop later trades.

use super::validator::{validate, Verdict};
use super::{ExecutedTrade, TradeStatus};
use crate::config::{ExecutionConfig, PolicyLimits};
use crate::gateway::{BrokerGateway, GatewayError, OrderSpec};
use crate::strategy::Recommendation;
use crate::telemetry;
use chrono::Utc;
use std::time::Duration;

/// Execute a batch of recommendations against the gateway.
///
/// With auto-trading disabled this is an explicit no-op: no validation,
/// no gateway calls, an empty result. Otherwise the highest-priority
/// recommendations up to `max_trades_per_session` are considered;
/// recommendations beyond the cap are simply not looked at this cycle.
///
/// The portfolio snapshot is re-fetched per recommendation but is not
/// guaranteed to reflect fills from earlier in the same session; the
/// validator may accept a trade on the strength of slightly stale state.
pub async fn execute_trades(
    mut recommendations: Vec<Recommendation>,
    gateway: &dyn BrokerGateway,
    limits: &PolicyLimits,
    execution: &ExecutionConfig,
) -> Result<Vec<ExecutedTrade>, GatewayError> {
    if !limits.enable_auto_trading {
        tracing::info!("Auto-trading disabled, skipping execution");
        return Ok(Vec::new());
    }

    recommendations.sort_by(|a, b| b.priority.cmp(&a.priority));
    recommendations.truncate(limits.max_trades_per_session);
    let batch_len = recommendations.len();
    let cooldown = Duration::from_millis(execution.trade_cooldown_ms);
    let mut executed = Vec::new();

    for (index, recommendation) in recommendations.into_iter().enumerate() {
        let portfolio = gateway.get_portfolio().await?;
        let quotes = gateway
            .get_quotes(std::slice::from_ref(&recommendation.symbol))
            .await?;

        let quantity = match validate(&recommendation, &portfolio, &quotes, limits) {
            Verdict::Accepted { quantity } => quantity,
            Verdict::Rejected { reason } => {
                tracing::warn!(
                    symbol = %recommendation.symbol,
                    action = %recommendation.action,
                    %reason,
                    "Recommendation rejected by validator"
                );
                telemetry::count_trade_rejected();
                continue;
            }
        };

        let order = OrderSpec {
            symbol: recommendation.symbol.clone(),
            action: recommendation.action,
            quantity,
        };
        let price = quotes.get(&recommendation.symbol).map(|q| q.last_price);

        let trade = match gateway
            .place_order(&order, &portfolio.account_id, limits.dry_run)
            .await
        {
            Ok(receipt) => {
                let status = if limits.dry_run {
                    TradeStatus::Simulated
                } else if receipt.order_id.is_some() {
                    TradeStatus::Completed
                } else {
                    TradeStatus::Failed
                };
                tracing::info!(
                    symbol = %order.symbol,
                    action = %order.action,
                    quantity = %order.quantity,
                    ?status,
                    "Order processed"
                );
                let trade = ExecutedTrade {
                    symbol: order.symbol,
                    action: order.action,
                    quantity,
                    price,
                    order_id: receipt.order_id,
                    status,
                    executed_at: Utc::now(),
                };
                // Rate-limit courtesy between submissions; nothing
                // follows the last one
                if index + 1 < batch_len {
                    tokio::time::sleep(cooldown).await;
                }
                trade
            }
            Err(error) => {
                tracing::warn!(
                    symbol = %order.symbol,
                    %error,
                    "Order submission failed"
                );
                ExecutedTrade {
                    symbol: order.symbol,
                    action: order.action,
                    quantity,
                    price,
                    order_id: None,
                    status: TradeStatus::Failed,
                    executed_at: Utc::now(),
                }
            }
        };

        telemetry::count_trade(trade.status);
        executed.push(trade);
    }

    Ok(executed)
}
