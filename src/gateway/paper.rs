//! Simulated brokerage gateway
//!
//! Serves a fixed portfolio snapshot and quote table, and accepts every
//! order with an immediate simulated fill. Backs the `paper` gateway mode
//! and the integration tests.

use super::{BrokerGateway, GatewayError, OrderReceipt, OrderSpec, Quote};
use crate::portfolio::Portfolio;
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// On-disk snapshot format for paper mode
#[derive(Debug, Deserialize)]
struct Snapshot {
    portfolio: Portfolio,
    /// symbol -> last price
    quotes: HashMap<String, Decimal>,
}

/// Simulated brokerage with immediate fills
pub struct PaperGateway {
    portfolio: Portfolio,
    quotes: HashMap<String, Decimal>,
    /// Symbols whose submissions are refused, for failure-path tests
    failing_symbols: HashSet<String>,
    orders: Arc<RwLock<Vec<OrderSpec>>>,
}

impl PaperGateway {
    /// Create a gateway serving the given snapshot
    pub fn new(portfolio: Portfolio, quotes: HashMap<String, Decimal>) -> Self {
        Self {
            portfolio,
            quotes,
            failing_symbols: HashSet::new(),
            orders: Arc::new(RwLock::new(vec![])),
        }
    }

    /// Load a snapshot from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, GatewayError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| GatewayError::Snapshot(e.to_string()))?;
        let snapshot: Snapshot =
            serde_json::from_str(&content).map_err(|e| GatewayError::Snapshot(e.to_string()))?;
        let mut portfolio = snapshot.portfolio;
        portfolio.refresh();
        Ok(Self::new(portfolio, snapshot.quotes))
    }

    /// Refuse submissions for a symbol
    pub fn with_failing_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.failing_symbols.insert(symbol.into());
        self
    }

    /// Orders accepted so far (dry-run submissions are never recorded)
    pub async fn submitted_orders(&self) -> Vec<OrderSpec> {
        self.orders.read().await.clone()
    }
}

#[async_trait]
impl BrokerGateway for PaperGateway {
    async fn get_portfolio(&self) -> Result<Portfolio, GatewayError> {
        Ok(self.portfolio.clone())
    }

    async fn get_quotes(
        &self,
        symbols: &[String],
    ) -> Result<HashMap<String, Quote>, GatewayError> {
        let as_of = Utc::now();
        Ok(symbols
            .iter()
            .filter_map(|symbol| {
                self.quotes.get(symbol).map(|price| {
                    let quote = Quote {
                        symbol: symbol.clone(),
                        last_price: *price,
                        as_of,
                    };
                    (symbol.clone(), quote)
                })
            })
            .collect())
    }

    async fn place_order(
        &self,
        order: &OrderSpec,
        _account_id: &str,
        dry_run: bool,
    ) -> Result<OrderReceipt, GatewayError> {
        if self.failing_symbols.contains(&order.symbol) {
            return Err(GatewayError::OrderRejected(format!(
                "simulated rejection for {}",
                order.symbol
            )));
        }

        if dry_run {
            tracing::info!(
                symbol = %order.symbol,
                action = %order.action,
                quantity = %order.quantity,
                "Dry run, paper order not recorded"
            );
            return Ok(OrderReceipt { order_id: None });
        }

        let order_id = Uuid::new_v4().to_string();
        self.orders.write().await.push(order.clone());
        tracing::info!(order_id = %order_id, symbol = %order.symbol, "Paper order filled");
        Ok(OrderReceipt {
            order_id: Some(order_id),
        })
    }
}
