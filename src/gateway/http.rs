//! REST brokerage client
//!
//! Thin client over a brokerage REST API: account snapshot with
//! positions, batched quotes, and order submission. Authenticates with a
//! bearer token read from an environment variable at construction time.

use super::{BrokerGateway, GatewayError, OrderReceipt, OrderSpec, Quote};
use crate::portfolio::{AssetClass, Fundamentals, Portfolio, Position};
use crate::strategy::TradeAction;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Configuration for the REST gateway
#[derive(Debug, Clone)]
pub struct RestConfig {
    /// Brokerage API base URL
    pub base_url: String,
    /// Account to query and trade
    pub account_id: String,
    /// Environment variable holding the bearer token
    pub api_key_env: String,
    /// Request timeout
    pub timeout: Duration,
}

/// Client for a brokerage REST API
#[derive(Debug)]
pub struct RestGateway {
    config: RestConfig,
    token: String,
    client: Client,
}

impl RestGateway {
    /// Create a new client, reading the API token from the configured
    /// environment variable
    pub fn new(config: RestConfig) -> Result<Self, GatewayError> {
        let token = std::env::var(&config.api_key_env)
            .map_err(|_| GatewayError::MissingToken(config.api_key_env.clone()))?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Ok(Self {
            config,
            token,
            client,
        })
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, GatewayError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(GatewayError::Api { status, body })
    }
}

#[async_trait]
impl BrokerGateway for RestGateway {
    async fn get_portfolio(&self) -> Result<Portfolio, GatewayError> {
        let url = format!(
            "{}/v1/accounts/{}",
            self.config.base_url, self.config.account_id
        );

        tracing::debug!(url = %url, "Fetching account snapshot");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[("fields", "positions")])
            .send()
            .await?;
        let account: AccountEnvelope = Self::check(response).await?.json().await?;

        let positions = account
            .securities_account
            .positions
            .into_iter()
            .map(WirePosition::into_position)
            .collect();

        Ok(Portfolio::new(
            self.config.account_id.clone(),
            positions,
            account.securities_account.current_balances.liquidation_value,
            account.securities_account.current_balances.cash_balance,
        ))
    }

    async fn get_quotes(
        &self,
        symbols: &[String],
    ) -> Result<HashMap<String, Quote>, GatewayError> {
        if symbols.is_empty() {
            return Ok(HashMap::new());
        }

        let url = format!("{}/v1/quotes", self.config.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[("symbols", symbols.join(","))])
            .send()
            .await?;
        let body: HashMap<String, WireQuote> = Self::check(response).await?.json().await?;

        let as_of = Utc::now();
        Ok(body
            .into_iter()
            .map(|(symbol, wire)| {
                let quote = Quote {
                    symbol: symbol.clone(),
                    last_price: wire.quote.last_price,
                    as_of,
                };
                (symbol, quote)
            })
            .collect())
    }

    async fn place_order(
        &self,
        order: &OrderSpec,
        account_id: &str,
        dry_run: bool,
    ) -> Result<OrderReceipt, GatewayError> {
        if dry_run {
            tracing::info!(
                symbol = %order.symbol,
                action = %order.action,
                quantity = %order.quantity,
                "Dry run, order not submitted"
            );
            return Ok(OrderReceipt { order_id: None });
        }

        let url = format!("{}/v1/accounts/{}/orders", self.config.base_url, account_id);
        let instruction = match order.action {
            TradeAction::Buy => "BUY",
            TradeAction::Sell => "SELL",
        };
        let body = serde_json::json!({
            "orderType": "MARKET",
            "session": "NORMAL",
            "duration": "DAY",
            "orderLegCollection": [{
                "instruction": instruction,
                "quantity": order.quantity,
                "instrument": { "symbol": order.symbol, "assetType": "EQUITY" },
            }],
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        let response = Self::check(response).await?;

        // Order id arrives in the Location header of the 201 response
        let order_id = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|loc| loc.rsplit('/').next())
            .map(str::to_string);

        Ok(OrderReceipt { order_id })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountEnvelope {
    securities_account: WireAccount,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireAccount {
    current_balances: WireBalances,
    #[serde(default)]
    positions: Vec<WirePosition>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireBalances {
    liquidation_value: Decimal,
    cash_balance: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePosition {
    instrument: WireInstrument,
    #[serde(default)]
    long_quantity: Decimal,
    #[serde(default)]
    short_quantity: Decimal,
    average_price: Decimal,
    market_value: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireInstrument {
    symbol: String,
    #[serde(default)]
    asset_type: String,
}

#[derive(Debug, Deserialize)]
struct WireQuote {
    quote: WireQuoteBody,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireQuoteBody {
    last_price: Decimal,
}

impl WirePosition {
    fn into_position(self) -> Position {
        let quantity = self.long_quantity - self.short_quantity;
        let current_price = if quantity.is_zero() {
            Decimal::ZERO
        } else {
            self.market_value / quantity
        };
        Position {
            symbol: self.instrument.symbol,
            quantity,
            asset_class: asset_class_from_wire(&self.instrument.asset_type),
            cost_basis: self.average_price,
            market_value: self.market_value,
            current_price,
            fundamentals: Fundamentals::default(),
            weight: 0.0,
        }
    }
}

fn asset_class_from_wire(asset_type: &str) -> AssetClass {
    match asset_type {
        "EQUITY" => AssetClass::Equity,
        "ETF" => AssetClass::Etf,
        "MUTUAL_FUND" => AssetClass::MutualFund,
        "FIXED_INCOME" => AssetClass::Bond,
        "OPTION" => AssetClass::Option,
        _ => AssetClass::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_account_envelope_deserialize() {
        let json = r#"{
            "securitiesAccount": {
                "currentBalances": { "liquidationValue": 10000.0, "cashBalance": 1500.0 },
                "positions": [{
                    "instrument": { "symbol": "AAPL", "assetType": "EQUITY" },
                    "longQuantity": 10,
                    "averagePrice": 150.0,
                    "marketValue": 1700.0
                }]
            }
        }"#;
        let envelope: AccountEnvelope = serde_json::from_str(json).unwrap();
        let account = envelope.securities_account;
        assert_eq!(account.current_balances.cash_balance, dec!(1500));
        assert_eq!(account.positions.len(), 1);

        let position = account.positions.into_iter().next().unwrap().into_position();
        assert_eq!(position.symbol, "AAPL");
        assert_eq!(position.quantity, dec!(10));
        assert_eq!(position.current_price, dec!(170));
        assert_eq!(position.asset_class, AssetClass::Equity);
    }

    #[test]
    fn test_short_position_quantity_is_negative() {
        let json = r#"{
            "instrument": { "symbol": "TSLA", "assetType": "EQUITY" },
            "shortQuantity": 5,
            "averagePrice": 200.0,
            "marketValue": -1100.0
        }"#;
        let position: WirePosition = serde_json::from_str(json).unwrap();
        let position = position.into_position();
        assert_eq!(position.quantity, dec!(-5));
        assert_eq!(position.current_price, dec!(220));
    }

    #[test]
    fn test_quote_deserialize() {
        let json = r#"{ "AAPL": { "quote": { "lastPrice": 171.25 } } }"#;
        let body: HashMap<String, WireQuote> = serde_json::from_str(json).unwrap();
        assert_eq!(body["AAPL"].quote.last_price, dec!(171.25));
    }

    #[test]
    fn test_unknown_asset_type_maps_to_other() {
        assert_eq!(asset_class_from_wire("COLLECTIVE_INVESTMENT"), AssetClass::Other);
        assert_eq!(asset_class_from_wire("MUTUAL_FUND"), AssetClass::MutualFund);
    }

    #[test]
    fn test_missing_token_env() {
        let config = RestConfig {
            base_url: "https://api.broker.example".to_string(),
            account_id: "123".to_string(),
            api_key_env: "FOLIO_PILOT_TEST_MISSING_TOKEN".to_string(),
            timeout: Duration::from_secs(10),
        };
        let err = RestGateway::new(config).unwrap_err();
        assert!(matches!(err, GatewayError::MissingToken(_)));
    }
}
