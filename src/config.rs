//! Configuration types for folio-pilot

use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration validation failure, fatal before any scoring runs
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("limit `{field}` out of range: {detail}")]
    LimitOutOfRange {
        field: &'static str,
        detail: String,
    },
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub strategy: StrategyConfig,
    #[serde(default)]
    pub limits: PolicyLimits,
    #[serde(default)]
    pub execution: ExecutionConfig,
    pub telemetry: TelemetryConfig,
}

/// Brokerage gateway configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    pub mode: GatewayMode,
    pub account_id: String,
    /// REST API base URL (rest mode)
    #[serde(default)]
    pub base_url: Option<String>,
    /// Environment variable holding the bearer token (rest mode)
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// JSON snapshot of portfolio + quotes (paper mode)
    #[serde(default)]
    pub portfolio_file: Option<PathBuf>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Gateway mode: simulated portfolio or live brokerage REST API
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GatewayMode {
    Paper,
    Rest,
}

fn default_api_key_env() -> String {
    "FOLIO_PILOT_API_KEY".to_string()
}
fn default_timeout_secs() -> u64 {
    10
}

/// Recommendation strategy selection
#[derive(Debug, Clone, Deserialize)]
pub struct StrategyConfig {
    #[serde(default)]
    pub kind: StrategyKind,

    /// Broad-market symbol bought when deploying excess cash
    #[serde(default = "default_market_proxy")]
    pub market_proxy_symbol: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    #[default]
    RiskAverse,
    DefinedRisk,
}

fn default_market_proxy() -> String {
    "VTI".to_string()
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            kind: StrategyKind::RiskAverse,
            market_proxy_symbol: default_market_proxy(),
        }
    }
}

/// Trading policy limits, enforced by the validator and scheduler
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyLimits {
    /// 1 (most conservative) to 10
    #[serde(default = "default_risk_tolerance")]
    pub risk_tolerance: u8,

    /// Maximum single-position weight, percent of account value
    #[serde(default = "default_max_position_size")]
    pub max_position_size_percent: f64,

    /// Maximum single-sector weight, percent of account value
    #[serde(default = "default_max_sector_exposure")]
    pub max_sector_exposure_percent: f64,

    /// Cash floor after any buy, percent of account value
    #[serde(default = "default_min_cash_reserve")]
    pub min_cash_reserve_percent: f64,

    /// Smallest order the validator will accept, in shares
    #[serde(default = "default_min_trade_quantity")]
    pub min_trade_quantity: Decimal,

    /// Largest order; bigger resolutions are clamped down
    #[serde(default = "default_max_trade_quantity")]
    pub max_trade_quantity: Decimal,

    /// A sale must leave at least this many shares or close the position
    #[serde(default = "default_min_position_size")]
    pub min_position_size: Decimal,

    #[serde(default = "default_max_trades_per_session")]
    pub max_trades_per_session: usize,

    #[serde(default)]
    pub enable_auto_trading: bool,

    #[serde(default = "default_true")]
    pub dry_run: bool,
}

fn default_risk_tolerance() -> u8 {
    5
}
fn default_max_position_size() -> f64 {
    10.0
}
fn default_max_sector_exposure() -> f64 {
    25.0
}
fn default_min_cash_reserve() -> f64 {
    5.0
}
fn default_min_trade_quantity() -> Decimal {
    Decimal::ONE
}
fn default_max_trade_quantity() -> Decimal {
    Decimal::from(10_000)
}
fn default_min_position_size() -> Decimal {
    Decimal::ONE
}
fn default_max_trades_per_session() -> usize {
    5
}
fn default_true() -> bool {
    true
}

impl Default for PolicyLimits {
    fn default() -> Self {
        Self {
            risk_tolerance: 5,
            max_position_size_percent: 10.0,
            max_sector_exposure_percent: 25.0,
            min_cash_reserve_percent: 5.0,
            min_trade_quantity: Decimal::ONE,
            max_trade_quantity: Decimal::from(10_000),
            min_position_size: Decimal::ONE,
            max_trades_per_session: 5,
            enable_auto_trading: false,
            dry_run: true,
        }
    }
}

impl PolicyLimits {
    /// Range-check every numeric limit. The rest of the crate trusts
    /// limits unvalidated, so this must run before any scoring.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=10).contains(&self.risk_tolerance) {
            return Err(ConfigError::LimitOutOfRange {
                field: "risk_tolerance",
                detail: format!("{} not in 1..=10", self.risk_tolerance),
            });
        }
        if !(self.max_position_size_percent > 0.0 && self.max_position_size_percent <= 100.0) {
            return Err(ConfigError::LimitOutOfRange {
                field: "max_position_size_percent",
                detail: format!("{} not in (0, 100]", self.max_position_size_percent),
            });
        }
        if !(self.max_sector_exposure_percent > 0.0 && self.max_sector_exposure_percent <= 100.0) {
            return Err(ConfigError::LimitOutOfRange {
                field: "max_sector_exposure_percent",
                detail: format!("{} not in (0, 100]", self.max_sector_exposure_percent),
            });
        }
        if !(0.0..100.0).contains(&self.min_cash_reserve_percent) {
            return Err(ConfigError::LimitOutOfRange {
                field: "min_cash_reserve_percent",
                detail: format!("{} not in [0, 100)", self.min_cash_reserve_percent),
            });
        }
        if self.min_trade_quantity <= Decimal::ZERO {
            return Err(ConfigError::LimitOutOfRange {
                field: "min_trade_quantity",
                detail: format!("{} must be positive", self.min_trade_quantity),
            });
        }
        if self.max_trade_quantity < self.min_trade_quantity {
            return Err(ConfigError::LimitOutOfRange {
                field: "max_trade_quantity",
                detail: format!(
                    "{} below min_trade_quantity {}",
                    self.max_trade_quantity, self.min_trade_quantity
                ),
            });
        }
        if self.min_position_size < Decimal::ZERO {
            return Err(ConfigError::LimitOutOfRange {
                field: "min_position_size",
                detail: format!("{} must not be negative", self.min_position_size),
            });
        }
        if self.max_trades_per_session == 0 {
            return Err(ConfigError::LimitOutOfRange {
                field: "max_trades_per_session",
                detail: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Execution scheduler configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionConfig {
    /// Delay between successive order submissions, milliseconds
    #[serde(default = "default_cooldown_ms")]
    pub trade_cooldown_ms: u64,
}

fn default_cooldown_ms() -> u64 {
    1_000
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            trade_cooldown_ms: 1_000,
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub metrics_port: Option<u16>,
}

impl Config {
    /// Load configuration from a TOML file and validate the limits
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.limits.validate()?;
        Ok(config)
    }
}
