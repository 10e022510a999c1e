//! CLI interface for folio-pilot
//!
//! Provides subcommands for:
//! - `analyze`: assess risk and print recommendations (no trading)
//! - `trade`: run a full analysis + execution cycle
//! - `report`: write the plain-text report to stdout or a file
//! - `config`: show effective configuration

mod analyze;
mod report;
mod trade;

pub use analyze::AnalyzeArgs;
pub use report::ReportArgs;
pub use trade::TradeArgs;

use crate::config::{Config, GatewayMode};
use crate::gateway::{BrokerGateway, PaperGateway, RestConfig, RestGateway};
use clap::{Parser, Subcommand};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "folio-pilot")]
#[command(about = "Risk-averse portfolio advisor and auto-trading bot")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Assess risk and print recommendations without trading
    Analyze(AnalyzeArgs),
    /// Run a full analysis and execution cycle
    Trade(TradeArgs),
    /// Write the plain-text report
    Report(ReportArgs),
    /// Show effective configuration
    Config,
}

/// Construct the configured gateway implementation
pub fn build_gateway(config: &Config) -> anyhow::Result<Box<dyn BrokerGateway>> {
    match config.gateway.mode {
        GatewayMode::Paper => {
            let path = config.gateway.portfolio_file.as_ref().ok_or_else(|| {
                anyhow::anyhow!("paper mode requires gateway.portfolio_file")
            })?;
            Ok(Box::new(PaperGateway::from_file(path)?))
        }
        GatewayMode::Rest => {
            let base_url = config.gateway.base_url.clone().ok_or_else(|| {
                anyhow::anyhow!("rest mode requires gateway.base_url")
            })?;
            let gateway = RestGateway::new(RestConfig {
                base_url,
                account_id: config.gateway.account_id.clone(),
                api_key_env: config.gateway.api_key_env.clone(),
                timeout: Duration::from_secs(config.gateway.timeout_secs),
            })?;
            Ok(Box::new(gateway))
        }
    }
}
