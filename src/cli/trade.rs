//! Trade command implementation

use crate::config::Config;
use crate::{report, session};
use clap::Args;

#[derive(Args, Debug)]
pub struct TradeArgs {
    /// Force dry-run regardless of configuration
    #[arg(long)]
    pub dry_run: bool,
}

impl TradeArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let mut config = config.clone();
        if self.dry_run {
            config.limits.dry_run = true;
        }
        if !config.limits.enable_auto_trading {
            tracing::warn!("Auto-trading is disabled; no orders will be placed");
        }

        let gateway = super::build_gateway(&config)?;
        let outcome = session::run_cycle(gateway.as_ref(), &config).await?;
        print!(
            "{}",
            report::render(&outcome.analysis, &outcome.executed)
        );
        Ok(())
    }
}
