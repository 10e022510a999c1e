//! Analyze command implementation

use crate::config::Config;
use crate::{report, session};
use clap::Args;

#[derive(Args, Debug)]
pub struct AnalyzeArgs {}

impl AnalyzeArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let gateway = super::build_gateway(config)?;
        let analysis = session::analyze(gateway.as_ref(), config).await?;
        print!("{}", report::render(&analysis, &[]));
        Ok(())
    }
}
