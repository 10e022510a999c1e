//! Report command implementation

use crate::config::Config;
use crate::{report, session};
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl ReportArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let gateway = super::build_gateway(config)?;
        let analysis = session::analyze(gateway.as_ref(), config).await?;
        let text = report::render(&analysis, &[]);

        match &self.output {
            Some(path) => {
                std::fs::write(path, &text)?;
                tracing::info!(path = %path.display(), "Report written");
            }
            None => print!("{text}"),
        }
        Ok(())
    }
}
