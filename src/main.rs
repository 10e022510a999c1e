use clap::Parser;
use folio_pilot::cli::{Cli, Commands};
use folio_pilot::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
        eprintln!("Using default configuration");
        toml::from_str(include_str!("../config.toml.example")).expect("Invalid default config")
    });
    config.limits.validate()?;

    // Initialize telemetry
    let _guard = folio_pilot::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Analyze(args) => {
            tracing::info!("Starting portfolio analysis");
            args.execute(&config).await?;
        }
        Commands::Trade(args) => {
            tracing::info!("Starting trading cycle");
            args.execute(&config).await?;
        }
        Commands::Report(args) => {
            args.execute(&config).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!("  Gateway: {:?} (account {})", config.gateway.mode, config.gateway.account_id);
            println!("  Strategy: {:?} (proxy {})", config.strategy.kind, config.strategy.market_proxy_symbol);
            println!(
                "  Limits: tolerance={}, max_position={}%, max_sector={}%",
                config.limits.risk_tolerance,
                config.limits.max_position_size_percent,
                config.limits.max_sector_exposure_percent
            );
            println!(
                "  Trading: auto={}, dry_run={}, max_trades={}",
                config.limits.enable_auto_trading,
                config.limits.dry_run,
                config.limits.max_trades_per_session
            );
        }
    }

    Ok(())
}
