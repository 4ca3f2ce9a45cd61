use clap::Parser;
use collar_raffler::cli::Cli;
use collar_raffler::config::AppConfig;
use collar_raffler::error::Result;
use collar_raffler::services::OutputMode;
use tracing::info;

mod main_runtime;

use main_runtime::{build_pipeline, init_logging, shutdown_signal};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_from(&cli.config)?;
    cli.apply_overrides(&mut config);
    init_logging(&config.logging);

    info!("Starting raffler with config: {:?}", config);

    let pipeline = build_pipeline(
        &config,
        cli.etherscan_api_key.as_deref().unwrap_or_default(),
        cli.seed,
    )?;

    let report = tokio::select! {
        result = pipeline.run() => result?,
        interrupted = shutdown_signal() => return Err(interrupted),
    };

    report.log_summary();
    println!("{}", report.render(OutputMode::from_json_flag(cli.json))?);

    Ok(())
}
