use collar_raffler::adapters::{Chain, EtherscanClient, HoundMetadataClient};
use collar_raffler::config::{AppConfig, LoggingConfig};
use collar_raffler::error::{RaffleError, Result};
use collar_raffler::raffle::{CallDataDecoder, ContractInterface, IneligibleTraits};
use collar_raffler::services::{RafflePipeline, RaffleSettings};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},collar_raffler=debug", config.level)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if let Err(e) = result {
        eprintln!("Warning: logging already initialised ({})", e);
    }
}

/// Wire the configured sources, decoder and trait filter into a pipeline
pub fn build_pipeline(
    config: &AppConfig,
    etherscan_api_key: &str,
    seed: Option<u64>,
) -> Result<RafflePipeline> {
    let interface = match &config.abi_path {
        Some(path) => {
            info!("Loading contract ABI from {}", path.display());
            ContractInterface::from_file(path)?
        }
        None => ContractInterface::mutant_hound_collars()?,
    };
    let decoder = CallDataDecoder::new(interface, config.redeem_method.clone());

    if etherscan_api_key.is_empty() {
        warn!("ETHERSCAN_API_KEY is not set; explorer requests may be rejected");
    }

    let etherscan = match &config.etherscan_base_url {
        Some(base_url) => {
            EtherscanClient::new(base_url, etherscan_api_key, config.etherscan_rate_limit)?
        }
        None => {
            let chain: Chain = config.network.chain.parse()?;
            EtherscanClient::for_network(
                chain,
                &config.network.name,
                etherscan_api_key,
                config.etherscan_rate_limit,
            )?
        }
    };
    info!("Using explorer API at {}", etherscan.base_url());

    let metadata = HoundMetadataClient::new(&config.metadata_endpoint)?;
    let traits = IneligibleTraits::from(&config.ineligible_traits);

    let mut settings = RaffleSettings::from_config(config);
    settings.seed = seed;

    Ok(RafflePipeline::new(
        decoder,
        traits,
        Arc::new(etherscan),
        Arc::new(metadata),
        settings,
    ))
}

pub async fn shutdown_signal() -> RaffleError {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    RaffleError::Other(anyhow::anyhow!("interrupted before the drawing completed"))
}
