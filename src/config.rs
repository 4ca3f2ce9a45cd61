use chrono::{DateTime, Utc};
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{RaffleError, Result};

/// Collar contract on Ethereum mainnet
pub const DEFAULT_COLLAR_CONTRACT: &str = "0x354634c4621cDfb7a25E6486cCA1E019777D841B";

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Upper bound on the number of winners drawn
    pub max_winners: u64,
    /// Base URL of the hound metadata API (`{endpoint}/{token_id}`)
    pub metadata_endpoint: String,
    /// Explorer requests per second (0 = unlimited)
    #[serde(default = "default_etherscan_rate_limit")]
    pub etherscan_rate_limit: u32,
    pub snapshot: SnapshotConfig,
    #[serde(default)]
    pub ineligible_traits: IneligibleTraitsConfig,
    /// Contract whose transactions are scanned
    #[serde(default = "default_collar_contract")]
    pub collar_contract: String,
    #[serde(default = "default_redeem_method")]
    pub redeem_method: String,
    /// JSON ABI to use instead of the embedded collar ABI
    #[serde(default)]
    pub abi_path: Option<PathBuf>,
    #[serde(default)]
    pub network: NetworkConfig,
    /// Explorer API base URL; derived from `network` when unset
    #[serde(default)]
    pub etherscan_base_url: Option<String>,
    /// Wallet metadata batches fetched concurrently
    #[serde(default = "default_metadata_concurrency")]
    pub metadata_concurrency: usize,
    /// Drop reverted transactions before decoding
    #[serde(default)]
    pub skip_reverted_transactions: bool,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Time window over which redeem transactions count
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotConfig {
    pub start: DateTime<Utc>,
    pub stop: DateTime<Utc>,
}

/// Disqualifying trait labels per category
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IneligibleTraitsConfig {
    #[serde(default)]
    pub forms: Vec<String>,
    #[serde(default)]
    pub faces: Vec<String>,
    #[serde(default)]
    pub mouths: Vec<String>,
    #[serde(default)]
    pub torsos: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    /// ethereum, arbitrum, polygon or bsc
    #[serde(default = "default_chain")]
    pub chain: String,
    /// mainnet or a testnet name (goerli, sepolia, ...)
    #[serde(default = "default_network_name")]
    pub name: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            chain: default_chain(),
            name: default_network_name(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
}

fn default_etherscan_rate_limit() -> u32 {
    5
}

fn default_collar_contract() -> String {
    DEFAULT_COLLAR_CONTRACT.to_string()
}

fn default_redeem_method() -> String {
    crate::raffle::DEFAULT_REDEEM_METHOD.to_string()
}

fn default_metadata_concurrency() -> usize {
    4
}

fn default_chain() -> String {
    "ethereum".to_string()
}

fn default_network_name() -> String {
    "mainnet".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from a specific file
    ///
    /// The format follows the file extension. Environment variables prefixed
    /// with `RAFFLER` override file values, `__` separating nested keys
    /// (`RAFFLER__MAX_WINNERS`, `RAFFLER__SNAPSHOT__START`).
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let builder = Self::defaults()?
            .add_source(File::from(path.as_ref()).required(true))
            .add_source(
                Environment::with_prefix("RAFFLER")
                    .separator("__")
                    .try_parsing(true),
            );

        Self::finish(builder)
    }

    /// Parse a YAML document, without environment overrides
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let builder = Self::defaults()?.add_source(File::from_str(yaml, FileFormat::Yaml));
        Self::finish(builder)
    }

    fn defaults() -> Result<ConfigBuilder<config::builder::DefaultState>> {
        Ok(Config::builder()
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .set_default("metadata_concurrency", 4)?)
    }

    fn finish(builder: ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make the run meaningless
    pub fn validate(&self) -> Result<()> {
        if self.snapshot.start >= self.snapshot.stop {
            return Err(RaffleError::InvalidConfig(format!(
                "snapshot.start ({}) must be before snapshot.stop ({})",
                self.snapshot.start, self.snapshot.stop
            )));
        }

        url::Url::parse(&self.metadata_endpoint).map_err(|e| {
            RaffleError::InvalidConfig(format!(
                "metadata_endpoint {:?} is not a valid URL: {}",
                self.metadata_endpoint, e
            ))
        })?;

        if let Some(base_url) = &self.etherscan_base_url {
            url::Url::parse(base_url).map_err(|e| {
                RaffleError::InvalidConfig(format!(
                    "etherscan_base_url {:?} is not a valid URL: {}",
                    base_url, e
                ))
            })?;
        }

        if self.metadata_concurrency == 0 {
            return Err(RaffleError::InvalidConfig(
                "metadata_concurrency must be at least 1".to_string(),
            ));
        }

        if self.redeem_method.trim().is_empty() {
            return Err(RaffleError::InvalidConfig(
                "redeem_method must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// `max_winners` as a collection size
    pub fn max_winners(&self) -> usize {
        usize::try_from(self.max_winners).unwrap_or(usize::MAX)
    }
}
