use thiserror::Error;

/// Main error type for the raffler
#[derive(Error, Debug)]
pub enum RaffleError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Contract interface errors
    #[error("Invalid contract interface description: {0}")]
    Abi(String),

    // Network errors
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Metadata fetch failed for asset {asset_id}: {reason}")]
    MetadataFetch { asset_id: u64, reason: String },

    #[error("Transaction source unavailable: {0}")]
    SourceUnavailable(String),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for RaffleError
pub type Result<T> = std::result::Result<T, RaffleError>;

/// Failures while turning one transaction's call data into asset identifiers.
///
/// All variants are transaction-local: the pipeline logs them and skips the
/// transaction. A selector that matches no known method is not an error and
/// is reported through [`crate::raffle::RedeemCall::NotRelevant`] instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Malformed call data: {0}")]
    MalformedCallData(String),

    #[error("Failed to decode arguments of {method}: {reason}")]
    ArgumentDecode { method: String, reason: String },

    #[error("Identifier #{index} does not fit in 64 bits: {value}")]
    IdentifierOverflow { index: usize, value: String },
}
