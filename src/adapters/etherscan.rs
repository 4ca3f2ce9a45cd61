//! Etherscan-compatible block explorer client
//!
//! Resolves block numbers by timestamp and lists the normal transactions of
//! an address. Every request passes through the configured rate limiter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::rate_limit::RateLimiter;
use super::traits::TransactionSource;
use crate::domain::{BlockBoundary, RawTransaction};
use crate::error::{RaffleError, Result};

const NO_TRANSACTIONS_FOUND: &str = "No transactions found";
/// Most rows the explorer returns for one `txlist` query
pub const TXLIST_MAX_ROWS: usize = 10_000;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// Chains & base URLs
// ============================================================================

/// Chains with an Etherscan-family explorer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chain {
    Ethereum,
    Arbitrum,
    Polygon,
    Bsc,
}

impl Chain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ethereum => "ethereum",
            Self::Arbitrum => "arbitrum",
            Self::Polygon => "polygon",
            Self::Bsc => "bsc",
        }
    }

    fn explorer_domain(&self) -> &'static str {
        match self {
            Self::Ethereum => "etherscan.io",
            Self::Arbitrum => "arbiscan.io",
            Self::Polygon => "polygonscan.com",
            Self::Bsc => "bscscan.com",
        }
    }

    /// Explorer API base URL for a network of this chain
    ///
    /// Mainnet uses the `api` subdomain, any other network `api-{network}`
    /// (`api-goerli.etherscan.io`, `api-testnet.bscscan.com`).
    pub fn base_url(&self, network: &str) -> String {
        let network = network.trim().to_ascii_lowercase();
        let subdomain = match network.as_str() {
            "" | "mainnet" | "ethereum" => "api".to_string(),
            other => format!("api-{}", other),
        };
        format!("https://{}.{}/api", subdomain, self.explorer_domain())
    }
}

impl std::fmt::Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Chain {
    type Err = RaffleError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ethereum" | "eth" => Ok(Self::Ethereum),
            "arbitrum" => Ok(Self::Arbitrum),
            "polygon" | "matic" => Ok(Self::Polygon),
            "bsc" => Ok(Self::Bsc),
            other => Err(RaffleError::InvalidConfig(format!(
                "unsupported chain '{}'; expected ethereum|arbitrum|polygon|bsc",
                other
            ))),
        }
    }
}

// ============================================================================
// Wire types
// ============================================================================

/// Response envelope shared by every explorer endpoint
#[derive(Debug, Deserialize)]
struct Envelope {
    status: String,
    #[serde(default)]
    message: String,
    result: Value,
}

impl Envelope {
    /// Typed `result`, `None` for the "no transactions" outcome
    fn into_result<T: DeserializeOwned>(self) -> Result<Option<T>> {
        if self.status == "1" {
            return serde_json::from_value(self.result).map(Some).map_err(|e| {
                RaffleError::SourceUnavailable(format!("unexpected explorer result: {}", e))
            });
        }

        if self.message.contains(NO_TRANSACTIONS_FOUND) {
            return Ok(None);
        }

        let detail = match &self.result {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        Err(RaffleError::SourceUnavailable(format!(
            "{} ({})",
            self.message, detail
        )))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExplorerTx {
    block_number: String,
    hash: String,
    from: String,
    #[serde(default)]
    to: String,
    #[serde(default)]
    input: String,
    #[serde(default)]
    is_error: String,
}

impl TryFrom<ExplorerTx> for RawTransaction {
    type Error = RaffleError;

    fn try_from(tx: ExplorerTx) -> Result<Self> {
        let block_number = tx.block_number.parse().map_err(|_| {
            RaffleError::SourceUnavailable(format!(
                "invalid block number {:?} in transaction {}",
                tx.block_number, tx.hash
            ))
        })?;

        Ok(RawTransaction {
            hash: tx.hash,
            block_number,
            from: tx.from,
            to: tx.to,
            input: tx.input,
            is_error: tx.is_error == "1",
        })
    }
}

// ============================================================================
// Client
// ============================================================================

pub struct EtherscanClient {
    http: Client,
    base_url: String,
    api_key: String,
    limiter: Option<RateLimiter>,
    page_size: usize,
}

impl EtherscanClient {
    pub fn new(base_url: &str, api_key: impl Into<String>, requests_per_second: u32) -> Result<Self> {
        let http = Client::builder()
            .user_agent("collar-raffler/0.1")
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches(['/', '?']).to_string(),
            api_key: api_key.into(),
            limiter: RateLimiter::per_second(requests_per_second),
            page_size: TXLIST_MAX_ROWS,
        })
    }

    /// Rows requested per `txlist` page, capped at [`TXLIST_MAX_ROWS`]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.clamp(1, TXLIST_MAX_ROWS);
        self
    }

    /// Client for the default explorer of `chain`/`network`
    pub fn for_network(
        chain: Chain,
        network: &str,
        api_key: impl Into<String>,
        requests_per_second: u32,
    ) -> Result<Self> {
        Self::new(&chain.base_url(network), api_key, requests_per_second)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn call<T: DeserializeOwned>(&self, params: &[(&str, String)]) -> Result<Option<T>> {
        if let Some(limiter) = &self.limiter {
            limiter.acquire().await;
        }

        let response = self
            .http
            .get(&self.base_url)
            .query(params)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| RaffleError::SourceUnavailable(format!("explorer request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(RaffleError::SourceUnavailable(format!(
                "explorer returned HTTP {}",
                response.status()
            )));
        }

        let envelope: Envelope = response.json().await.map_err(|e| {
            RaffleError::SourceUnavailable(format!("failed to parse explorer response: {}", e))
        })?;

        envelope.into_result()
    }

    async fn txlist_page(
        &self,
        address: &str,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<RawTransaction>> {
        let rows: Option<Vec<ExplorerTx>> = self
            .call(&[
                ("module", "account".to_string()),
                ("action", "txlist".to_string()),
                ("address", address.to_string()),
                ("startblock", from_block.to_string()),
                ("endblock", to_block.to_string()),
                ("page", "1".to_string()),
                ("offset", self.page_size.to_string()),
                ("sort", "asc".to_string()),
            ])
            .await?;

        let Some(rows) = rows else {
            debug!("No transactions for {} in blocks {}..={}", address, from_block, to_block);
            return Ok(Vec::new());
        };

        rows.into_iter().map(RawTransaction::try_from).collect()
    }
}

#[async_trait]
impl TransactionSource for EtherscanClient {
    #[instrument(skip(self))]
    async fn resolve_block_number(
        &self,
        timestamp: DateTime<Utc>,
        boundary: BlockBoundary,
    ) -> Result<u64> {
        let block: Option<String> = self
            .call(&[
                ("module", "block".to_string()),
                ("action", "getblocknobytime".to_string()),
                ("timestamp", timestamp.timestamp().to_string()),
                ("closest", boundary.as_str().to_string()),
            ])
            .await?;

        let block = block.ok_or_else(|| {
            RaffleError::SourceUnavailable(format!("no block found for {}", timestamp))
        })?;

        block.trim().parse().map_err(|_| {
            RaffleError::SourceUnavailable(format!("invalid block number {:?}", block))
        })
    }

    #[instrument(skip(self))]
    async fn list_transactions(
        &self,
        address: &str,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<RawTransaction>> {
        let mut transactions = Vec::new();
        let mut start = from_block;

        // A full page may end partway through a block: keep the blocks before
        // it and query again from that block.
        loop {
            let page = self.txlist_page(address, start, to_block).await?;
            if page.len() < self.page_size {
                transactions.extend(page);
                break;
            }

            let last_block = page.last().map_or(start, |tx| tx.block_number);
            if last_block <= start {
                warn!(
                    "Block {} alone holds more than {} transactions for {}; list is truncated",
                    start, self.page_size, address
                );
                transactions.extend(page);
                break;
            }

            debug!("Full txlist page for {}, continuing from block {}", address, last_block);
            transactions.extend(page.into_iter().filter(|tx| tx.block_number < last_block));
            start = last_block;
        }

        Ok(transactions)
    }
}

// ============================================================================
// Tests
// ============================================================================
