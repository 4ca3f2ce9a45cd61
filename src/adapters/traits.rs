use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::domain::{BlockBoundary, HoundMetadata, RawTransaction};
use crate::error::{RaffleError, Result};

/// Historical transaction listing (block explorer)
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Block number closest to `timestamp` on the given side
    async fn resolve_block_number(
        &self,
        timestamp: DateTime<Utc>,
        boundary: BlockBoundary,
    ) -> Result<u64>;

    /// Transactions involving `address` between two blocks, inclusive.
    /// An empty range is an empty vec, not an error.
    async fn list_transactions(
        &self,
        address: &str,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<RawTransaction>>;
}

/// Transactions sent to `address` inside the snapshot window
///
/// Both ends of the window snap to the block before the timestamp. Any
/// failure here is reported as [`RaffleError::SourceUnavailable`].
pub async fn transactions_in_window(
    source: &dyn TransactionSource,
    address: &str,
    start: DateTime<Utc>,
    stop: DateTime<Utc>,
) -> Result<Vec<RawTransaction>> {
    let start_block = source
        .resolve_block_number(start, BlockBoundary::Before)
        .await
        .map_err(|e| unavailable("resolve starting block number", e))?;

    let stop_block = source
        .resolve_block_number(stop, BlockBoundary::Before)
        .await
        .map_err(|e| unavailable("resolve stopping block number", e))?;

    info!(
        "Querying for transactions between blocks {} and {}",
        start_block, stop_block
    );

    source
        .list_transactions(address, start_block, stop_block)
        .await
        .map_err(|e| unavailable(&format!("list transactions for {}", address), e))
}

fn unavailable(action: &str, err: RaffleError) -> RaffleError {
    match err {
        RaffleError::SourceUnavailable(reason) => {
            RaffleError::SourceUnavailable(format!("unable to {}: {}", action, reason))
        }
        other => RaffleError::SourceUnavailable(format!("unable to {}: {}", action, other)),
    }
}

/// Hound metadata lookup
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn fetch(&self, asset_id: u64) -> Result<HoundMetadata>;

    /// Metadata for every identifier, in the same order. Fails as a whole
    /// when any single lookup fails.
    async fn fetch_batch(&self, asset_ids: &[u64]) -> Result<Vec<HoundMetadata>> {
        let mut batch = Vec::with_capacity(asset_ids.len());
        for asset_id in asset_ids {
            batch.push(self.fetch(*asset_id).await?);
        }
        Ok(batch)
    }
}
