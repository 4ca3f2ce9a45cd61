//! Wallet aggregation
//!
//! Groups redeemed collar identifiers by sender, looks up the hounds'
//! metadata one wallet at a time and sorts wallets into eligible, ineligible
//! and failed sets. One ineligible hound disqualifies its wallet.

use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

use super::eligibility::IneligibleTraits;
use crate::adapters::MetadataSource;
use crate::domain::HoundMetadata;
use crate::error::{RaffleError, Result};

/// Sender → redeemed identifiers, built while scanning transactions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletRecords {
    wallets: BTreeMap<String, Vec<u64>>,
}

impl WalletRecords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append identifiers redeemed by `sender`. Empty lists are ignored so
    /// every recorded wallet has at least one asset.
    pub fn record(&mut self, sender: &str, asset_ids: &[u64]) {
        if asset_ids.is_empty() {
            return;
        }
        self.wallets
            .entry(sender.to_string())
            .or_default()
            .extend_from_slice(asset_ids);
    }

    pub fn assets(&self, wallet: &str) -> Option<&[u64]> {
        self.wallets.get(wallet).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<u64>)> {
        self.wallets.iter()
    }

    /// Total identifiers across all wallets
    pub fn asset_count(&self) -> usize {
        self.wallets.values().map(Vec::len).sum()
    }

    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }
}

/// Result of resolving every recorded wallet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EligibilityOutcome {
    /// Wallets with only eligible hounds (already net of `ineligible`)
    pub eligible: BTreeSet<String>,
    /// Wallets holding at least one disqualified hound
    pub ineligible: BTreeSet<String>,
    /// Wallets whose metadata could not be fetched
    pub failed: BTreeSet<String>,
}

impl EligibilityOutcome {
    /// Wallets entered into the drawing
    pub fn raffle_pool(&self) -> Vec<String> {
        self.eligible.iter().cloned().collect()
    }

    /// Wallets that reached a verdict either way
    pub fn total_wallets(&self) -> usize {
        self.eligible.len() + self.ineligible.len()
    }
}

/// Resolve eligibility for every recorded wallet
///
/// Up to `concurrency` wallet batches are fetched at once. A failed batch only
/// moves its own wallet into `failed`; the remaining wallets are still
/// resolved. Verdicts are merged here, in one place, as fetches complete.
pub async fn resolve_eligibility(
    records: &WalletRecords,
    metadata: &dyn MetadataSource,
    traits: &IneligibleTraits,
    concurrency: usize,
) -> EligibilityOutcome {
    let mut outcome = EligibilityOutcome::default();

    let mut fetches = stream::iter(records.iter())
        .map(|(wallet, asset_ids)| async move {
            let batch = fetch_wallet(metadata, asset_ids).await;
            (wallet, asset_ids, batch)
        })
        .buffer_unordered(concurrency.max(1));

    while let Some((wallet, asset_ids, batch)) = fetches.next().await {
        let batch = match batch {
            Ok(batch) => batch,
            Err(e) => {
                warn!("Error fetching metadata for {}: {}", wallet, e);
                outcome.failed.insert(wallet.clone());
                continue;
            }
        };

        for (asset_id, hound) in asset_ids.iter().zip(batch.iter()) {
            if traits.is_eligible(hound) {
                outcome.eligible.insert(wallet.clone());
            } else {
                debug!(
                    "Hound {} of {} is ineligible ({:?})",
                    asset_id,
                    wallet,
                    traits.disqualifying_traits(hound)
                );
                outcome.ineligible.insert(wallet.clone());
            }
        }
    }

    for wallet in &outcome.ineligible {
        outcome.eligible.remove(wallet);
    }

    outcome
}

async fn fetch_wallet(
    metadata: &dyn MetadataSource,
    asset_ids: &[u64],
) -> Result<Vec<HoundMetadata>> {
    let batch = metadata.fetch_batch(asset_ids).await?;
    if batch.len() != asset_ids.len() {
        return Err(RaffleError::MetadataFetch {
            asset_id: asset_ids.get(batch.len()).copied().unwrap_or_default(),
            reason: format!(
                "expected {} metadata entries, got {}",
                asset_ids.len(),
                batch.len()
            ),
        });
    }
    Ok(batch)
}
