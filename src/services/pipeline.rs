//! Burn-and-redeem raffle pipeline
//!
//! transactions → decode → group by sender → metadata + trait filter →
//! subtract ineligible wallets → draw winners.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::report::RaffleReport;
use crate::adapters::{transactions_in_window, MetadataSource, TransactionSource};
use crate::config::AppConfig;
use crate::domain::RawTransaction;
use crate::error::Result;
use crate::raffle::{
    draw, draw_winners, resolve_eligibility, CallDataDecoder, IneligibleTraits, RedeemCall,
    WalletRecords,
};

/// Run parameters taken from configuration and the command line
#[derive(Debug, Clone)]
pub struct RaffleSettings {
    pub contract: String,
    pub snapshot_start: DateTime<Utc>,
    pub snapshot_stop: DateTime<Utc>,
    pub max_winners: usize,
    pub metadata_concurrency: usize,
    pub skip_reverted_transactions: bool,
    /// Fixed RNG seed for a reproducible draw
    pub seed: Option<u64>,
}

impl RaffleSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            contract: config.collar_contract.clone(),
            snapshot_start: config.snapshot.start,
            snapshot_stop: config.snapshot.stop,
            max_winners: config.max_winners(),
            metadata_concurrency: config.metadata_concurrency,
            skip_reverted_transactions: config.skip_reverted_transactions,
            seed: None,
        }
    }
}

/// Redeem calls found while scanning the snapshot window
#[derive(Debug, Clone, Default)]
pub struct ScanSummary {
    pub records: WalletRecords,
    pub scanned: usize,
    pub redeem_calls: usize,
    pub reverted: usize,
    pub undecodable: usize,
}

pub struct RafflePipeline {
    decoder: CallDataDecoder,
    traits: IneligibleTraits,
    transactions: Arc<dyn TransactionSource>,
    metadata: Arc<dyn MetadataSource>,
    settings: RaffleSettings,
}

impl RafflePipeline {
    pub fn new(
        decoder: CallDataDecoder,
        traits: IneligibleTraits,
        transactions: Arc<dyn TransactionSource>,
        metadata: Arc<dyn MetadataSource>,
        settings: RaffleSettings,
    ) -> Self {
        Self {
            decoder,
            traits,
            transactions,
            metadata,
            settings,
        }
    }

    /// Decode every transaction and group redeemed identifiers by sender
    ///
    /// Undecodable transactions are logged and skipped. Reverted transactions
    /// are decoded like any other unless `skip_reverted_transactions` is set;
    /// either way they are counted in `reverted`.
    pub fn scan(&self, transactions: &[RawTransaction]) -> ScanSummary {
        let mut summary = ScanSummary {
            scanned: transactions.len(),
            ..Default::default()
        };

        for (i, tx) in transactions.iter().enumerate() {
            if tx.is_error {
                summary.reverted += 1;
                if self.settings.skip_reverted_transactions {
                    debug!("Skipping reverted txn #{} ({})", i, tx.hash);
                    continue;
                }
            }

            match self.decoder.decode_hex(&tx.input) {
                Ok(RedeemCall::Redeem(asset_ids)) => {
                    summary.redeem_calls += 1;
                    summary.records.record(&tx.from, &asset_ids);
                }
                Ok(RedeemCall::NotRelevant(reason)) => {
                    debug!("Ignoring txn #{} from {}: {}", i, tx.from, reason);
                }
                Err(e) => {
                    warn!("Error decoding txn #{} (from {}): {}", i, tx.from, e);
                    summary.undecodable += 1;
                }
            }
        }

        summary
    }

    /// Run the whole drawing. Only transaction source failures are fatal.
    pub async fn run(&self) -> Result<RaffleReport> {
        let settings = &self.settings;

        let transactions = transactions_in_window(
            self.transactions.as_ref(),
            &settings.contract,
            settings.snapshot_start,
            settings.snapshot_stop,
        )
        .await?;
        info!("Found {} Txns", transactions.len());

        let summary = self.scan(&transactions);
        info!(
            "Found {} redeem calls from {} wallets ({} collars)",
            summary.redeem_calls,
            summary.records.len(),
            summary.records.asset_count()
        );

        let outcome = resolve_eligibility(
            &summary.records,
            self.metadata.as_ref(),
            &self.traits,
            settings.metadata_concurrency,
        )
        .await;

        let pool = outcome.raffle_pool();
        let winners = match settings.seed {
            Some(seed) => draw(&pool, settings.max_winners, &mut StdRng::seed_from_u64(seed)),
            None => draw_winners(&pool, settings.max_winners),
        };

        Ok(RaffleReport {
            snapshot_start: settings.snapshot_start,
            snapshot_stop: settings.snapshot_stop,
            transactions_scanned: summary.scanned,
            redeem_transactions: summary.redeem_calls,
            reverted_transactions: summary.reverted,
            skipped_transactions: summary.undecodable,
            total_wallets: outcome.total_wallets(),
            ineligible_wallets: outcome.ineligible.iter().cloned().collect(),
            eligible_wallets: outcome.eligible.iter().cloned().collect(),
            failed_wallets: outcome.failed.iter().cloned().collect(),
            raffle_pool_size: pool.len(),
            winners,
        })
    }
}
