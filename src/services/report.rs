//! Raffle report rendering
//!
//! Supports two modes: human-readable log lines plus a winners table
//! (default) and the whole report as JSON (--json).

use chrono::{DateTime, Utc};
use serde::Serialize;
use tabled::{Table, Tabled};
use tracing::info;

use crate::error::Result;

/// Output mode for the final report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Table,
    Json,
}

impl OutputMode {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputMode::Json
        } else {
            OutputMode::Table
        }
    }
}

/// Everything a drawing produced, in the order it was decided
#[derive(Debug, Clone, Serialize)]
pub struct RaffleReport {
    pub snapshot_start: DateTime<Utc>,
    pub snapshot_stop: DateTime<Utc>,
    pub transactions_scanned: usize,
    pub redeem_transactions: usize,
    /// Reverted transactions left out of the scan
    pub reverted_transactions: usize,
    /// Transactions whose call data could not be decoded
    pub skipped_transactions: usize,
    pub total_wallets: usize,
    pub ineligible_wallets: Vec<String>,
    pub eligible_wallets: Vec<String>,
    /// Wallets left out because their metadata could not be fetched
    pub failed_wallets: Vec<String>,
    pub raffle_pool_size: usize,
    /// Winners in ranked order
    pub winners: Vec<String>,
}

#[derive(Tabled)]
struct WinnerRow {
    #[tabled(rename = "Rank")]
    rank: usize,
    #[tabled(rename = "Wallet")]
    wallet: String,
}

impl RaffleReport {
    /// Emit the summary through the log
    pub fn log_summary(&self) {
        info!(
            "Scanned {} transactions ({} redeem calls, {} reverted, {} undecodable)",
            self.transactions_scanned,
            self.redeem_transactions,
            self.reverted_transactions,
            self.skipped_transactions
        );
        info!("Found Total Wallets {}", self.total_wallets);
        info!(
            "Found {} Ineligible Wallets: {:?}",
            self.ineligible_wallets.len(),
            self.ineligible_wallets
        );
        info!(
            "Found {} Eligible Wallets: {:?}",
            self.eligible_wallets.len(),
            self.eligible_wallets
        );
        if !self.failed_wallets.is_empty() {
            info!(
                "Skipped {} wallets without metadata: {:?}",
                self.failed_wallets.len(),
                self.failed_wallets
            );
        }
        info!("Drawing over {} wallets", self.raffle_pool_size);
        info!("Selected {} Winning Entries", self.winners.len());
    }

    /// Ranked winners as a table
    pub fn winners_table(&self) -> String {
        if self.winners.is_empty() {
            return "(no winners)".to_string();
        }
        let rows: Vec<WinnerRow> = self
            .winners
            .iter()
            .enumerate()
            .map(|(i, wallet)| WinnerRow {
                rank: i + 1,
                wallet: wallet.clone(),
            })
            .collect();
        Table::new(rows).to_string()
    }

    pub fn render(&self, mode: OutputMode) -> Result<String> {
        match mode {
            OutputMode::Table => Ok(self.winners_table()),
            OutputMode::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}
