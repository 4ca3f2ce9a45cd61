use alloy::primitives::{Address, U256};
use alloy::sol;
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use collar_raffler::adapters::{MetadataSource, TransactionSource};
use collar_raffler::domain::{BlockBoundary, HoundMetadata, RawTransaction};
use collar_raffler::error::{RaffleError, Result};
use collar_raffler::raffle::{CallDataDecoder, IneligibleTraits};
use collar_raffler::services::{RafflePipeline, RaffleSettings};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

sol! {
    function burn2Redeem(uint256[] tokenIds);
    function setApprovalForAll(address operator, bool approved);
}

fn redeem_input(ids: &[u64]) -> String {
    let call = burn2RedeemCall {
        tokenIds: ids.iter().map(|id| U256::from(*id)).collect(),
    };
    format!("0x{}", hex::encode(call.abi_encode()))
}

struct FakeExplorer {
    transactions: Vec<RawTransaction>,
    calls: Mutex<Vec<String>>,
    fail_listing: bool,
}

impl FakeExplorer {
    fn new(transactions: Vec<RawTransaction>) -> Self {
        Self {
            transactions,
            calls: Mutex::new(Vec::new()),
            fail_listing: false,
        }
    }
}

#[async_trait]
impl TransactionSource for FakeExplorer {
    async fn resolve_block_number(
        &self,
        timestamp: DateTime<Utc>,
        boundary: BlockBoundary,
    ) -> Result<u64> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("block {} {}", timestamp.timestamp(), boundary));
        Ok(timestamp.timestamp() as u64 / 12)
    }

    async fn list_transactions(
        &self,
        address: &str,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<RawTransaction>> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("txlist {} {} {}", address, from_block, to_block));
        if self.fail_listing {
            return Err(RaffleError::SourceUnavailable("rate limit reached".into()));
        }
        Ok(self.transactions.clone())
    }
}

struct FakeMetadata {
    faces: HashMap<u64, &'static str>,
}

#[async_trait]
impl MetadataSource for FakeMetadata {
    async fn fetch(&self, asset_id: u64) -> Result<HoundMetadata> {
        let face = self
            .faces
            .get(&asset_id)
            .ok_or_else(|| RaffleError::MetadataFetch {
                asset_id,
                reason: "HTTP 404 Not Found".into(),
            })?;
        Ok(HoundMetadata {
            face: face.to_string(),
            ..Default::default()
        })
    }
}

fn settings(max_winners: usize, seed: Option<u64>) -> RaffleSettings {
    RaffleSettings {
        contract: "0x354634c4621cDfb7a25E6486cCA1E019777D841B".into(),
        snapshot_start: "2023-03-01T00:00:00Z".parse().unwrap(),
        snapshot_stop: "2023-03-08T00:00:00Z".parse().unwrap(),
        max_winners,
        metadata_concurrency: 2,
        skip_reverted_transactions: false,
        seed,
    }
}

fn snapshot_transactions() -> Vec<RawTransaction> {
    let approval = setApprovalForAllCall {
        operator: Address::ZERO,
        approved: true,
    };
    let mut reverted = RawTransaction::new("0xee", redeem_input(&[6]));
    reverted.is_error = true;

    vec![
        RawTransaction::new("0xaa", redeem_input(&[1])),
        RawTransaction::new("0xbb", redeem_input(&[3])),
        RawTransaction::new("0xaa", redeem_input(&[2])),
        RawTransaction::new("0xcc", redeem_input(&[4])),
        RawTransaction::new("0xdd", redeem_input(&[5])),
        reverted,
        RawTransaction::new("0xff", "0x1234"),
        RawTransaction::new("0xab", format!("0x{}", hex::encode(approval.abi_encode()))),
    ]
}

fn pipeline(explorer: FakeExplorer, max_winners: usize, seed: Option<u64>) -> RafflePipeline {
    pipeline_with(explorer, settings(max_winners, seed))
}

fn pipeline_with(explorer: FakeExplorer, settings: RaffleSettings) -> RafflePipeline {
    let metadata = FakeMetadata {
        faces: HashMap::from([
            (1, "normal"),
            (2, "ghost"),
            (3, "normal"),
            (4, "normal"),
            (6, "normal"),
        ]),
    };

    RafflePipeline::new(
        CallDataDecoder::mutant_hound_collars().unwrap(),
        IneligibleTraits::new(vec![], vec!["ghost"], vec![], vec![]),
        Arc::new(explorer),
        Arc::new(metadata),
        settings,
    )
}

#[tokio::test]
async fn full_drawing_excludes_ineligible_and_failed_wallets() {
    let report = pipeline(FakeExplorer::new(snapshot_transactions()), 5, None)
        .run()
        .await
        .unwrap();

    assert_eq!(report.transactions_scanned, 8);
    // The reverted redeem from 0xee is decoded like any other
    assert_eq!(report.redeem_transactions, 6);
    assert_eq!(report.reverted_transactions, 1);
    assert_eq!(report.skipped_transactions, 1);

    // 0xaa redeemed an eligible hound first and a ghost later
    assert_eq!(report.ineligible_wallets, vec!["0xaa"]);
    assert_eq!(report.eligible_wallets, vec!["0xbb", "0xcc", "0xee"]);
    assert_eq!(report.failed_wallets, vec!["0xdd"]);
    assert_eq!(report.total_wallets, 4);
    assert_eq!(report.raffle_pool_size, 3);

    // Everyone in the pool wins when max_winners exceeds it
    let mut winners = report.winners.clone();
    winners.sort();
    assert_eq!(winners, vec!["0xbb", "0xcc", "0xee"]);
}

#[tokio::test]
async fn reverted_only_wallet_can_win() {
    let mut reverted = RawTransaction::new("0xee", redeem_input(&[6]));
    reverted.is_error = true;

    let report = pipeline(FakeExplorer::new(vec![reverted]), 1, None)
        .run()
        .await
        .unwrap();

    assert_eq!(report.reverted_transactions, 1);
    assert_eq!(report.eligible_wallets, vec!["0xee"]);
    assert_eq!(report.winners, vec!["0xee"]);
}

#[tokio::test]
async fn skipping_reverted_transactions_is_opt_in() {
    let mut skip_reverted = settings(5, None);
    skip_reverted.skip_reverted_transactions = true;

    let report = pipeline_with(FakeExplorer::new(snapshot_transactions()), skip_reverted)
        .run()
        .await
        .unwrap();

    assert_eq!(report.redeem_transactions, 5);
    assert_eq!(report.reverted_transactions, 1);
    assert_eq!(report.eligible_wallets, vec!["0xbb", "0xcc"]);
    assert_eq!(report.raffle_pool_size, 2);
}

#[tokio::test]
async fn seeded_drawing_is_bounded_and_reproducible() {
    let first = pipeline(FakeExplorer::new(snapshot_transactions()), 1, Some(11))
        .run()
        .await
        .unwrap();
    let second = pipeline(FakeExplorer::new(snapshot_transactions()), 1, Some(11))
        .run()
        .await
        .unwrap();

    assert_eq!(first.winners.len(), 1);
    assert!(first.eligible_wallets.contains(&first.winners[0]));
    assert_eq!(first.winners, second.winners);
}

#[tokio::test]
async fn zero_winners_yields_empty_list() {
    let report = pipeline(FakeExplorer::new(snapshot_transactions()), 0, None)
        .run()
        .await
        .unwrap();
    assert!(report.winners.is_empty());
    assert_eq!(report.raffle_pool_size, 3);
}

#[tokio::test]
async fn window_resolves_both_blocks_before_listing() {
    let explorer = Arc::new(FakeExplorer::new(Vec::new()));
    let start: DateTime<Utc> = "2023-03-01T00:00:00Z".parse().unwrap();
    let stop: DateTime<Utc> = "2023-03-08T00:00:00Z".parse().unwrap();

    let transactions =
        collar_raffler::adapters::transactions_in_window(explorer.as_ref(), "0xcollar", start, stop)
            .await
            .unwrap();
    assert!(transactions.is_empty());

    let calls = explorer.calls.lock().unwrap().clone();
    assert_eq!(
        calls,
        vec![
            format!("block {} before", start.timestamp()),
            format!("block {} before", stop.timestamp()),
            format!(
                "txlist 0xcollar {} {}",
                start.timestamp() / 12,
                stop.timestamp() / 12
            ),
        ]
    );
}

#[tokio::test]
async fn source_failure_is_fatal() {
    let mut explorer = FakeExplorer::new(snapshot_transactions());
    explorer.fail_listing = true;

    let result = pipeline(explorer, 3, None).run().await;
    match result {
        Err(RaffleError::SourceUnavailable(reason)) => {
            assert!(reason.contains("rate limit reached"), "{}", reason)
        }
        other => panic!("expected SourceUnavailable, got {:?}", other.map(|r| r.winners)),
    }
}

#[test]
fn scan_appends_multiple_redeems_per_wallet() {
    let pipeline = pipeline(FakeExplorer::new(Vec::new()), 3, None);
    let summary = pipeline.scan(&[
        RawTransaction::new("0xaa", redeem_input(&[5, 9])),
        RawTransaction::new("0xaa", redeem_input(&[42])),
        RawTransaction::new("0xbb", redeem_input(&[])),
    ]);

    assert_eq!(summary.redeem_calls, 3);
    assert_eq!(summary.records.assets("0xaa"), Some(&[5, 9, 42][..]));
    // An empty redeem contributes no wallet
    assert_eq!(summary.records.len(), 1);
}
