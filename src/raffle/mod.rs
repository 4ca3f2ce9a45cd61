pub mod aggregator;
pub mod decoder;
pub mod eligibility;
pub mod selector;

pub use aggregator::{resolve_eligibility, EligibilityOutcome, WalletRecords};
pub use decoder::{
    CallDataDecoder, ContractInterface, Irrelevance, RedeemCall, DEFAULT_REDEEM_METHOD,
    MUTANT_HOUND_COLLARS_ABI,
};
pub use eligibility::IneligibleTraits;
pub use selector::{draw, draw_winners};
