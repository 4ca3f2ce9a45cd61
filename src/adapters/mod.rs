pub mod etherscan;
pub mod hound_metadata;
pub mod rate_limit;
pub mod traits;

pub use etherscan::{Chain, EtherscanClient};
pub use hound_metadata::HoundMetadataClient;
pub use rate_limit::RateLimiter;
pub use traits::{transactions_in_window, MetadataSource, TransactionSource};
