pub mod pipeline;
pub mod report;

pub use pipeline::{RafflePipeline, RaffleSettings, ScanSummary};
pub use report::{OutputMode, RaffleReport};
