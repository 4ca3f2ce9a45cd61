pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod raffle;
pub mod services;

pub use crate::config::AppConfig;
pub use crate::error::{DecodeError, RaffleError, Result};
pub use crate::raffle::{CallDataDecoder, ContractInterface, IneligibleTraits, RedeemCall};
pub use crate::services::{RafflePipeline, RaffleReport, RaffleSettings};
