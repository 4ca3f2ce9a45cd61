use serde::{Deserialize, Serialize};

/// A historical transaction sent to the collar contract
///
/// Only `from` and `input` feed the decode pipeline; the rest is kept for
/// logging and for skipping reverted calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTransaction {
    pub hash: String,
    pub block_number: u64,
    /// Sender address as reported by the explorer
    pub from: String,
    pub to: String,
    /// Hex-encoded call data (selector followed by ABI-encoded arguments)
    pub input: String,
    /// True when the transaction reverted
    #[serde(default)]
    pub is_error: bool,
}

impl RawTransaction {
    /// Minimal transaction carrying just the fields the decoder consumes
    pub fn new(from: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            hash: String::new(),
            block_number: 0,
            from: from.into(),
            to: String::new(),
            input: input.into(),
            is_error: false,
        }
    }
}

/// Which side of a timestamp the explorer should snap to when resolving a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockBoundary {
    Before,
    After,
}

impl BlockBoundary {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockBoundary::Before => "before",
            BlockBoundary::After => "after",
        }
    }
}

impl std::fmt::Display for BlockBoundary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
