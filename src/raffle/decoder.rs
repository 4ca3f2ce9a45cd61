//! Burn-and-redeem call-data decoder
//!
//! Resolves the 4-byte selector of a transaction's call data against the
//! collar contract's JSON ABI and, when the call is the redeem method, decodes
//! its `uint256[]` argument into 64-bit asset identifiers.

use alloy::dyn_abi::{DynSolValue, JsonAbiExt};
use alloy::json_abi::{Function, JsonAbi};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{DecodeError, RaffleError, Result};

/// Embedded Mutant Hound Collars ABI
pub const MUTANT_HOUND_COLLARS_ABI: &str = include_str!("../../abi/mutant_hound_collars.json");

/// Method whose call data carries the burned collar identifiers
pub const DEFAULT_REDEEM_METHOD: &str = "burn2Redeem";

const SELECTOR_LEN: usize = 4;

// ============================================================================
// Contract interface description
// ============================================================================

/// Immutable selector → method table built from a JSON ABI
#[derive(Debug, Clone)]
pub struct ContractInterface {
    methods: HashMap<[u8; 4], Function>,
}

impl ContractInterface {
    /// Build the table from a standard JSON ABI array. Events, errors and
    /// constructors are ignored.
    pub fn from_json(abi_json: &str) -> Result<Self> {
        let abi: JsonAbi = serde_json::from_str(abi_json)
            .map_err(|e| RaffleError::Abi(format!("failed to parse ABI JSON: {}", e)))?;

        let methods: HashMap<[u8; 4], Function> = abi
            .functions()
            .map(|function| (function.selector().0, function.clone()))
            .collect();

        if methods.is_empty() {
            return Err(RaffleError::Abi("ABI declares no functions".to_string()));
        }

        Ok(Self { methods })
    }

    /// Load an ABI from disk
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&raw)
    }

    /// The collar contract ABI shipped with the binary
    pub fn mutant_hound_collars() -> Result<Self> {
        Self::from_json(MUTANT_HOUND_COLLARS_ABI)
    }

    pub fn method(&self, selector: &[u8; 4]) -> Option<&Function> {
        self.methods.get(selector)
    }

    /// Selector of the first method with the given name
    pub fn selector_for(&self, name: &str) -> Option<[u8; 4]> {
        self.methods
            .iter()
            .find(|(_, function)| function.name == name)
            .map(|(selector, _)| *selector)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

// ============================================================================
// Decoded call
// ============================================================================

/// Outcome of decoding one transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedeemCall {
    /// Redeem call with its asset identifiers in call order
    Redeem(Vec<u64>),
    /// The transaction invoked something other than the redeem method
    NotRelevant(Irrelevance),
}

impl RedeemCall {
    /// Identifiers carried by the call, empty when not relevant
    pub fn asset_ids(&self) -> &[u64] {
        match self {
            RedeemCall::Redeem(ids) => ids,
            RedeemCall::NotRelevant(_) => &[],
        }
    }

    pub fn is_relevant(&self) -> bool {
        matches!(self, RedeemCall::Redeem(_))
    }
}

/// Why a transaction was ignored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Irrelevance {
    /// Selector is not part of the contract interface
    UnresolvedMethod { selector: [u8; 4] },
    /// Selector resolved to a different method
    OtherMethod { name: String },
}

impl std::fmt::Display for Irrelevance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Irrelevance::UnresolvedMethod { selector } => {
                write!(f, "unresolved selector 0x{}", hex::encode(selector))
            }
            Irrelevance::OtherMethod { name } => write!(f, "method {}", name),
        }
    }
}

// ============================================================================
// Decoder
// ============================================================================

/// Stateless decoder over an immutable [`ContractInterface`]
#[derive(Debug, Clone)]
pub struct CallDataDecoder {
    interface: ContractInterface,
    redeem_method: String,
}

impl CallDataDecoder {
    pub fn new(interface: ContractInterface, redeem_method: impl Into<String>) -> Self {
        Self {
            interface,
            redeem_method: redeem_method.into(),
        }
    }

    /// Decoder for the collar contract's `burn2Redeem` method
    pub fn mutant_hound_collars() -> Result<Self> {
        Ok(Self::new(
            ContractInterface::mutant_hound_collars()?,
            DEFAULT_REDEEM_METHOD,
        ))
    }

    pub fn interface(&self) -> &ContractInterface {
        &self.interface
    }

    /// Decode the hex call data string reported by the block explorer
    pub fn decode_hex(&self, input: &str) -> std::result::Result<RedeemCall, DecodeError> {
        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        let bytes = hex::decode(digits)
            .map_err(|e| DecodeError::MalformedCallData(format!("invalid hex: {}", e)))?;

        self.decode(&bytes)
    }

    /// Decode raw call data bytes
    pub fn decode(&self, call_data: &[u8]) -> std::result::Result<RedeemCall, DecodeError> {
        if call_data.len() < SELECTOR_LEN {
            return Err(DecodeError::MalformedCallData(format!(
                "expected at least {} bytes, got {}",
                SELECTOR_LEN,
                call_data.len()
            )));
        }

        let mut selector = [0u8; 4];
        selector.copy_from_slice(&call_data[..SELECTOR_LEN]);

        let Some(method) = self.interface.method(&selector) else {
            return Ok(RedeemCall::NotRelevant(Irrelevance::UnresolvedMethod {
                selector,
            }));
        };

        if method.name != self.redeem_method {
            return Ok(RedeemCall::NotRelevant(Irrelevance::OtherMethod {
                name: method.name.clone(),
            }));
        }

        let values = method
            .abi_decode_input(&call_data[SELECTOR_LEN..])
            .map_err(|e| DecodeError::ArgumentDecode {
                method: method.name.clone(),
                reason: e.to_string(),
            })?;

        let ids = identifier_list(&method.name, values)?;
        Ok(RedeemCall::Redeem(ids))
    }
}

/// Interpret decoded arguments as a single `uint[]` and narrow each element
fn identifier_list(
    method: &str,
    values: Vec<DynSolValue>,
) -> std::result::Result<Vec<u64>, DecodeError> {
    let shape_error = |reason: String| DecodeError::ArgumentDecode {
        method: method.to_string(),
        reason,
    };

    let [argument] = <[DynSolValue; 1]>::try_from(values).map_err(|values| {
        shape_error(format!("expected 1 argument, got {}", values.len()))
    })?;

    let elements = match argument {
        DynSolValue::Array(elements) => elements,
        other => {
            return Err(shape_error(format!(
                "expected uint[], got {}",
                type_name(&other)
            )))
        }
    };

    elements
        .into_iter()
        .enumerate()
        .map(|(index, element)| match element {
            DynSolValue::Uint(value, _) => {
                u64::try_from(value).map_err(|_| DecodeError::IdentifierOverflow {
                    index,
                    value: value.to_string(),
                })
            }
            other => Err(shape_error(format!(
                "element #{} is {}, expected uint",
                index,
                type_name(&other)
            ))),
        })
        .collect()
}

fn type_name(value: &DynSolValue) -> String {
    value
        .sol_type_name()
        .map(|name| name.into_owned())
        .unwrap_or_else(|| "unknown".to_string())
}

// ============================================================================
// Tests
// ============================================================================
