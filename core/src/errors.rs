//! # Errors
//!
//! This module defines errors, returned by the library.
//!
//! Verification failures are reported as `false` at the public boundary, but
//! every internal check returns a [`PowError`] so the reason a block was
//! rejected can be logged and tested.

use thiserror::Error;

/// Errors returned by the proof-of-work engine.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PowError {
    /// Decoded target is zero, carries the sign flag or is above the network
    /// ceiling.
    #[error("Malformed target in bits {bits:#010x}: {reason}")]
    MalformedTarget { bits: u32, reason: &'static str },
    /// Header hash does not satisfy its own claimed target.
    #[error("Insufficient proof of work for header {hash}")]
    InsufficientProof { hash: String },
    /// A header does not link to the expected mainchain predecessor.
    #[error("Chain discontinuity: expected predecessor {expected}, found {found}")]
    ChainDiscontinuity { expected: String, found: String },
    /// Claimed bits are outside the tolerated distance from the recomputed value.
    #[error("Retarget mismatch for header {hash}: expected bits {expected:#010x}, claimed {claimed:#010x}")]
    RetargetMismatch {
        hash: String,
        expected: u32,
        claimed: u32,
    },
    /// A sidechain ancestor is missing from the history store.
    #[error("Sidechain block {0} not found in history")]
    MissingAncestor(String),
    /// Not enough samples to fill the retarget window, genesis seed included.
    #[error("Incomplete history: collected {collected} of {required} time/bits samples")]
    IncompleteHistory { collected: usize, required: usize },
    /// Genesis PoW data is not a sequence of 8 byte records.
    #[error("Malformed genesis PoW data: {0}")]
    PowDataMalformed(String),
    #[error("Invalid hex: {0}")]
    HexError(#[from] hex::FromHexError),

    /// ConfigError is returned when the configuration is invalid
    #[error("ConfigError: {0}")]
    ConfigError(String),
    #[error("Environment variable {0} is not set")]
    EnvVarNotSet(&'static str),
    #[error("Failed to parse TOML: {0}")]
    TomlError(#[from] toml::de::Error),
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("IoError: {0}")]
    IoError(#[from] std::io::Error),
}
