//! # Configuration Options
//!
//! This module defines the network parameters every verification call reads.
//!
//! This module is base for `cli` module and not dependent on it. Therefore,
//! this module can be used independently.
//!
//! ## Configuration File
//!
//! Network parameters can be read from a TOML file:
//!
//! ```toml
//! network = "mainnet"
//! genesis_mainchain_block_hash = "<64 hex chars>"
//! # Output of the mainchain `getscgenesisinfo` RPC, newest record first.
//! genesis_pow_data = "<hex>"
//!
//! # Optional, overrides the paramset of `network`.
//! [pow]
//! pow_averaging_window = 17
//! median_time_span = 11
//! pow_target_spacing = 150
//! pow_max_adjust_down = 32
//! pow_max_adjust_up = 16
//! pow_limit = "0007ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff"
//! ```

use crate::errors::PowError;
use crate::genesis::parse_pow_data;
use crate::window::TimeBitsSample;
use num_bigint::BigUint;
use serde::Deserialize;
use std::path::Path;

pub mod env;
pub mod paramset;

pub use paramset::{
    MainchainNetwork, PowParamset, MAINNET_POW_PARAMSET, REGTEST_POW_PARAMSET,
    TESTNET_POW_PARAMSET,
};

/// Everything the engine needs to know about the mainchain and the point the
/// sidechain was bootstrapped from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkParams {
    pub network: MainchainNetwork,
    pub pow: PowParamset,
    /// Hash of the mainchain block referenced by the sidechain genesis block.
    pub genesis_mainchain_block_hash: [u8; 32],
    /// Time/bits samples of the mainchain blocks preceding the genesis
    /// reference, oldest first.
    pub genesis_pow_data: Vec<TimeBitsSample>,
}

/// On-disk shape of [`NetworkParams`].
#[derive(Debug, Clone, Deserialize)]
struct NetworkParamsFile {
    network: MainchainNetwork,
    #[serde(with = "hex::serde")]
    genesis_mainchain_block_hash: [u8; 32],
    #[serde(default)]
    genesis_pow_data: String,
    #[serde(default)]
    pow: Option<PowParamset>,
}

impl NetworkParams {
    pub fn new(
        network: MainchainNetwork,
        genesis_mainchain_block_hash: [u8; 32],
        genesis_pow_data: Vec<TimeBitsSample>,
    ) -> Self {
        let pow: &'static PowParamset = network.into();
        NetworkParams {
            network,
            pow: *pow,
            genesis_mainchain_block_hash,
            genesis_pow_data,
        }
    }

    /// Paramset of `network` with no genesis information. Useful for checks
    /// that never reach the bootstrap boundary.
    pub fn without_genesis(network: MainchainNetwork) -> Self {
        Self::new(network, [0u8; 32], Vec::new())
    }

    pub fn pow_averaging_window(&self) -> usize {
        self.pow.pow_averaging_window
    }

    pub fn median_time_span(&self) -> usize {
        self.pow.median_time_span
    }

    pub fn window_size(&self) -> usize {
        self.pow.window_size()
    }

    pub fn pow_limit(&self) -> BigUint {
        self.pow.pow_limit()
    }

    pub fn averaging_window_timespan(&self) -> i64 {
        self.pow.averaging_window_timespan()
    }

    pub fn min_actual_timespan(&self) -> i64 {
        self.pow.min_actual_timespan()
    }

    pub fn max_actual_timespan(&self) -> i64 {
        self.pow.max_actual_timespan()
    }

    pub fn validate(&self) -> Result<(), PowError> {
        self.pow.validate()
    }

    /// Reads a TOML configuration file, see the module documentation for
    /// its layout.
    pub fn try_parse_file(path: impl AsRef<Path>) -> Result<Self, PowError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| PowError::ConfigError(format!("{}: {}", path.display(), e)))?;

        tracing::trace!("Using network params file: {:?}", path);

        Self::try_parse_from(&contents)
    }

    /// Parses TOML formatted network parameters.
    pub fn try_parse_from(input: &str) -> Result<Self, PowError> {
        let file: NetworkParamsFile = toml::from_str(input)?;

        let mut params = NetworkParams::new(
            file.network,
            file.genesis_mainchain_block_hash,
            parse_pow_data(&file.genesis_pow_data)?,
        );
        if let Some(pow) = file.pow {
            params.pow = pow;
        }

        params.validate()?;
        Ok(params)
    }
}
