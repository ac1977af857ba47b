//! # Environment Variable Support For [`NetworkParams`]

use super::{MainchainNetwork, NetworkParams};
use crate::errors::PowError;
use crate::genesis::parse_pow_data;
use std::str::FromStr;

pub const MAINCHAIN_NETWORK: &str = "MAINCHAIN_NETWORK";
pub const GENESIS_MAINCHAIN_BLOCK_HASH: &str = "GENESIS_MAINCHAIN_BLOCK_HASH";
pub const GENESIS_POW_DATA: &str = "GENESIS_POW_DATA";

const NETWORK_PARAMS_VARS: [&str; 3] =
    [MAINCHAIN_NETWORK, GENESIS_MAINCHAIN_BLOCK_HASH, GENESIS_POW_DATA];

fn read_string_from_env(name: &'static str) -> Result<String, PowError> {
    std::env::var(name).map_err(|_| PowError::EnvVarNotSet(name))
}

impl NetworkParams {
    /// Reads network parameters from `MAINCHAIN_NETWORK`,
    /// `GENESIS_MAINCHAIN_BLOCK_HASH` and `GENESIS_POW_DATA`.
    pub fn from_env() -> Result<Self, PowError> {
        let network = MainchainNetwork::from_str(&read_string_from_env(MAINCHAIN_NETWORK)?)?;

        let genesis_hash = hex::decode(read_string_from_env(GENESIS_MAINCHAIN_BLOCK_HASH)?)?;
        let genesis_mainchain_block_hash: [u8; 32] =
            genesis_hash.as_slice().try_into().map_err(|_| {
                PowError::ConfigError(format!(
                    "{GENESIS_MAINCHAIN_BLOCK_HASH} must be 32 bytes, got {}",
                    genesis_hash.len()
                ))
            })?;

        let genesis_pow_data = parse_pow_data(&read_string_from_env(GENESIS_POW_DATA)?)?;

        let params = NetworkParams::new(network, genesis_mainchain_block_hash, genesis_pow_data);
        params.validate()?;
        Ok(params)
    }

    /// Same as [`NetworkParams::from_env`], but returns `None` if none of
    /// its variables are set. Once any of them is set, all of them are
    /// required.
    pub fn from_env_if_set() -> Result<Option<Self>, PowError> {
        if NETWORK_PARAMS_VARS
            .iter()
            .all(|name| std::env::var_os(name).is_none())
        {
            return Ok(None);
        }

        Self::from_env().map(Some)
    }
}
