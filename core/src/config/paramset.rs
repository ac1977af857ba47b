//! # Proof-of-Work Paramsets
//!
//! Consensus constants of the mainchain difficulty algorithm. A paramset is
//! chosen by naming a [`MainchainNetwork`] in the configuration.

use crate::errors::PowError;
use hex_literal::hex;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Mainchain block interval in seconds.
pub const POW_TARGET_SPACING: i64 = 150;

/// Largest retarget window a paramset may ask for.
pub const MAX_WINDOW_SIZE: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// A pre-defined mainchain network that can be converted into a
/// [`PowParamset`] reference.
///
/// See: [`MAINNET_POW_PARAMSET`], [`TESTNET_POW_PARAMSET`], [`REGTEST_POW_PARAMSET`].
pub enum MainchainNetwork {
    Mainnet,
    Testnet,
    Regtest,
}

impl FromStr for MainchainNetwork {
    type Err = PowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mainnet" => Ok(MainchainNetwork::Mainnet),
            "testnet" => Ok(MainchainNetwork::Testnet),
            "regtest" => Ok(MainchainNetwork::Regtest),
            _ => Err(PowError::ConfigError(format!(
                "Unknown mainchain network: {}",
                s
            ))),
        }
    }
}

impl Display for MainchainNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MainchainNetwork::Mainnet => write!(f, "mainnet"),
            MainchainNetwork::Testnet => write!(f, "testnet"),
            MainchainNetwork::Regtest => write!(f, "regtest"),
        }
    }
}

impl From<MainchainNetwork> for &'static PowParamset {
    fn from(network: MainchainNetwork) -> Self {
        match network {
            MainchainNetwork::Mainnet => &MAINNET_POW_PARAMSET,
            MainchainNetwork::Testnet => &TESTNET_POW_PARAMSET,
            MainchainNetwork::Regtest => &REGTEST_POW_PARAMSET,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Parameters of the averaging window difficulty algorithm.
///
/// Changing any of these makes the engine disagree with the mainchain about
/// which headers are valid.
pub struct PowParamset {
    /// Number of blocks whose targets are averaged (N).
    pub pow_averaging_window: usize,
    /// Number of blocks the median time past is taken over (M). Must be odd.
    pub median_time_span: usize,
    /// Expected seconds between two mainchain blocks.
    pub pow_target_spacing: i64,
    /// Maximum difficulty decrease per block, in percent.
    pub pow_max_adjust_down: i64,
    /// Maximum difficulty increase per block, in percent.
    pub pow_max_adjust_up: i64,
    /// Highest permitted target, big endian.
    #[serde(with = "hex::serde")]
    pub pow_limit: [u8; 32],
}

pub const MAINNET_POW_PARAMSET: PowParamset = PowParamset {
    pow_averaging_window: 17,
    median_time_span: 11,
    pow_target_spacing: POW_TARGET_SPACING,
    pow_max_adjust_down: 32,
    pow_max_adjust_up: 16,
    pow_limit: hex!("0007ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff"),
};

pub const TESTNET_POW_PARAMSET: PowParamset = PowParamset {
    pow_averaging_window: 17,
    median_time_span: 11,
    pow_target_spacing: POW_TARGET_SPACING,
    pow_max_adjust_down: 32,
    pow_max_adjust_up: 16,
    pow_limit: hex!("07ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff"),
};

pub const REGTEST_POW_PARAMSET: PowParamset = PowParamset {
    pow_averaging_window: 17,
    median_time_span: 11,
    pow_target_spacing: POW_TARGET_SPACING,
    pow_max_adjust_down: 0,
    pow_max_adjust_up: 0,
    pow_limit: hex!("0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f"),
};

impl PowParamset {
    /// Number of time/bits samples the retarget window holds.
    pub fn window_size(&self) -> usize {
        self.pow_averaging_window + self.median_time_span
    }

    pub fn pow_limit(&self) -> BigUint {
        BigUint::from_bytes_be(&self.pow_limit)
    }

    pub fn averaging_window_timespan(&self) -> i64 {
        self.pow_averaging_window as i64 * self.pow_target_spacing
    }

    pub fn min_actual_timespan(&self) -> i64 {
        self.averaging_window_timespan() * (100 - self.pow_max_adjust_up) / 100
    }

    pub fn max_actual_timespan(&self) -> i64 {
        self.averaging_window_timespan() * (100 + self.pow_max_adjust_down) / 100
    }

    pub fn validate(&self) -> Result<(), PowError> {
        if self.pow_averaging_window == 0 {
            return Err(PowError::ConfigError(
                "pow_averaging_window must be positive".to_string(),
            ));
        }
        if self.median_time_span % 2 == 0 {
            return Err(PowError::ConfigError(format!(
                "median_time_span must be odd, got {}",
                self.median_time_span
            )));
        }
        if self.pow_target_spacing <= 0 {
            return Err(PowError::ConfigError(
                "pow_target_spacing must be positive".to_string(),
            ));
        }
        if !(0..100).contains(&self.pow_max_adjust_up) || self.pow_max_adjust_down < 0 {
            return Err(PowError::ConfigError(format!(
                "Adjustment bounds out of range: down {}%, up {}%",
                self.pow_max_adjust_down, self.pow_max_adjust_up
            )));
        }

        let window_size = self
            .pow_averaging_window
            .checked_add(self.median_time_span)
            .filter(|size| *size <= MAX_WINDOW_SIZE);
        if window_size.is_none() {
            return Err(PowError::ConfigError(format!(
                "Window of {} + {} samples exceeds {}",
                self.pow_averaging_window, self.median_time_span, MAX_WINDOW_SIZE
            )));
        }

        // Every derived timespan must fit before it is divided by 100.
        let max_timespan = i64::try_from(self.pow_averaging_window)
            .ok()
            .and_then(|window| window.checked_mul(self.pow_target_spacing))
            .and_then(|awt| {
                100i64
                    .checked_add(self.pow_max_adjust_down)
                    .and_then(|factor| awt.checked_mul(factor.max(100)))
            });
        if max_timespan.is_none() {
            return Err(PowError::ConfigError(format!(
                "Timespan of {} blocks at {}s spacing with {}% adjustment overflows",
                self.pow_averaging_window, self.pow_target_spacing, self.pow_max_adjust_down
            )));
        }

        Ok(())
    }
}
