//! # Mainchain Headers
//!
//! The subset of a mainchain block header that the proof-of-work engine
//! reads, and the self-contained proof-of-work check of a single header.

use crate::config::NetworkParams;
use crate::errors::PowError;
use crate::target::{bits_to_target, is_negative};
use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

/// Mainchain block header as referenced from the sidechain.
///
/// ## Fields
///
/// * `hash` - Header hash, most significant byte first
/// * `hash_prev_block` - Hash of the immediate mainchain predecessor
/// * `time` - Block timestamp as Unix time
/// * `bits` - Compact representation of the difficulty target
#[derive(Serialize, Deserialize, Eq, PartialEq, Clone, Debug)]
pub struct MainchainHeader {
    #[serde(with = "hex::serde")]
    pub hash: [u8; 32],
    #[serde(with = "hex::serde")]
    pub hash_prev_block: [u8; 32],
    pub time: i32,
    pub bits: u32,
}

impl MainchainHeader {
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }

    /// Header hash as an unsigned integer.
    pub fn hash_as_target(&self) -> BigUint {
        BigUint::from_bytes_be(&self.hash)
    }
}

/// Checks that a header's claimed target is legal for the network and that
/// its hash satisfies that target. Chain history is not consulted.
pub fn verify_proof_of_work(
    header: &MainchainHeader,
    params: &NetworkParams,
) -> Result<(), PowError> {
    let target = bits_to_target(header.bits);

    if target.is_zero() || is_negative(header.bits) {
        return Err(PowError::MalformedTarget {
            bits: header.bits,
            reason: "target is not positive",
        });
    }

    if target > params.pow_limit() {
        return Err(PowError::MalformedTarget {
            bits: header.bits,
            reason: "target is above the network limit",
        });
    }

    if header.hash_as_target() > target {
        return Err(PowError::InsufficientProof {
            hash: header.hash_hex(),
        });
    }

    Ok(())
}
