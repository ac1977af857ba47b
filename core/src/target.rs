//! # Compact Targets
//!
//! Conversion between the 32 bit compact `bits` representation used in
//! mainchain headers and the full target. Targets are kept as [`BigUint`] so
//! sums over the averaging window never overflow.
//!
//! The compact form is `size (1 byte) | mantissa (3 bytes)`, where `size` is
//! the number of significant bytes of the target and the top bit of the
//! mantissa is a sign flag.

use num_bigint::BigUint;
use num_traits::Zero;

/// Sign flag of the compact mantissa.
pub const COMPACT_SIGN_BIT: u32 = 0x0080_0000;

/// Decodes compact `bits` into a target.
///
/// The sign flag is not interpreted here, see [`is_negative`].
pub fn bits_to_target(bits: u32) -> BigUint {
    let size = bits >> 24;
    let mantissa = bits & 0x00ff_ffff;

    if size <= 3 {
        BigUint::from(mantissa >> (8 * (3 - size)))
    } else {
        BigUint::from(mantissa) << (8 * (size as usize - 3))
    }
}

/// Encodes a target into normalized compact `bits`.
///
/// Only the 24 most significant bits survive the conversion.
pub fn target_to_bits(target: &BigUint) -> u32 {
    if target.is_zero() {
        return 0;
    }

    let mut size = target.bits().div_ceil(8) as u32;
    let mut mantissa = if size <= 3 {
        low_u32(target) << (8 * (3 - size))
    } else {
        low_u32(&(target >> (8 * (size as usize - 3))))
    };

    // Keep the sign flag clear, a set flag would read back as a negative target.
    if mantissa & COMPACT_SIGN_BIT != 0 {
        mantissa >>= 8;
        size += 1;
    }

    (size << 24) | mantissa
}

/// Returns true if `bits` encodes a negative number in the signed compact
/// convention: the sign flag is set and the mantissa is not zero.
pub fn is_negative(bits: u32) -> bool {
    bits & COMPACT_SIGN_BIT != 0 && bits & 0x007f_ffff != 0
}

fn low_u32(value: &BigUint) -> u32 {
    value.iter_u32_digits().next().unwrap_or(0)
}
