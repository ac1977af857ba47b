//! # Genesis PoW Data
//!
//! Before the sidechain has referenced enough mainchain blocks, the retarget
//! window is completed with time/bits samples of the mainchain blocks that
//! precede the sidechain genesis reference. The mainchain exports them via
//! `getscgenesisinfo` as hex: consecutive 8 byte records, each a little
//! endian `time` followed by a little endian `bits`, newest block first.

use crate::errors::PowError;
use crate::window::TimeBitsSample;

/// Size of one `time | bits` record.
pub const POW_DATA_RECORD_LEN: usize = 8;

/// Parses genesis PoW data and returns its samples oldest first.
pub fn parse_pow_data(pow_data: &str) -> Result<Vec<TimeBitsSample>, PowError> {
    let bytes = hex::decode(pow_data.trim())?;

    if bytes.len() % POW_DATA_RECORD_LEN != 0 {
        return Err(PowError::PowDataMalformed(format!(
            "length {} is not a multiple of {}",
            bytes.len(),
            POW_DATA_RECORD_LEN
        )));
    }

    Ok(bytes
        .chunks_exact(POW_DATA_RECORD_LEN)
        .map(|record| {
            TimeBitsSample::new(
                i32::from_le_bytes([record[0], record[1], record[2], record[3]]),
                u32::from_le_bytes([record[4], record[5], record[6], record[7]]),
            )
        })
        .rev()
        .collect())
}

/// Inverse of [`parse_pow_data`]: encodes oldest first `samples` in the
/// newest first wire order.
pub fn encode_pow_data(samples: &[TimeBitsSample]) -> String {
    let bytes: Vec<u8> = samples
        .iter()
        .rev()
        .flat_map(|sample| {
            sample
                .time
                .to_le_bytes()
                .into_iter()
                .chain(sample.bits.to_le_bytes())
        })
        .collect();
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reverses_records() {
        // Newest record first: (time 0x5f5e1000, bits 0x1f07ffff), then (0x5f5e0f6a, 0x1f07fffe).
        let pow_data = "00105e5fffff071f6a0f5e5ffeff071f";
        let samples = parse_pow_data(pow_data).expect("parse");

        assert_eq!(
            samples,
            vec![
                TimeBitsSample::new(0x5f5e0f6a, 0x1f07fffe),
                TimeBitsSample::new(0x5f5e1000, 0x1f07ffff),
            ]
        );
    }

    #[test]
    fn test_round_trip() {
        let samples: Vec<TimeBitsSample> = (0..5)
            .map(|i| TimeBitsSample::new(1_600_000_000 + 150 * i, 0x1f07ff00 + i as u32))
            .collect();

        let encoded = encode_pow_data(&samples);
        assert_eq!(encoded.len(), 5 * POW_DATA_RECORD_LEN * 2);
        assert_eq!(parse_pow_data(&encoded).expect("parse"), samples);

        // The first record on the wire is the newest sample.
        let wire = hex::decode(&encoded).expect("hex");
        assert_eq!(&wire[..4], &samples[4].time.to_le_bytes());
    }

    #[test]
    fn test_negative_time() {
        let samples = parse_pow_data("ffffffff00000000").expect("parse");
        assert_eq!(samples, vec![TimeBitsSample::new(-1, 0)]);
    }

    #[test]
    fn test_empty() {
        assert!(parse_pow_data("").expect("parse").is_empty());
    }

    #[test]
    fn test_malformed() {
        assert!(matches!(
            parse_pow_data("00112233445566"),
            Err(PowError::PowDataMalformed(_))
        ));
        assert!(matches!(parse_pow_data("0g"), Err(PowError::HexError(_))));
        assert!(matches!(parse_pow_data("001"), Err(PowError::HexError(_))));
    }
}
