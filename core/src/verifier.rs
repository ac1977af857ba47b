//! # Verifier
//!
//! Entry points that decide whether a sidechain block's mainchain claims
//! carry valid proof of work and correctly retargeted difficulty.
//!
//! The `verify_*` functions report why a block was rejected. The `check_*`
//! wrappers log that reason and collapse it into a `bool`, which is what
//! block validation consumes.

use crate::block::{HistoryStore, SidechainBlock};
use crate::config::NetworkParams;
use crate::errors::PowError;
use crate::header::{verify_proof_of_work, MainchainHeader};
use crate::retarget::{bits_within_tolerance, next_bits};
use crate::window::PowWindow;
use itertools::Itertools;

/// Verifies that every header in `headers` carries the bits the window
/// before it requires, sliding the window forward after each one.
///
/// Returns the window following the last header.
pub fn verify_header_sequence<'a>(
    window: PowWindow,
    headers: impl IntoIterator<Item = &'a MainchainHeader>,
    params: &NetworkParams,
) -> Result<PowWindow, PowError> {
    headers.into_iter().try_fold(window, |window, header| {
        let expected = next_bits(&window, params);
        tracing::trace!(
            "Mainchain header {}: expected bits {:#010x}, claimed {:#010x}",
            header.hash_hex(),
            expected,
            header.bits
        );

        if !bits_within_tolerance(expected, header.bits) {
            return Err(PowError::RetargetMismatch {
                hash: header.hash_hex(),
                expected,
                claimed: header.bits,
            });
        }

        Ok(window.advance(header))
    })
}

/// Verifies the difficulty of every mainchain header `block` claims,
/// including the headers carried by its ommers.
///
/// Ommers are verified against the same starting window as the block
/// itself, since they compete for the same mainchain positions. Headers
/// shared between several ommers are verified once.
pub fn verify_next_work_required(
    block: &SidechainBlock,
    history: &impl HistoryStore,
    params: &NetworkParams,
) -> Result<(), PowError> {
    let Some(window) = PowWindow::build(block, history, params)? else {
        return Ok(());
    };

    verify_header_sequence(window.clone(), block.claimed_headers(), params)?;

    if !block.ommers.is_empty() {
        let ommer_headers = block
            .ommers
            .iter()
            .flat_map(|ommer| ommer.headers())
            .unique_by(|header| header.hash);
        verify_header_sequence(window, ommer_headers, params)?;
    }

    Ok(())
}

/// Returns true if `header` satisfies its own target and that target is
/// legal for the network.
pub fn check_proof_of_work(header: &MainchainHeader, params: &NetworkParams) -> bool {
    match verify_proof_of_work(header, params) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Proof of work check failed: {e}");
            false
        }
    }
}

/// Returns true if every mainchain header claimed by `block` and its
/// ommers carries correctly retargeted bits.
pub fn check_next_work_required(
    block: &SidechainBlock,
    history: &impl HistoryStore,
    params: &NetworkParams,
) -> bool {
    match verify_next_work_required(block, history, params) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(
                "Next work required check failed for sidechain block {}: {e}",
                hex::encode(block.id)
            );
            false
        }
    }
}
