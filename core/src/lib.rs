//! # Mainchain Proof-of-Work Verification
//!
//! Sidechain blocks reference mainchain blocks and may announce further
//! mainchain headers. This crate decides whether those claims obey the
//! mainchain's consensus rules on proof of work:
//!
//! - every header hash satisfies its own compact target, see
//!   [`verifier::check_proof_of_work`]
//! - every header carries the difficulty the mainchain's averaging window
//!   retarget would have assigned it, see [`verifier::check_next_work_required`]
//!
//! Sidechain history is only read through the [`block::HistoryStore`] trait.

pub mod block;
pub mod cli;
pub mod config;
pub mod errors;
pub mod genesis;
pub mod header;
pub mod retarget;
pub mod target;
pub mod timestamp;
pub mod utils;
pub mod verifier;
pub mod window;

#[cfg(test)]
pub(crate) mod test_utils;

pub use block::{HistoryStore, MemoryHistory, SidechainBlock};
pub use config::{MainchainNetwork, NetworkParams};
pub use errors::PowError;
pub use header::MainchainHeader;
pub use verifier::{check_next_work_required, check_proof_of_work};
