//! # Retarget Window
//!
//! The trailing `N + M` mainchain (time, bits) samples a new header's
//! difficulty is computed from, together with the sum of the targets of the
//! newest `N` samples.
//!
//! The window preceding a sidechain block's first claimed header is rebuilt
//! by walking sidechain ancestry backwards through the [`HistoryStore`],
//! reading each ancestor's mainchain references newest first. When the walk
//! reaches the mainchain block the sidechain was bootstrapped from, the
//! remaining samples come from the genesis PoW data.

use crate::block::{HistoryStore, SidechainBlock};
use crate::config::NetworkParams;
use crate::errors::PowError;
use crate::header::MainchainHeader;
use crate::target::bits_to_target;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::ops::ControlFlow;

#[derive(Serialize, Deserialize, Eq, PartialEq, Clone, Copy, Debug)]
pub struct TimeBitsSample {
    pub time: i32,
    pub bits: u32,
}

impl TimeBitsSample {
    pub fn new(time: i32, bits: u32) -> Self {
        TimeBitsSample { time, bits }
    }
}

impl From<&MainchainHeader> for TimeBitsSample {
    fn from(header: &MainchainHeader) -> Self {
        TimeBitsSample::new(header.time, header.bits)
    }
}

/// Full retarget window, oldest sample first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PowWindow {
    samples: VecDeque<TimeBitsSample>,
    target_sum: BigUint,
    averaging_window: usize,
}

impl PowWindow {
    /// Wraps `samples` and sums the targets of the newest
    /// `averaging_window` of them.
    ///
    /// # Panics
    ///
    /// Panics if there are fewer samples than `averaging_window`.
    pub fn from_samples(samples: Vec<TimeBitsSample>, averaging_window: usize) -> Self {
        assert!(
            samples.len() >= averaging_window,
            "Window of {} samples can't average over {}",
            samples.len(),
            averaging_window
        );

        let target_sum = samples[samples.len() - averaging_window..]
            .iter()
            .map(|sample| bits_to_target(sample.bits))
            .sum();

        PowWindow {
            samples: samples.into(),
            target_sum,
            averaging_window,
        }
    }

    /// Rebuilds the window that precedes the first mainchain header claimed
    /// by `block`. Returns `None` if the block claims no headers.
    ///
    /// The walk follows `parent_id` links until the window is full or the
    /// genesis reference is reached, with no depth limit of its own. A
    /// `history` whose ancestry can be cyclic or unboundedly deep without
    /// references must be bounded by the caller.
    pub fn build(
        block: &SidechainBlock,
        history: &impl HistoryStore,
        params: &NetworkParams,
    ) -> Result<Option<Self>, PowError> {
        let Some(first) = block.claimed_headers().next() else {
            return Ok(None);
        };

        let samples = collect_samples(first, block, history, params)?;
        tracing::debug!(
            "Built retarget window of {} samples before mainchain header {}",
            samples.len(),
            first.hash_hex()
        );

        Ok(Some(PowWindow::from_samples(
            samples,
            params.pow_averaging_window(),
        )))
    }

    pub fn samples(&self) -> impl ExactSizeIterator<Item = &TimeBitsSample> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn times(&self) -> Vec<i32> {
        self.samples.iter().map(|sample| sample.time).collect()
    }

    /// Sum of the targets of the newest `N` samples.
    pub fn target_sum(&self) -> &BigUint {
        &self.target_sum
    }

    pub fn average_target(&self) -> BigUint {
        &self.target_sum / self.averaging_window
    }

    pub fn averaging_window(&self) -> usize {
        self.averaging_window
    }

    /// Slides the window one header forward.
    pub fn advance(mut self, header: &MainchainHeader) -> Self {
        let leaving = self.samples[self.samples.len() - self.averaging_window];
        self.target_sum += bits_to_target(header.bits);
        self.target_sum -= bits_to_target(leaving.bits);

        self.samples.pop_front();
        self.samples.push_back(header.into());
        self
    }
}

/// Samples gathered while walking backwards.
struct Walk {
    samples: VecDeque<TimeBitsSample>,
    /// Hash of the oldest header reached so far.
    cursor_hash: [u8; 32],
    /// Hash the next older header must have.
    cursor_prev_hash: [u8; 32],
    required: usize,
}

impl Walk {
    fn prepend(
        mut self,
        header: &MainchainHeader,
        params: &NetworkParams,
    ) -> ControlFlow<Result<Vec<TimeBitsSample>, PowError>, Self> {
        if header.hash != self.cursor_prev_hash {
            return ControlFlow::Break(Err(PowError::ChainDiscontinuity {
                expected: hex::encode(self.cursor_prev_hash),
                found: header.hash_hex(),
            }));
        }

        self.samples.push_front(header.into());
        self.cursor_hash = header.hash;
        self.cursor_prev_hash = header.hash_prev_block;

        if self.samples.len() == self.required {
            return ControlFlow::Break(Ok(self.samples.into()));
        }
        if self.at_genesis(params) {
            return ControlFlow::Break(self.seed_from_genesis(params));
        }
        ControlFlow::Continue(self)
    }

    fn at_genesis(&self, params: &NetworkParams) -> bool {
        self.cursor_hash == params.genesis_mainchain_block_hash
    }

    /// Completes the window with the newest genesis PoW samples.
    fn seed_from_genesis(self, params: &NetworkParams) -> Result<Vec<TimeBitsSample>, PowError> {
        let missing = self.required - self.samples.len();
        let seed = &params.genesis_pow_data;
        if seed.len() < missing {
            return Err(PowError::IncompleteHistory {
                collected: self.samples.len() + seed.len(),
                required: self.required,
            });
        }

        tracing::debug!("Taking {} samples from genesis PoW data", missing);
        Ok(seed[seed.len() - missing..]
            .iter()
            .copied()
            .chain(self.samples)
            .collect())
    }
}

fn collect_samples(
    first: &MainchainHeader,
    block: &SidechainBlock,
    history: &impl HistoryStore,
    params: &NetworkParams,
) -> Result<Vec<TimeBitsSample>, PowError> {
    let mut walk = Walk {
        samples: VecDeque::with_capacity(params.window_size()),
        cursor_hash: first.hash,
        cursor_prev_hash: first.hash_prev_block,
        required: params.window_size(),
    };
    if walk.at_genesis(params) {
        return walk.seed_from_genesis(params);
    }

    let mut parent_id = block.parent_id;
    loop {
        let parent = history
            .block_by_id(&parent_id)
            .ok_or_else(|| PowError::MissingAncestor(hex::encode(parent_id)))?;

        // Ancestors without mainchain references leave the walk unchanged.
        walk = match parent
            .reference_headers()
            .rev()
            .try_fold(walk, |walk, header| walk.prepend(header, params))
        {
            ControlFlow::Break(done) => return done,
            ControlFlow::Continue(walk) => walk,
        };
        parent_id = parent.parent_id;
    }
}
