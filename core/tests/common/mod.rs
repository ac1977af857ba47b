//! # Common Utilities For Tests
//!
//! Builds a mainchain whose difficulty follows the averaging window
//! retarget, recomputing every window from scratch, and a sidechain that
//! references it.

#![allow(dead_code)]

use mainchain_pow::block::{MainchainBlockReference, MemoryHistory, SidechainBlock};
use mainchain_pow::config::{MainchainNetwork, NetworkParams};
use mainchain_pow::genesis::encode_pow_data;
use mainchain_pow::header::MainchainHeader;
use mainchain_pow::retarget::calculate_next_work_required;
use mainchain_pow::target::bits_to_target;
use mainchain_pow::timestamp::median_time_past;
use mainchain_pow::utils::initialize_logger;
use mainchain_pow::window::TimeBitsSample;
use num_bigint::BigUint;

/// Well below every network's pow limit.
pub const STEADY_BITS: u32 = 0x1e7fffff;
pub const START_TIME: i32 = 1_600_000_000;
/// Height of the mainchain block referenced by the sidechain genesis block.
pub const GENESIS_HEIGHT: usize = 30;

pub fn mc_hash(height: usize) -> [u8; 32] {
    let mut hash = [0u8; 32];
    hash[24..].copy_from_slice(&(height as u64 + 1).to_be_bytes());
    hash
}

pub struct Mainchain {
    pub params: NetworkParams,
    pub headers: Vec<MainchainHeader>,
}

impl Mainchain {
    /// Blocks up to and including [`GENESIS_HEIGHT`], mined on schedule.
    pub fn new(network: MainchainNetwork) -> Self {
        initialize_logger(None).expect("logger");

        let headers: Vec<MainchainHeader> = (0..=GENESIS_HEIGHT)
            .map(|height| MainchainHeader {
                hash: mc_hash(height),
                hash_prev_block: if height == 0 {
                    [0u8; 32]
                } else {
                    mc_hash(height - 1)
                },
                time: START_TIME + 150 * height as i32,
                bits: STEADY_BITS,
            })
            .collect();

        let seed: Vec<TimeBitsSample> = headers[..GENESIS_HEIGHT]
            .iter()
            .map(TimeBitsSample::from)
            .collect();
        let params = NetworkParams::new(network, mc_hash(GENESIS_HEIGHT), seed);

        Mainchain { params, headers }
    }

    /// Genesis PoW data in `getscgenesisinfo` format.
    pub fn genesis_pow_data(&self) -> String {
        encode_pow_data(&self.params.genesis_pow_data)
    }

    /// Bits the next block must carry, computed over the whole trailing
    /// window without any incremental state.
    pub fn expected_next_bits(&self) -> u32 {
        let window = &self.headers[self.headers.len() - self.params.window_size()..];
        let times: Vec<i32> = window.iter().map(|header| header.time).collect();
        let averaging = self.params.pow_averaging_window();
        let span = self.params.median_time_span();

        let sum: BigUint = window[window.len() - averaging..]
            .iter()
            .map(|header| bits_to_target(header.bits))
            .sum();
        let avg = sum / averaging;

        calculate_next_work_required(
            &avg,
            median_time_past(&times, times.len() - averaging, span),
            median_time_past(&times, times.len(), span),
            &self.params,
        )
    }

    /// Mines one block `spacing` seconds after the tip.
    pub fn mine(&mut self, spacing: i32) -> &MainchainHeader {
        let height = self.headers.len();
        let tip_time = self.headers[height - 1].time;
        let header = MainchainHeader {
            hash: mc_hash(height),
            hash_prev_block: mc_hash(height - 1),
            time: tip_time + spacing,
            bits: self.expected_next_bits(),
        };
        self.headers.push(header);
        &self.headers[height]
    }

    pub fn tip_height(&self) -> usize {
        self.headers.len() - 1
    }
}

/// Sidechain whose blocks reference consecutive ranges of a [`Mainchain`].
pub struct Sidechain {
    pub history: MemoryHistory,
    pub tip: SidechainBlock,
    next_height: usize,
    count: u64,
}

impl Sidechain {
    pub fn new(mainchain: &Mainchain) -> Self {
        let genesis = SidechainBlock {
            id: Self::id(0),
            parent_id: [0u8; 32],
            mainchain_block_references: vec![MainchainBlockReference {
                header: mainchain.headers[GENESIS_HEIGHT].clone(),
            }],
            next_mainchain_headers: vec![],
            ommers: vec![],
        };

        let mut history = MemoryHistory::new();
        history.insert(genesis.clone());
        Sidechain {
            history,
            tip: genesis,
            next_height: GENESIS_HEIGHT + 1,
            count: 1,
        }
    }

    fn id(count: u64) -> [u8; 32] {
        let mut id = [0x5c; 32];
        id[24..].copy_from_slice(&count.to_be_bytes());
        id
    }

    /// Block on top of the tip referencing the next `count` mainchain
    /// blocks. Not added to history.
    pub fn candidate(&self, mainchain: &Mainchain, count: usize) -> SidechainBlock {
        SidechainBlock {
            id: Self::id(self.count),
            parent_id: self.tip.id,
            mainchain_block_references: mainchain.headers[self.next_height..self.next_height + count]
                .iter()
                .cloned()
                .map(|header| MainchainBlockReference { header })
                .collect(),
            next_mainchain_headers: vec![],
            ommers: vec![],
        }
    }

    pub fn connect(&mut self, block: SidechainBlock) {
        self.next_height += block.mainchain_block_references.len();
        self.count += 1;
        self.history.insert(block.clone());
        self.tip = block;
    }
}
