//! # Testing Utilities
//!
//! A synthetic mainchain with perfectly spaced blocks at constant difficulty,
//! and a sidechain referencing it. Only compiled for unit tests.
//!
//! Mainchain heights `0..GENESIS_HEIGHT` form the genesis PoW data. The
//! sidechain genesis block references the mainchain block at
//! [`GENESIS_HEIGHT`], every later sidechain block references the next
//! unreferenced heights.

use crate::block::{BlockId, MainchainBlockReference, MemoryHistory, SidechainBlock};
use crate::config::{MainchainNetwork, NetworkParams};
use crate::header::MainchainHeader;
use crate::window::TimeBitsSample;

/// Bits every synthetic header carries. Satisfied by every [`mc_hash`].
pub const STEADY_BITS: u32 = 0x1f07ffff;
pub const START_TIME: i32 = 1_600_000_000;
pub const SPACING: i32 = 150;
/// Mainchain height referenced by the sidechain genesis block.
pub const GENESIS_HEIGHT: u64 = 30;

pub fn mc_hash(height: u64) -> [u8; 32] {
    let mut hash = [0u8; 32];
    hash[24..].copy_from_slice(&(height + 1).to_be_bytes());
    hash
}

pub fn mc_time(height: u64) -> i32 {
    START_TIME + SPACING * height as i32
}

pub fn mc_header(height: u64) -> MainchainHeader {
    MainchainHeader {
        hash: mc_hash(height),
        hash_prev_block: height.checked_sub(1).map(mc_hash).unwrap_or([0u8; 32]),
        time: mc_time(height),
        bits: STEADY_BITS,
    }
}

pub fn sc_id(index: usize) -> BlockId {
    let mut id = [0x5c; 32];
    id[24..].copy_from_slice(&(index as u64).to_be_bytes());
    id
}

/// Genesis PoW data of the first `count` mainchain blocks, oldest first.
pub fn seed_samples(count: u64) -> Vec<TimeBitsSample> {
    (0..count)
        .map(|height| TimeBitsSample::new(mc_time(height), STEADY_BITS))
        .collect()
}

pub struct ChainFixture {
    pub params: NetworkParams,
    pub history: MemoryHistory,
    pub blocks: Vec<SidechainBlock>,
    next_height: u64,
}

impl ChainFixture {
    /// Sidechain with only its genesis block.
    pub fn new() -> Self {
        Self::with_seed(GENESIS_HEIGHT)
    }

    /// Same as [`ChainFixture::new`], with only the newest `seed_count`
    /// genesis PoW samples available.
    pub fn with_seed(seed_count: u64) -> Self {
        let seed = seed_samples(GENESIS_HEIGHT);
        let seed = seed[seed.len() - seed_count as usize..].to_vec();
        let params = NetworkParams::new(MainchainNetwork::Mainnet, mc_hash(GENESIS_HEIGHT), seed);

        let mut fixture = ChainFixture {
            params,
            history: MemoryHistory::new(),
            blocks: Vec::new(),
            next_height: GENESIS_HEIGHT,
        };
        fixture.push_block(1);
        fixture
    }

    pub fn tip_id(&self) -> BlockId {
        self.blocks
            .last()
            .map(|block| block.id)
            .unwrap_or([0u8; 32])
    }

    /// Sidechain block on top of the tip, not added to history.
    pub fn candidate(&self, reference_count: u64, next_count: u64) -> SidechainBlock {
        let references = self.next_height..self.next_height + reference_count;
        let next = references.end..references.end + next_count;

        SidechainBlock {
            id: sc_id(self.blocks.len()),
            parent_id: self.tip_id(),
            mainchain_block_references: references
                .map(|height| MainchainBlockReference {
                    header: mc_header(height),
                })
                .collect(),
            next_mainchain_headers: next.map(mc_header).collect(),
            ommers: vec![],
        }
    }

    /// Appends a block referencing the next `reference_count` mainchain
    /// blocks and returns its id.
    pub fn push_block(&mut self, reference_count: u64) -> BlockId {
        let block = self.candidate(reference_count, 0);
        let id = block.id;

        self.next_height += reference_count;
        self.history.insert(block.clone());
        self.blocks.push(block);
        id
    }

    /// Points the first reference of block `index` at an unknown
    /// predecessor.
    pub fn break_link(&mut self, index: usize) {
        let block = &mut self.blocks[index];
        block.mainchain_block_references[0].header.hash_prev_block = [0xdd; 32];
        self.history.insert(block.clone());
    }

    /// Removes block `index` from history, keeping it in the chain.
    pub fn forget(&mut self, index: usize) {
        let id = self.blocks[index].id;
        self.history = self
            .blocks
            .iter()
            .filter(|block| block.id != id)
            .cloned()
            .collect();
    }
}
