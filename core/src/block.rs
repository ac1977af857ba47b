//! # Sidechain Blocks
//!
//! The parts of a sidechain block the engine reads, and the history store
//! capability used to walk sidechain ancestry.

use crate::errors::PowError;
use crate::header::MainchainHeader;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Sidechain block identifier.
pub type BlockId = [u8; 32];

/// A fully backed reference to a mainchain block.
#[derive(Serialize, Deserialize, Eq, PartialEq, Clone, Debug)]
pub struct MainchainBlockReference {
    pub header: MainchainHeader,
}

/// Orphaned sidechain block whose mainchain claims are carried by a later
/// block and must satisfy the same rules.
#[derive(Serialize, Deserialize, Eq, PartialEq, Clone, Debug, Default)]
pub struct Ommer {
    #[serde(default)]
    pub mainchain_references_headers: Vec<MainchainHeader>,
    #[serde(default)]
    pub next_mainchain_headers: Vec<MainchainHeader>,
}

impl Ommer {
    pub fn headers(&self) -> impl Iterator<Item = &MainchainHeader> {
        self.mainchain_references_headers
            .iter()
            .chain(self.next_mainchain_headers.iter())
    }
}

#[derive(Serialize, Deserialize, Eq, PartialEq, Clone, Debug)]
pub struct SidechainBlock {
    #[serde(with = "hex::serde")]
    pub id: BlockId,
    #[serde(with = "hex::serde")]
    pub parent_id: BlockId,
    /// Newly referenced mainchain blocks, oldest first.
    #[serde(default)]
    pub mainchain_block_references: Vec<MainchainBlockReference>,
    /// Headers claimed as valid continuation without a full reference.
    #[serde(default)]
    pub next_mainchain_headers: Vec<MainchainHeader>,
    #[serde(default)]
    pub ommers: Vec<Ommer>,
}

impl SidechainBlock {
    pub fn reference_headers(&self) -> impl DoubleEndedIterator<Item = &MainchainHeader> {
        self.mainchain_block_references.iter().map(|r| &r.header)
    }

    /// Reference headers followed by the forward headers.
    pub fn claimed_headers(&self) -> impl Iterator<Item = &MainchainHeader> {
        self.reference_headers()
            .chain(self.next_mainchain_headers.iter())
    }
}

/// Read access to sidechain history.
///
/// Lookups are expected to be consistent for the duration of one
/// verification call.
pub trait HistoryStore {
    fn block_by_id(&self, id: &BlockId) -> Option<SidechainBlock>;
}

impl<T: HistoryStore + ?Sized> HistoryStore for &T {
    fn block_by_id(&self, id: &BlockId) -> Option<SidechainBlock> {
        (**self).block_by_id(id)
    }
}

/// History store kept in memory, keyed by block id.
#[derive(Debug, Clone, Default)]
pub struct MemoryHistory {
    blocks: HashMap<BlockId, SidechainBlock>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, block: SidechainBlock) {
        self.blocks.insert(block.id, block);
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Loads a JSON array of blocks.
    pub fn try_parse_file(path: impl AsRef<Path>) -> Result<Self, PowError> {
        let contents = std::fs::read_to_string(path)?;
        let blocks: Vec<SidechainBlock> = serde_json::from_str(&contents)?;
        Ok(blocks.into_iter().collect())
    }
}

impl FromIterator<SidechainBlock> for MemoryHistory {
    fn from_iter<I: IntoIterator<Item = SidechainBlock>>(iter: I) -> Self {
        let mut history = MemoryHistory::new();
        for block in iter {
            history.insert(block);
        }
        history
    }
}

impl HistoryStore for MemoryHistory {
    fn block_by_id(&self, id: &BlockId) -> Option<SidechainBlock> {
        self.blocks.get(id).cloned()
    }
}
