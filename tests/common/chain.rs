//! A mock block tree that answers ancestry questions for the blocks it created.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use finality_authorities::{
    schedule_tree::pluggables::BlockAncestry,
    types::{
        block::BlockInfo,
        crypto_primitives::hash,
        data_types::{BlockNumber, CryptoHash},
    },
};

/// An in-memory fork tree of blocks. Clones share the same blocks.
#[derive(Clone)]
pub(crate) struct MockChain {
    parents: Arc<RwLock<HashMap<CryptoHash, BlockInfo>>>,
    genesis: BlockInfo,
}

impl MockChain {
    /// Create a chain that contains only a genesis block numbered 0.
    pub(crate) fn new() -> MockChain {
        MockChain {
            parents: Arc::new(RwLock::new(HashMap::new())),
            genesis: BlockInfo::new(BlockNumber::new(0), hash(b"genesis")),
        }
    }

    pub(crate) fn genesis(&self) -> BlockInfo {
        self.genesis
    }

    /// Add a child of `parent`. Children of the same parent with different `fork` tags are
    /// different blocks.
    pub(crate) fn add_block(&self, parent: &BlockInfo, fork: u8) -> BlockInfo {
        let mut preimage = parent.hash.bytes().to_vec();
        preimage.push(fork);
        let block = BlockInfo::new(parent.number + 1, hash(&preimage));
        self.parents.write().unwrap().insert(block.hash, *parent);
        block
    }

    /// Add `count` blocks on top of `parent`, one after another, and return them in order.
    pub(crate) fn extend(&self, parent: &BlockInfo, count: u64, fork: u8) -> Vec<BlockInfo> {
        let mut blocks = Vec::new();
        let mut tip = *parent;
        for _ in 0..count {
            tip = self.add_block(&tip, fork);
            blocks.push(tip);
        }
        blocks
    }

    /// Create the main chain: genesis followed by `length` blocks, indexed by block number.
    pub(crate) fn main_chain(&self, length: u64) -> Vec<BlockInfo> {
        let mut blocks = vec![self.genesis];
        blocks.extend(self.extend(&self.genesis, length, 0));
        blocks
    }
}

impl BlockAncestry for MockChain {
    fn is_direct_ancestor(&self, ancestor: &BlockInfo, descendant: &BlockInfo) -> bool {
        let parents = self.parents.read().unwrap();
        let mut current = *descendant;
        while current.number > ancestor.number {
            current = match parents.get(&current.hash) {
                Some(parent) => *parent,
                None => return false,
            };
            if current == *ancestor {
                return true;
            }
        }
        false
    }
}
