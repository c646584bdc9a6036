/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! The [`BlockInfo`] type and its methods.

use std::fmt::{self, Display, Formatter};

use borsh::{BorshDeserialize, BorshSerialize};

use super::data_types::{BlockNumber, CryptoHash};

/// Reference to a single block in the fork tree.
///
/// `BlockInfo`s are totally ordered by `number` only within one branch. Across branches, two
/// different blocks may share the same number, and only the
/// [ancestry oracle](crate::schedule_tree::pluggables::BlockAncestry) can tell how they relate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, BorshSerialize, BorshDeserialize)]
pub struct BlockInfo {
    pub number: BlockNumber,
    pub hash: CryptoHash,
}

impl BlockInfo {
    /// Create a new `BlockInfo`.
    pub const fn new(number: BlockNumber, hash: CryptoHash) -> Self {
        Self { number, hash }
    }
}

impl Display for BlockInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{} ({})", self.number, self.hash)
    }
}
