/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! The fork-aware record of which authority set is in effect at which block.
//!
//! # The Schedule Tree
//!
//! Authority set changes are signaled by blocks, but blocks are only final once GRANDPA finalizes
//! them. Until then, competing forks may signal conflicting changes, and the authority set in effect
//! at a block depends on which branch the block is on.
//!
//! The schedule tree mirrors the shape of the block tree, but only contains the blocks that signaled
//! something (plus the last finalized block, which is always the root). Each
//! [node](node::ScheduleNode) stores:
//! 1. The **block** it is anchored at.
//! 2. The **authority set state** in effect at that block: the authority list (including which
//!   authorities are disabled) and whether finality is enabled.
//! 3. The **pending signals** anchored at that block, which take effect at the block itself or at
//!   some later block on the same branch.
//!
//! The authority set state at an arbitrary block is computed by finding the closest node on the
//! block's branch ([`find_ancestor`](tree::ScheduleTree::find_ancestor)) and folding in every pending
//! signal on the path from the root that activates by the block
//! ([`materialize`](tree::ScheduleTree::materialize)). The rules that decide which signals take
//! effect are in [`pending`].
//!
//! # Finalization
//!
//! When a block is finalized, the tree is [pruned](tree::ScheduleTree::prune) so that the finalized
//! block becomes the root, and forks that do not contain it are discarded.
//!
//! # Pluggable persistence
//!
//! - The tree is kept in persistent storage as a single snapshot.
//! - Library users choose the storage: anything that implements the abstract functionality of a
//!   key-value store with atomic, batched writes, as defined in [`pluggables`], can be used.
//! - The layout of what is stored is documented in [`variables`].
//! - Block relationships are likewise provided by the user, through
//!   [`BlockAncestry`](pluggables::BlockAncestry).

pub mod node;

pub mod pending;

pub mod pluggables;

pub mod snapshot;

pub mod tree;

pub mod variables;
