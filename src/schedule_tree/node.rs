/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Nodes of the schedule tree and the handles that address them.

use crate::types::{authority_list::AuthorityList, block::BlockInfo};

use super::pending::{AuthoritySetState, Signal};

/// Handle to a node in a [`ScheduleTree`](super::tree::ScheduleTree)'s arena.
///
/// Handles are only stable between two prunes: pruning compacts the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeIndex(pub(crate) usize);

impl NodeIndex {
    /// Get the position of the node in the arena.
    pub const fn int(&self) -> usize {
        self.0
    }
}

/// One version of the authority set state, anchored at a specific block.
#[derive(Clone, Debug)]
pub struct ScheduleNode {
    pub(crate) block: BlockInfo,
    pub(crate) parent: Option<NodeIndex>,
    pub(crate) children: Vec<NodeIndex>,
    pub(crate) current_authorities: AuthorityList,
    pub(crate) enabled: bool,
    pub(crate) pending: Vec<Signal>,
}

impl ScheduleNode {
    pub(crate) fn new(block: BlockInfo, parent: Option<NodeIndex>, state: AuthoritySetState) -> Self {
        Self {
            block,
            parent,
            children: Vec::new(),
            current_authorities: state.authorities,
            enabled: state.finality_enabled,
            pending: Vec::new(),
        }
    }

    /// Get the block this node is anchored at.
    pub fn block(&self) -> &BlockInfo {
        &self.block
    }

    /// Get the handle of the parent node, or `None` for the root.
    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    /// Get the handles of the child nodes. Children are mutually exclusive forks.
    pub fn children(&self) -> &[NodeIndex] {
        &self.children
    }

    /// Get the authority list in effect at this node's block.
    pub fn current_authorities(&self) -> &AuthorityList {
        &self.current_authorities
    }

    /// Get whether finality is enabled at this node's block.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Get the signals anchored at this node (or carried into it by a prune), in signal order.
    pub fn pending(&self) -> &[Signal] {
        &self.pending
    }

    pub(crate) fn state(&self) -> AuthoritySetState {
        AuthoritySetState::new(self.current_authorities.clone(), self.enabled)
    }

    pub(crate) fn set_state(&mut self, state: AuthoritySetState) {
        self.current_authorities = state.authorities;
        self.enabled = state.finality_enabled;
    }
}
