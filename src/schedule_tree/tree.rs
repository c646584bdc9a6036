/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! The [`ScheduleTree`] arena and the algorithms that query, grow, and prune it.

use std::{collections::HashSet, fmt, iter::successors, ops::Index};

use crate::types::{authority_list::AuthorityList, block::BlockInfo};

use super::{
    node::{NodeIndex, ScheduleNode},
    pending::{effective_signals, fold, AuthoritySetState, PendingAction, Signal},
    pluggables::BlockAncestry,
};

/// Versioned authority set state laid over the fork tree.
///
/// ## Arena
///
/// Nodes live in a single `Vec` and refer to each other through [`NodeIndex`] handles: each node
/// stores its parent's handle and its children's handles. The root always sits at
/// [`ScheduleTree::ROOT`]. Pruning rebuilds the arena, so handles must not be held across a call to
/// [`prune`](Self::prune).
///
/// ## Cached states
///
/// Every node caches the authority set state in effect at its own block (`current_authorities` and
/// `enabled`). Signals whose activation lies beyond a node's block are only folded in when some
/// query asks about a later block (see [`materialize`](Self::materialize)).
#[derive(Clone)]
pub struct ScheduleTree {
    nodes: Vec<ScheduleNode>,
}

/// Where a signal ended up after [`insert_signal`](ScheduleTree::insert_signal).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignalInsertion {
    /// The node the signal was appended to.
    pub node: NodeIndex,

    /// If a node had to be created for the signal, the block of the node it was created under.
    pub created_under: Option<BlockInfo>,
}

impl ScheduleTree {
    /// Handle of the root node.
    pub const ROOT: NodeIndex = NodeIndex(0);

    /// Create a tree that contains only a root anchored at `genesis`, with `authorities` in effect and
    /// finality enabled.
    pub fn new(genesis: BlockInfo, authorities: AuthorityList) -> Self {
        let root = ScheduleNode::new(genesis, None, AuthoritySetState::new(authorities, true));
        Self { nodes: vec![root] }
    }

    /// Create a tree directly from an arena whose well-formedness the caller has already checked.
    pub(crate) fn from_nodes(nodes: Vec<ScheduleNode>) -> Self {
        Self { nodes }
    }

    /// Get the root node.
    pub fn root(&self) -> &ScheduleNode {
        &self.nodes[Self::ROOT.0]
    }

    /// Get the number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate through every node and its handle, in arena order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &ScheduleNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeIndex(i), node))
    }

    /// Get the handles of the nodes from the root down to `node`, both included.
    pub(crate) fn path(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let mut path: Vec<NodeIndex> = successors(Some(node), |n| self[*n].parent).collect();
        path.reverse();
        path
    }

    /// Get every signal stored on the path from the root down to `node`, in signal order.
    fn path_signals(&self, node: NodeIndex) -> Vec<&Signal> {
        self.path(node)
            .into_iter()
            .flat_map(|n| self[n].pending.iter())
            .collect()
    }

    /// Find the node whose block is the closest ancestor-or-self of `block`.
    ///
    /// The search descends from the root, at every step moving into the one child (children are
    /// mutually exclusive forks) whose block is an ancestor-or-self of `block`, and stops when no
    /// such child exists.
    ///
    /// # Errors
    ///
    /// [`UnknownBlock`](ScheduleTreeError::UnknownBlock) if `block` is neither the root's block nor a
    /// descendant of it. This includes blocks that were pruned, blocks on forks abandoned by
    /// finalization, and blocks older than the root.
    pub fn find_ancestor<A: BlockAncestry + ?Sized>(
        &self,
        ancestry: &A,
        block: &BlockInfo,
    ) -> Result<NodeIndex, ScheduleTreeError> {
        if !is_ancestor_or_self(ancestry, &self.root().block, block) {
            return Err(ScheduleTreeError::UnknownBlock { block: *block });
        }

        let mut current = Self::ROOT;
        while let Some(&child) = self[current].children.iter().find(|&&child| {
            let child_block = &self[child].block;
            child_block.number <= block.number && is_ancestor_or_self(ancestry, child_block, block)
        }) {
            current = child;
        }

        Ok(current)
    }

    /// Compute the authority list in effect at `at`, a block on the branch of `node` that is no older
    /// than `node`'s block.
    ///
    /// See [`materialize_state`](Self::materialize_state).
    pub fn materialize(&self, node: NodeIndex, at: &BlockInfo) -> AuthorityList {
        self.materialize_state(node, at).authorities
    }

    /// Compute the authority set state in effect at `at`, a block on the branch of `node` that is no
    /// older than `node`'s block.
    ///
    /// Starting from `node`'s cached state, folds in every effective signal on the path from the root
    /// whose activation lies after `node`'s block and no later than `at`. Does not mutate the tree.
    pub fn materialize_state(&self, node: NodeIndex, at: &BlockInfo) -> AuthoritySetState {
        let anchor = &self[node];
        let mut state = anchor.state();
        fold(
            &mut state,
            &self.path_signals(node),
            anchor.block.number,
            at.number,
        );
        state
    }

    /// Append a signal for `action`, signaled by `block`, to the node anchored at `block`, creating
    /// that node first if it does not exist yet.
    ///
    /// A newly created node is attached under [`find_ancestor(block)`](Self::find_ancestor), and adopts
    /// every existing child of that ancestor that descends from `block`. The cached states of the
    /// affected node and all its descendants are recomputed afterwards.
    pub fn insert_signal<A: BlockAncestry + ?Sized>(
        &mut self,
        ancestry: &A,
        block: &BlockInfo,
        action: PendingAction,
    ) -> Result<SignalInsertion, ScheduleTreeError> {
        let ancestor = self.find_ancestor(ancestry, block)?;

        let (node, created_under) = if self[ancestor].block == *block {
            (ancestor, None)
        } else {
            let node = self.insert_node(ancestry, ancestor, *block);
            (node, Some(self[ancestor].block))
        };

        let signal = Signal::new(block.number, action);
        if node == Self::ROOT && signal.activation() <= self.root().block.number {
            // Nothing above the root to recompute its cache from, so apply in place.
            let mut state = self.root().state();
            state.apply(&signal.action);
            self.nodes[Self::ROOT.0].set_state(state);
        } else {
            self.nodes[node.0].pending.push(signal);
        }

        self.refresh(node);

        Ok(SignalInsertion {
            node,
            created_under,
        })
    }

    /// Create a node anchored at `block` under `parent`, moving `parent`'s children that descend from
    /// `block` under the new node.
    fn insert_node<A: BlockAncestry + ?Sized>(
        &mut self,
        ancestry: &A,
        parent: NodeIndex,
        block: BlockInfo,
    ) -> NodeIndex {
        let index = NodeIndex(self.nodes.len());

        let (adopted, kept): (Vec<NodeIndex>, Vec<NodeIndex>) = self[parent]
            .children
            .iter()
            .partition(|&&child| ancestry.is_direct_ancestor(&block, &self[child].block));

        for child in &adopted {
            self.nodes[child.0].parent = Some(index);
        }

        let mut node = ScheduleNode::new(block, Some(parent), self[parent].state());
        node.children = adopted;
        self.nodes.push(node);

        let parent_node = &mut self.nodes[parent.0];
        parent_node.children = kept;
        parent_node.children.push(index);

        index
    }

    /// Recompute the cached states of `from` and every node below it, parents before children.
    fn refresh(&mut self, from: NodeIndex) {
        let mut stack = vec![from];
        while let Some(node) = stack.pop() {
            if let Some(parent) = self[node].parent {
                let parent_node = &self[parent];
                let mut state = parent_node.state();
                fold(
                    &mut state,
                    &self.path_signals(node),
                    parent_node.block.number,
                    self[node].block.number,
                );
                self.nodes[node.0].set_state(state);
            }
            stack.extend(self[node].children.iter().copied());
        }
    }

    /// Re-anchor the root at `new_root`, discarding every node that is not `new_root` or one of its
    /// descendants. Returns the blocks of the discarded nodes.
    ///
    /// If no node is anchored exactly at `new_root`, a new root node is created there, with the state
    /// in effect at `new_root`. Either way, every effective signal from the discarded ancestors that
    /// has not activated by `new_root` is carried into the new root, so that it still takes effect on
    /// the surviving branches.
    ///
    /// Pruning at the current root is a no-op.
    ///
    /// # Errors
    ///
    /// [`UnknownBlock`](ScheduleTreeError::UnknownBlock) if `new_root` is not reachable from the root.
    pub fn prune<A: BlockAncestry + ?Sized>(
        &mut self,
        ancestry: &A,
        new_root: &BlockInfo,
    ) -> Result<Vec<BlockInfo>, ScheduleTreeError> {
        let target = self.find_ancestor(ancestry, new_root)?;
        if target == Self::ROOT && self.root().block == *new_root {
            return Ok(Vec::new());
        }

        let state = self.materialize_state(target, new_root);
        let carried: Vec<Signal> = effective_signals(&self.path_signals(target))
            .into_iter()
            .filter(|signal| signal.activation() > new_root.number)
            .cloned()
            .collect();

        let target_is_new_root = self[target].block == *new_root;
        let surviving_children: Vec<NodeIndex> = if target_is_new_root {
            self[target].children.clone()
        } else {
            self[target]
                .children
                .iter()
                .copied()
                .filter(|&child| ancestry.is_direct_ancestor(new_root, &self[child].block))
                .collect()
        };

        let mut root = ScheduleNode::new(*new_root, None, state);
        root.pending = carried;
        let mut nodes = vec![root];

        let mut kept = HashSet::new();
        if target_is_new_root {
            kept.insert(target);
        }
        let mut queue: Vec<(NodeIndex, NodeIndex)> = surviving_children
            .into_iter()
            .map(|child| (child, Self::ROOT))
            .collect();
        while let Some((old, new_parent)) = queue.pop() {
            kept.insert(old);
            let new_index = NodeIndex(nodes.len());
            let mut node = self[old].clone();
            node.parent = Some(new_parent);
            node.children = Vec::new();
            nodes.push(node);
            nodes[new_parent.0].children.push(new_index);
            queue.extend(self[old].children.iter().map(|&child| (child, new_index)));
        }

        let pruned = self
            .iter()
            .filter(|(index, _)| !kept.contains(index))
            .map(|(_, node)| node.block)
            .collect();

        self.nodes = nodes;
        Ok(pruned)
    }
}

impl Index<NodeIndex> for ScheduleTree {
    type Output = ScheduleNode;

    fn index(&self, index: NodeIndex) -> &Self::Output {
        &self.nodes[index.0]
    }
}

fn is_ancestor_or_self<A: BlockAncestry + ?Sized>(
    ancestry: &A,
    ancestor: &BlockInfo,
    descendant: &BlockInfo,
) -> bool {
    ancestor == descendant || ancestry.is_direct_ancestor(ancestor, descendant)
}

/// Errors that may be encountered when querying or mutating a [`ScheduleTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleTreeError {
    /// The block is not the root's block or one of its descendants.
    UnknownBlock { block: BlockInfo },
}

impl fmt::Display for ScheduleTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleTreeError::UnknownBlock { block } => {
                write!(f, "block {} is not tracked by the schedule tree", block)
            }
        }
    }
}
