/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Serializable snapshots of the [`ScheduleTree`], and the write batch that stores them.

use borsh::{BorshDeserialize, BorshSerialize};

use crate::types::{
    authority_list::{AuthorityList, AuthorityListBytes},
    block::BlockInfo,
};

use super::{
    node::{NodeIndex, ScheduleNode},
    pending::{Signal, SignalBytes},
    pluggables::{KVGetError, KVSetError, Key, WriteBatch},
    tree::ScheduleTree,
    variables,
};

/// Intermediate representation of [`ScheduleTree`] for safe serialization and deserialization.
///
/// Children are not stored: they are rebuilt from the parent handles on deserialization.
#[derive(Clone, BorshSerialize, BorshDeserialize)]
pub struct ScheduleTreeBytes {
    pub nodes: Vec<ScheduleNodeBytes>,
}

/// Intermediate representation of [`ScheduleNode`].
#[derive(Clone, BorshSerialize, BorshDeserialize)]
pub struct ScheduleNodeBytes {
    pub block: BlockInfo,
    pub parent: Option<u64>,
    pub current_authorities: AuthorityListBytes,
    pub enabled: bool,
    pub pending: Vec<SignalBytes>,
}

impl From<&ScheduleTree> for ScheduleTreeBytes {
    fn from(tree: &ScheduleTree) -> Self {
        let nodes = tree
            .iter()
            .map(|(_, node)| ScheduleNodeBytes {
                block: node.block,
                parent: node.parent.map(|parent| parent.int() as u64),
                current_authorities: AuthorityListBytes::from(&node.current_authorities),
                enabled: node.enabled,
                pending: node.pending.iter().map(SignalBytes::from).collect(),
            })
            .collect();

        ScheduleTreeBytes { nodes }
    }
}

impl TryFrom<ScheduleTreeBytes> for ScheduleTree {
    type Error = KVGetError;

    fn try_from(value: ScheduleTreeBytes) -> Result<Self, Self::Error> {
        let malformed = |reason| KVGetError::MalformedValue {
            key: Key::ScheduleTree,
            reason,
        };
        let invalid_key = |source| KVGetError::Ed25519DalekError {
            key: Key::ScheduleTree,
            source,
        };

        let len = value.nodes.len();
        if len == 0 {
            return Err(malformed("snapshot has no root"));
        }

        let mut parents = Vec::with_capacity(len);
        for (i, node) in value.nodes.iter().enumerate() {
            let parent = match (i, node.parent) {
                (0, None) => None,
                (0, Some(_)) => return Err(malformed("root has a parent")),
                (_, None) => return Err(malformed("non-root node has no parent")),
                (_, Some(parent)) => match usize::try_from(parent) {
                    Ok(parent) if parent < len && parent != i => Some(parent),
                    _ => return Err(malformed("parent handle out of range")),
                },
            };
            parents.push(parent);
        }

        // Every node must reach the root in fewer than `len` steps.
        for start in 0..len {
            let mut current = start;
            let mut steps = 0;
            while let Some(parent) = parents[current] {
                steps += 1;
                if steps >= len {
                    return Err(malformed("parent handles form a cycle"));
                }
                current = parent;
            }
        }

        let mut nodes = Vec::with_capacity(len);
        for (node_bytes, parent) in value.nodes.into_iter().zip(parents.iter()) {
            let pending = node_bytes
                .pending
                .into_iter()
                .map(Signal::try_from)
                .collect::<Result<Vec<Signal>, _>>()
                .map_err(invalid_key)?;

            nodes.push(ScheduleNode {
                block: node_bytes.block,
                parent: parent.map(NodeIndex),
                children: Vec::new(),
                current_authorities: AuthorityList::try_from(node_bytes.current_authorities)
                    .map_err(invalid_key)?,
                enabled: node_bytes.enabled,
                pending,
            });
        }

        for (child, parent) in parents.into_iter().enumerate() {
            if let Some(parent) = parent {
                nodes[parent].children.push(NodeIndex(child));
            }
        }

        Ok(ScheduleTree::from_nodes(nodes))
    }
}

/// A write batch that knows how to store the schedule tree under its reserved key.
pub struct ScheduleTreeWriteBatch<W: WriteBatch>(pub(crate) W);

impl<W: WriteBatch> ScheduleTreeWriteBatch<W> {
    pub fn new() -> ScheduleTreeWriteBatch<W> {
        ScheduleTreeWriteBatch(W::new())
    }

    /* ↓↓↓ Schedule Tree ↓↓↓ */

    pub fn set_schedule_tree(&mut self, tree: &ScheduleTree) -> Result<(), KVSetError> {
        self.0.set(
            &variables::SCHEDULE_TREE,
            &ScheduleTreeBytes::from(tree)
                .try_to_vec()
                .map_err(|err| KVSetError::SerializeValueError {
                    key: Key::ScheduleTree,
                    source: err,
                })?,
        );
        Ok(())
    }

    /// Get the wrapped write batch, ready to be handed to [`KVStore::write`](super::pluggables::KVStore::write).
    pub fn into_inner(self) -> W {
        self.0
    }
}

impl<W: WriteBatch> Default for ScheduleTreeWriteBatch<W> {
    fn default() -> Self {
        Self::new()
    }
}
