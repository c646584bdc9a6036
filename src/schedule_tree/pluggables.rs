/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Traits for the external collaborators of the schedule tree: block ancestry and pluggable
//! persistence.

use std::fmt::{self, Display};

use borsh::BorshDeserialize;

use crate::types::block::BlockInfo;

use super::{
    snapshot::ScheduleTreeBytes,
    tree::ScheduleTree,
    variables,
};

/// Answers questions about how blocks in the fork tree relate to each other.
///
/// Implemented by the host's block tree service. The schedule tree never stores blocks itself; it
/// only remembers the blocks that signals were anchored at, and asks the oracle whenever it needs to
/// know whether one of them lies on the branch of another.
pub trait BlockAncestry: Send + Sync {
    /// Check whether `ancestor` is a strict ancestor of `descendant` along the canonical chain that
    /// leads to `descendant`.
    ///
    /// Must return `false` when `ancestor == descendant`.
    fn is_direct_ancestor(&self, ancestor: &BlockInfo, descendant: &BlockInfo) -> bool;
}

/// A key-value store with atomic, batched writes, into which the schedule tree is persisted.
pub trait KVStore: KVGet + Send + 'static {
    type WriteBatch: WriteBatch;

    fn write(&mut self, wb: Self::WriteBatch) -> Result<(), KVWriteError>;
}

pub trait KVGet {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;

    /* ↓↓↓ Schedule Tree ↓↓↓ */

    fn schedule_tree(&self) -> Result<Option<ScheduleTree>, KVGetError> {
        let bytes = match self.get(&variables::SCHEDULE_TREE) {
            None => return Ok(None),
            Some(bytes) => bytes,
        };

        let schedule_tree_bytes =
            ScheduleTreeBytes::deserialize(&mut bytes.as_slice()).map_err(|err| {
                KVGetError::DeserializeValueError {
                    key: Key::ScheduleTree,
                    source: err,
                }
            })?;

        ScheduleTree::try_from(schedule_tree_bytes).map(Some)
    }
}

pub trait WriteBatch {
    fn new() -> Self;
    fn set(&mut self, key: &[u8], value: &[u8]);
}

/// Error when trying to read a value corresponding to a given key from the [key value store][KVStore].
/// The error may arise in the following circumstances:
/// 1. The value corresponding to a given key cannot be deserialized into its expected type,
/// 2. The value deserialized, but does not describe a well-formed value of its type,
/// 3. There was an error when processing Ed25519Dalek verifying keys.
#[derive(Debug)]
pub enum KVGetError {
    DeserializeValueError {
        key: Key,
        source: std::io::Error,
    },
    MalformedValue {
        key: Key,
        reason: &'static str,
    },
    Ed25519DalekError {
        key: Key,
        source: ed25519_dalek::SignatureError,
    },
}

impl Display for KVGetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KVGetError::DeserializeValueError { key, source } => {
                write!(f, "cannot deserialize {}: {}", key, source)
            }
            KVGetError::MalformedValue { key, reason } => {
                write!(f, "malformed {}: {}", key, reason)
            }
            KVGetError::Ed25519DalekError { key, source } => {
                write!(f, "invalid verifying key in {}: {}", key, source)
            }
        }
    }
}

/// Error when writing a key-value pair to a [write batch][WriteBatch]. The error may arise when the
/// value cannot be serialized, and hence cannot be written to the write batch.
#[derive(Debug)]
pub enum KVSetError {
    SerializeValueError { key: Key, source: std::io::Error },
}

impl Display for KVSetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KVSetError::SerializeValueError { key, source } => {
                write!(f, "cannot serialize {}: {}", key, source)
            }
        }
    }
}

/// Error returned by a [`KVStore`] that failed to durably apply a write batch.
#[derive(Debug)]
pub struct KVWriteError {
    pub reason: String,
}

impl KVWriteError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Display for KVWriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "write batch failed: {}", self.reason)
    }
}

#[derive(Debug)]
pub enum Key {
    ScheduleTree,
}

impl Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self {
            &Key::ScheduleTree => write!(f, "Schedule Tree"),
        }
    }
}
