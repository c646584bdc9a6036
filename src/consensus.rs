/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Consensus digests that carry authority set signals.
//!
//! Block headers carry digest items tagged with the [`ConsensusEngineId`] of the engine that emitted
//! them. Only digests tagged with one of the [`KNOWN_ENGINES`] are interpreted by the
//! [authority manager](crate::authority_manager::AuthorityManager); everything else is ignored.
//!
//! The payload of a known digest is a Borsh-serialized [`ConsensusMessage`]. Every message that takes
//! effect later than the block that carries it expresses *when* as a `delay`, counted in blocks from
//! the carrying block: a message with delay `d` carried by block `#n` activates at block `#n + d`.

use std::fmt::{self, Display, Formatter};

use borsh::{BorshDeserialize, BorshSerialize};

use crate::types::{
    authority_list::AuthorityList,
    crypto_primitives::{SignatureError, VerifyingKey, VerifyingKeyBytes},
    data_types::{BlockNumber, Weight},
};

/// Four-byte tag identifying the consensus engine that emitted a digest item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, BorshSerialize, BorshDeserialize)]
pub struct ConsensusEngineId([u8; 4]);

impl ConsensusEngineId {
    /// Create a new `ConsensusEngineId` wrapping `bytes`.
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Get the inner `[u8; 4]` of this `ConsensusEngineId`.
    pub const fn bytes(&self) -> [u8; 4] {
        self.0
    }

    /// Check whether digests tagged with this id are interpreted by the authority manager.
    pub fn is_known(&self) -> bool {
        KNOWN_ENGINES.contains(self)
    }
}

impl Display for ConsensusEngineId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

pub const BABE_ENGINE_ID: ConsensusEngineId = ConsensusEngineId(*b"BABE");
pub const GRANDPA_ENGINE_ID: ConsensusEngineId = ConsensusEngineId(*b"FRNK");

/// Engines whose digests carry authority set signals.
pub const KNOWN_ENGINES: [ConsensusEngineId; 2] = [BABE_ENGINE_ID, GRANDPA_ENGINE_ID];

/// Authorities as carried in a digest: identities and weights, in signal order. A digest never
/// carries disabled flags, since a replaced set starts with every authority enabled.
pub type DigestAuthorities = Vec<(VerifyingKeyBytes, Weight)>;

/// Decode the authorities carried in a digest into an [`AuthorityList`].
pub fn decode_authorities(
    authorities: &[(VerifyingKeyBytes, Weight)],
) -> Result<AuthorityList, SignatureError> {
    authorities
        .iter()
        .map(|(id_bytes, weight)| VerifyingKey::from_bytes(id_bytes).map(|id| (id, *weight)))
        .collect()
}

/// Encode `authorities` for a digest, dropping disabled flags.
pub fn encode_authorities(authorities: &AuthorityList) -> DigestAuthorities {
    authorities
        .iter()
        .map(|authority| (authority.id.to_bytes(), authority.weight))
        .collect()
}

/// An authority set signal as carried in a block header digest.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum ConsensusMessage {
    /// Replace the authority set `delay` blocks after the carrying block.
    ScheduledChange {
        authorities: DigestAuthorities,
        delay: u64,
    },

    /// Replace the authority set `delay` blocks after the carrying block, overriding pending
    /// scheduled changes.
    ForcedChange {
        authorities: DigestAuthorities,
        delay: u64,
    },

    /// Disable the authority at `authority_index`, starting at the carrying block.
    OnDisabled { authority_index: u64 },

    /// Pause finality `delay` blocks after the carrying block.
    Pause { delay: u64 },

    /// Resume finality `delay` blocks after the carrying block.
    Resume { delay: u64 },
}

impl ConsensusMessage {
    /// Decode the payload of a digest item tagged with `engine_id`.
    ///
    /// Returns `Ok(None)` without looking at `payload` if `engine_id` is not one of the
    /// [`KNOWN_ENGINES`].
    pub fn from_digest(
        engine_id: &ConsensusEngineId,
        payload: &[u8],
    ) -> Result<Option<Self>, std::io::Error> {
        if !engine_id.is_known() {
            return Ok(None);
        }
        ConsensusMessage::try_from_slice(payload).map(Some)
    }

    /// Get the block number at which this message takes effect if carried by block `carried_by`.
    pub fn activate_at(&self, carried_by: BlockNumber) -> BlockNumber {
        match self {
            ConsensusMessage::ScheduledChange { delay, .. }
            | ConsensusMessage::ForcedChange { delay, .. }
            | ConsensusMessage::Pause { delay }
            | ConsensusMessage::Resume { delay } => carried_by + *delay,
            ConsensusMessage::OnDisabled { .. } => carried_by,
        }
    }
}
