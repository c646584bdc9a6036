/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Definitions for the structured messages exchanged by GRANDPA voters.
//!
//! Nothing in this module produces or checks signatures: signatures are carried as opaque
//! [`SignatureBytes`], and identities as [`VerifyingKeyBytes`].

use std::{collections::HashSet, mem};

use borsh::{BorshDeserialize, BorshSerialize};

use crate::types::{
    authority_list::AuthorityList,
    block::BlockInfo,
    crypto_primitives::{hash, VerifyingKey, VerifyingKeyBytes},
    data_types::{self, BlockNumber, CryptoHash, MembershipCounter, RoundNumber, SignatureBytes},
};

/// A vote for a block, cast in one of the three voting steps of a GRANDPA round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum Vote {
    Prevote(BlockInfo),
    Precommit(BlockInfo),
    PrimaryPropose(BlockInfo),
}

impl Vote {
    /// Get the block voted for.
    pub fn block_info(&self) -> BlockInfo {
        match self {
            Vote::Prevote(block) | Vote::Precommit(block) | Vote::PrimaryPropose(block) => *block,
        }
    }

    pub fn is_prevote(&self) -> bool {
        matches!(self, Vote::Prevote(_))
    }

    pub fn is_precommit(&self) -> bool {
        matches!(self, Vote::Precommit(_))
    }

    pub fn is_primary_propose(&self) -> bool {
        matches!(self, Vote::PrimaryPropose(_))
    }

    /// Check whether `self` and `other` were cast in the same voting step.
    pub fn same_kind(&self, other: &Vote) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }

    /// Compute the digest that a voter signs over when casting this vote in `round` under the
    /// authority set identified by `counter`.
    pub fn digest(
        &self,
        round: RoundNumber,
        counter: MembershipCounter,
    ) -> Result<CryptoHash, std::io::Error> {
        Ok(hash(&(*self, round, counter).try_to_vec()?))
    }
}

/// A [`Vote`] together with the signature and identity of the voter that cast it.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct SignedMessage {
    pub message: Vote,
    pub signature: SignatureBytes,
    pub id: VerifyingKeyBytes,
}

impl SignedMessage {
    pub fn block_number(&self) -> BlockNumber {
        self.message.block_info().number
    }

    pub fn block_hash(&self) -> CryptoHash {
        self.message.block_info().hash
    }

    pub fn block_info(&self) -> BlockInfo {
        self.message.block_info()
    }

    pub fn is_prevote(&self) -> bool {
        self.message.is_prevote()
    }

    pub fn is_precommit(&self) -> bool {
        self.message.is_precommit()
    }

    pub fn is_primary_propose(&self) -> bool {
        self.message.is_primary_propose()
    }
}

/// Proof that the voter identified by `id` cast two different votes in the same step of `round`.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Equivocation {
    pub round: RoundNumber,
    pub id: VerifyingKeyBytes,
    pub first: SignedMessage,
    pub second: SignedMessage,
}

impl Equivocation {
    /// Check that the two votes were both cast by `id`, in the same voting step, for different
    /// blocks.
    ///
    /// This is a structural check only: the signatures on the two votes are not verified.
    pub fn is_well_formed(&self) -> bool {
        self.first.id == self.id
            && self.second.id == self.id
            && self.first.message.same_kind(&self.second.message)
            && self.first.block_info() != self.second.block_info()
    }

    /// Get the index of the equivocator in `authorities`, if it is a member.
    pub fn equivocator_index(&self, authorities: &AuthorityList) -> Option<usize> {
        let id = VerifyingKey::from_bytes(&self.id).ok()?;
        authorities.position(&id)
    }
}

/// A precommit, as carried inside a [`GrandpaJustification`].
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct SignedPrecommit {
    pub precommit: BlockInfo,
    pub signature: SignatureBytes,
    pub id: VerifyingKeyBytes,
}

impl From<SignedPrecommit> for SignedMessage {
    fn from(value: SignedPrecommit) -> Self {
        SignedMessage {
            message: Vote::Precommit(value.precommit),
            signature: value.signature,
            id: value.id,
        }
    }
}

/// A set of precommits that justifies the finalization of `block_info` in `round_number`.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct GrandpaJustification {
    pub round_number: RoundNumber,
    pub block_info: BlockInfo,
    pub items: Vec<SignedPrecommit>,
}

impl GrandpaJustification {
    /// Sum up the weights of the distinct, enabled members of `authorities` that contributed a
    /// precommit to this justification.
    pub fn precommit_weight(&self, authorities: &AuthorityList) -> data_types::TotalWeight {
        let mut seen = HashSet::new();
        let mut weight = data_types::TotalWeight::new(0);
        for item in &self.items {
            if !seen.insert(item.id) {
                continue;
            }
            let index = match VerifyingKey::from_bytes(&item.id)
                .ok()
                .and_then(|id| authorities.position(&id))
            {
                Some(index) if !authorities.is_disabled(index) => index,
                _ => continue,
            };
            if let Some(authority) = authorities.get(index) {
                weight += authority.weight;
            }
        }
        weight
    }

    /// Check whether the precommits in this justification add up to a quorum of `authorities`.
    pub fn has_quorum(&self, authorities: &AuthorityList) -> bool {
        self.precommit_weight(authorities) >= authorities.quorum()
    }
}

/// An aggregate of precommits for `vote`.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Commit {
    pub vote: BlockInfo,
    pub justification: GrandpaJustification,
}

/// A vote as gossiped between voters: prevote, precommit, or primary propose.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct VoteMessage {
    pub round_number: RoundNumber,
    pub counter: MembershipCounter,
    pub vote: SignedMessage,
}

impl VoteMessage {
    pub fn id(&self) -> VerifyingKeyBytes {
        self.vote.id
    }
}

/// Message announcing that `vote` was finalized in `round_number`.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Fin {
    pub round_number: RoundNumber,
    pub vote: BlockInfo,
    pub justification: GrandpaJustification,
}

/// Weights accumulated in the two voting steps of a round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct TotalWeight {
    pub prevote: data_types::TotalWeight,
    pub precommit: data_types::TotalWeight,
}
