/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Types that store information about authority sets.

use std::{collections::BTreeSet, slice};

use borsh::{BorshDeserialize, BorshSerialize};

use super::{
    crypto_primitives::{SignatureError, VerifyingKey, VerifyingKeyBytes},
    data_types::{TotalWeight, Weight},
};

/// A single authority: an identity entitled to vote in finality, and the weight of its votes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Authority {
    pub id: VerifyingKey,
    pub weight: Weight,
}

impl Authority {
    /// Create a new `Authority`.
    pub fn new(id: VerifyingKey, weight: Weight) -> Self {
        Self { id, weight }
    }
}

/// Stores the identities of authorities and their voting weights.
///
/// ## Ordering of authorities
///
/// Unlike a set, `AuthorityList` keeps authorities in exactly the order in which they were
/// signaled on chain. Indices into this order are meaningful: disable signals and equivocation
/// reports refer to authorities by index.
///
/// ## Disabled authorities
///
/// An authority may be disabled after it misbehaved. A disabled authority keeps its index and stays a
/// member of the list, but its weight no longer counts towards [`total_weight`](Self::total_weight)
/// or [`quorum`](Self::quorum). Replacing the list (through a scheduled or forced change) clears
/// every disabled flag.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthorityList {
    authorities: Vec<Authority>,
    disabled: BTreeSet<usize>,
}

impl AuthorityList {
    /// Create an empty authority list.
    pub fn new() -> AuthorityList {
        Self {
            authorities: Vec::new(),
            disabled: BTreeSet::new(),
        }
    }

    /// Append `id` with the specified `weight` to the end of the list.
    ///
    /// If `id` is already in the list, this function updates its weight in place instead.
    pub fn push(&mut self, id: VerifyingKey, weight: Weight) {
        match self.position(&id) {
            Some(pos) => self.authorities[pos].weight = weight,
            None => self.authorities.push(Authority::new(id, weight)),
        }
    }

    /// Get the authority at `index`, if `index` is in range.
    pub fn get(&self, index: usize) -> Option<&Authority> {
        self.authorities.get(index)
    }

    /// Get the index of the authority identified by `id`, if it is in the list.
    pub fn position(&self, id: &VerifyingKey) -> Option<usize> {
        self.authorities.iter().position(|authority| &authority.id == id)
    }

    /// Check whether the list contains `id`.
    pub fn contains(&self, id: &VerifyingKey) -> bool {
        self.position(id).is_some()
    }

    /// Get the number of authorities in the list, disabled ones included.
    pub fn len(&self) -> usize {
        self.authorities.len()
    }

    /// Check whether the list is empty (i.e., `self.len() == 0`).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get an iterator through the authorities, in signal order.
    pub fn iter(&self) -> slice::Iter<Authority> {
        self.authorities.iter()
    }

    /// Mark the authority at `index` as disabled. Returns `false` if `index` is out of range.
    pub fn disable(&mut self, index: usize) -> bool {
        if index < self.len() {
            self.disabled.insert(index);
            true
        } else {
            false
        }
    }

    /// Check whether the authority at `index` has been disabled.
    pub fn is_disabled(&self, index: usize) -> bool {
        self.disabled.contains(&index)
    }

    /// Get an iterator over the indices of disabled authorities, in ascending order.
    pub fn disabled(&self) -> impl Iterator<Item = usize> + '_ {
        self.disabled.iter().copied()
    }

    /// Get a copy of the list with every authority enabled.
    pub fn without_disabled(&self) -> AuthorityList {
        Self {
            authorities: self.authorities.clone(),
            disabled: BTreeSet::new(),
        }
    }

    /// Get the sum of the weights of all of the enabled authorities in the list.
    pub fn total_weight(&self) -> TotalWeight {
        let mut total_weight = TotalWeight::new(0);
        for (index, authority) in self.authorities.iter().enumerate() {
            if !self.is_disabled(index) {
                total_weight += authority.weight
            }
        }
        total_weight
    }

    /// Compute the total weight that a set of votes must match or exceed (`>=`) in order to count as
    /// a supermajority under this list.
    pub fn quorum(&self) -> TotalWeight {
        TotalWeight::new(self.total_weight().int() * 2 / 3 + 1)
    }
}

impl FromIterator<(VerifyingKey, Weight)> for AuthorityList {
    fn from_iter<T: IntoIterator<Item = (VerifyingKey, Weight)>>(iter: T) -> Self {
        let mut list = AuthorityList::new();
        for (id, weight) in iter {
            list.push(id, weight);
        }
        list
    }
}

/// Intermediate representation of [`AuthorityList`] for safe serialization and deserialization.
///
/// To serialize an instance of `AuthorityList`, convert it into an `AuthorityListBytes` using the
/// former type's implementation of `Into<AuthorityListBytes>`, then serialize the
/// `AuthorityListBytes` using Borsh. Reverse the steps to deserialize an `AuthorityList`.
///
/// ## Rationale
///
/// [`ed25519_dalek::VerifyingKey`] does not implement the Borsh traits. This type replaces it with
/// `VerifyingKeyBytes`, and so is straightforward to serialize and deserialize. However, instances
/// of this type are not guaranteed to contain valid Ed25519 verifying keys, and therefore
/// conversion from this type into `AuthorityList` using `TryFrom` is fallible.
#[derive(Clone, Debug, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct AuthorityListBytes {
    pub authorities: Vec<(VerifyingKeyBytes, Weight)>,
    pub disabled: Vec<u64>,
}

impl TryFrom<AuthorityListBytes> for AuthorityList {
    type Error = SignatureError;

    fn try_from(value: AuthorityListBytes) -> Result<Self, Self::Error> {
        let authorities = value
            .authorities
            .iter()
            .map(|(id_bytes, weight)| {
                VerifyingKey::from_bytes(id_bytes).map(|id| Authority::new(id, *weight))
            })
            .collect::<Result<Vec<Authority>, Self::Error>>()?;

        let disabled = value
            .disabled
            .iter()
            .map(|index| *index as usize)
            .filter(|index| *index < authorities.len())
            .collect();

        Ok(Self {
            authorities,
            disabled,
        })
    }
}

impl From<&AuthorityList> for AuthorityListBytes {
    fn from(list: &AuthorityList) -> Self {
        AuthorityListBytes {
            authorities: list
                .iter()
                .map(|authority| (authority.id.to_bytes(), authority.weight))
                .collect(),
            disabled: list.disabled().map(|index| index as u64).collect(),
        }
    }
}
