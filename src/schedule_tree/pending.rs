/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Pending actions, and the rules that decide which of them take effect and in which order.
//!
//! # Signals
//!
//! Every action is stored inside a [`Signal`] that also remembers the number of the block that
//! signaled it. All of the rules in this module are phrased in terms of signals that lie on a single
//! branch, listed in *signal order*: the order of the nodes on the path from the root, and within a
//! node, the order in which signals were appended.
//!
//! # Cancellation
//!
//! Not every signal on a branch takes effect. [`effective_signals`] drops signals that another
//! signal on the same branch cancelled:
//! - A [`ForcedChange`](PendingAction::ForcedChange) cancels every
//!   [`ScheduledChange`](PendingAction::ScheduledChange) signaled at or before the forced change's
//!   block that had not activated by that block.
//! - A [`Pause`](PendingAction::Pause) cancels an earlier [`Resume`](PendingAction::Resume) (and vice
//!   versa) if the earlier one is still pending at the later one's block, and the later one activates
//!   no later than the earlier one.
//!
//! # Folding
//!
//! [`fold`] applies effective signals onto an [`AuthoritySetState`] in ascending order of activation,
//! breaking ties by signal order.

use borsh::{BorshDeserialize, BorshSerialize};

use crate::types::{
    authority_list::{AuthorityList, AuthorityListBytes},
    crypto_primitives::SignatureError,
    data_types::BlockNumber,
};

/// An on-chain request to change the authority set state, anchored to the block that signaled it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PendingAction {
    /// Replace the authority set at `activate_at`, unless a forced change overrides it first. The
    /// new set starts with every authority enabled.
    ScheduledChange {
        authorities: AuthorityList,
        activate_at: BlockNumber,
    },

    /// Replace the authority set at `activate_at`, overriding scheduled changes that have not
    /// activated yet.
    ForcedChange {
        authorities: AuthorityList,
        activate_at: BlockNumber,
    },

    /// Exclude the authority at `authority_index` from quorum counting, starting immediately at the
    /// signaling block.
    OnDisabled { authority_index: u64 },

    /// Stop finality at `activate_at`.
    Pause { activate_at: BlockNumber },

    /// Restart finality at `activate_at`.
    Resume { activate_at: BlockNumber },
}

impl PendingAction {
    /// Get the name of the action in PascalCase, used for printing.
    pub fn name(&self) -> &'static str {
        match self {
            PendingAction::ScheduledChange { .. } => "ScheduledChange",
            PendingAction::ForcedChange { .. } => "ForcedChange",
            PendingAction::OnDisabled { .. } => "OnDisabled",
            PendingAction::Pause { .. } => "Pause",
            PendingAction::Resume { .. } => "Resume",
        }
    }

    /// Get the explicit activation block number of the action, if it has one.
    ///
    /// `OnDisabled` has none: it activates at the block that signals it.
    pub fn activate_at(&self) -> Option<BlockNumber> {
        match self {
            PendingAction::ScheduledChange { activate_at, .. }
            | PendingAction::ForcedChange { activate_at, .. }
            | PendingAction::Pause { activate_at }
            | PendingAction::Resume { activate_at } => Some(*activate_at),
            PendingAction::OnDisabled { .. } => None,
        }
    }
}

/// A [`PendingAction`] together with the number of the block that signaled it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signal {
    pub signaled_at: BlockNumber,
    pub action: PendingAction,
}

impl Signal {
    /// Create a new `Signal`.
    pub fn new(signaled_at: BlockNumber, action: PendingAction) -> Self {
        Self {
            signaled_at,
            action,
        }
    }

    /// Get the number of the first block at which the signal is in effect.
    pub fn activation(&self) -> BlockNumber {
        self.action.activate_at().unwrap_or(self.signaled_at)
    }

    /// Check whether this signal cancels `other`, another signal on the same branch.
    /// `other_is_earlier` tells whether `other` comes before this signal in signal order.
    fn cancels(&self, other: &Signal, other_is_earlier: bool) -> bool {
        let still_pending = other.activation() > self.signaled_at;
        match (&self.action, &other.action) {
            // Forced changes win ties with scheduled changes signaled at the same block, whatever
            // order the two were appended in.
            (PendingAction::ForcedChange { .. }, PendingAction::ScheduledChange { .. }) => {
                other.signaled_at <= self.signaled_at && still_pending
            }
            (PendingAction::Pause { .. }, PendingAction::Resume { .. })
            | (PendingAction::Resume { .. }, PendingAction::Pause { .. }) => {
                other_is_earlier && still_pending && self.activation() <= other.activation()
            }
            _ => false,
        }
    }
}

/// The authority set and finality flag in effect at some block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthoritySetState {
    pub authorities: AuthorityList,
    pub finality_enabled: bool,
}

impl AuthoritySetState {
    /// Create a new `AuthoritySetState`.
    pub fn new(authorities: AuthorityList, finality_enabled: bool) -> Self {
        Self {
            authorities,
            finality_enabled,
        }
    }

    /// Apply the effect of a single action.
    pub(crate) fn apply(&mut self, action: &PendingAction) {
        match action {
            PendingAction::ScheduledChange { authorities, .. }
            | PendingAction::ForcedChange { authorities, .. } => {
                self.authorities = authorities.without_disabled();
            }
            PendingAction::OnDisabled { authority_index } => {
                if !self.authorities.disable(*authority_index as usize) {
                    log::warn!(
                        "Ignoring disable signal for authority index {}, set has {} authorities",
                        authority_index,
                        self.authorities.len()
                    );
                }
            }
            PendingAction::Pause { .. } => self.finality_enabled = false,
            PendingAction::Resume { .. } => self.finality_enabled = true,
        }
    }
}

/// Filter `signals` (given in signal order) down to those that no other signal cancelled, keeping
/// signal order.
pub fn effective_signals<'a>(signals: &[&'a Signal]) -> Vec<&'a Signal> {
    signals
        .iter()
        .enumerate()
        .filter(|&(i, signal)| {
            !signals
                .iter()
                .enumerate()
                .any(|(j, other)| j != i && other.cancels(signal, i < j))
        })
        .map(|(_, signal)| *signal)
        .collect()
}

/// Apply every effective signal in `signals` whose activation lies in `(after, up_to]` onto `state`.
///
/// `signals` must be in signal order, and must be every signal on the branch, not only those inside
/// the window, so that cancellations are decided correctly.
pub fn fold(
    state: &mut AuthoritySetState,
    signals: &[&Signal],
    after: BlockNumber,
    up_to: BlockNumber,
) {
    let mut in_window: Vec<&Signal> = effective_signals(signals)
        .into_iter()
        .filter(|signal| signal.activation() > after && signal.activation() <= up_to)
        .collect();

    // Stable, so ties keep signal order.
    in_window.sort_by_key(|signal| signal.activation());

    for signal in in_window {
        state.apply(&signal.action);
    }
}

/// Intermediate representation of [`Signal`] for safe serialization and deserialization.
///
/// ## Rationale
///
/// See the [related section](crate::types::authority_list::AuthorityListBytes#rationale) about
/// `AuthorityListBytes`.
#[derive(Clone, BorshSerialize, BorshDeserialize)]
pub struct SignalBytes {
    pub signaled_at: BlockNumber,
    pub action: PendingActionBytes,
}

/// Intermediate representation of [`PendingAction`] for safe serialization and deserialization.
#[derive(Clone, BorshSerialize, BorshDeserialize)]
pub enum PendingActionBytes {
    ScheduledChange {
        authorities: AuthorityListBytes,
        activate_at: BlockNumber,
    },
    ForcedChange {
        authorities: AuthorityListBytes,
        activate_at: BlockNumber,
    },
    OnDisabled {
        authority_index: u64,
    },
    Pause {
        activate_at: BlockNumber,
    },
    Resume {
        activate_at: BlockNumber,
    },
}

impl TryFrom<SignalBytes> for Signal {
    type Error = SignatureError;

    fn try_from(value: SignalBytes) -> Result<Self, Self::Error> {
        let action = match value.action {
            PendingActionBytes::ScheduledChange {
                authorities,
                activate_at,
            } => PendingAction::ScheduledChange {
                authorities: AuthorityList::try_from(authorities)?,
                activate_at,
            },
            PendingActionBytes::ForcedChange {
                authorities,
                activate_at,
            } => PendingAction::ForcedChange {
                authorities: AuthorityList::try_from(authorities)?,
                activate_at,
            },
            PendingActionBytes::OnDisabled { authority_index } => {
                PendingAction::OnDisabled { authority_index }
            }
            PendingActionBytes::Pause { activate_at } => PendingAction::Pause { activate_at },
            PendingActionBytes::Resume { activate_at } => PendingAction::Resume { activate_at },
        };
        Ok(Signal::new(value.signaled_at, action))
    }
}

impl From<&Signal> for SignalBytes {
    fn from(signal: &Signal) -> Self {
        let action = match &signal.action {
            PendingAction::ScheduledChange {
                authorities,
                activate_at,
            } => PendingActionBytes::ScheduledChange {
                authorities: authorities.into(),
                activate_at: *activate_at,
            },
            PendingAction::ForcedChange {
                authorities,
                activate_at,
            } => PendingActionBytes::ForcedChange {
                authorities: authorities.into(),
                activate_at: *activate_at,
            },
            PendingAction::OnDisabled { authority_index } => PendingActionBytes::OnDisabled {
                authority_index: *authority_index,
            },
            PendingAction::Pause { activate_at } => PendingActionBytes::Pause {
                activate_at: *activate_at,
            },
            PendingAction::Resume { activate_at } => PendingActionBytes::Resume {
                activate_at: *activate_at,
            },
        };
        SignalBytes {
            signaled_at: signal.signaled_at,
            action,
        }
    }
}
