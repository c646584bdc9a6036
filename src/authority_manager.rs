/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Methods to build, query, and update the authority manager.
//!
//! The [`AuthorityManager`] owns one [schedule tree](crate::schedule_tree) and answers the question
//! "which authorities are entitled to finalize this block?" for any block that descends from the last
//! finalized block. It is fed by three kinds of callers:
//! - The **block import pipeline**, which hands it authority set signals found in block headers,
//!   either already decoded (`apply_*`) or as raw [consensus messages](crate::consensus)
//!   ([`on_consensus`](AuthorityManager::on_consensus)).
//! - The **finality gadget**, which tells it when a block becomes final
//!   ([`on_finalize`](AuthorityManager::on_finalize)) and reports misbehaving voters
//!   ([`report_equivocation`](AuthorityManager::report_equivocation)).
//! - **Voters and block producers**, which query it
//!   ([`authorities`](AuthorityManager::authorities)).
//!
//! ## Preparing an authority manager
//!
//! ```ignore
//! let authority_manager =
//!     AuthorityManagerSpec::builder()
//!     .configuration(configuration)
//!     .ancestry(block_tree_service)
//!     .kv_store(kv_store)
//!     .on_finalize_block(finalize_handler)
//!     .build()
//!     .prepare()?;
//!
//! authority_manager.start();
//! ```
//!
//! ### Required setters
//!
//! - `.configuration(...)`
//! - `.ancestry(...)`
//! - `.kv_store(...)`
//!
//! ### Optional setters
//!
//! The optional setters are for registering user-defined event handlers for events from
//! [crate::events]:
//! - `.on_insert_schedule_node(...)`
//! - `.on_apply_signal(...)`
//! - `.on_finalize_block(...)`
//! - `.on_prune_schedule_node(...)`
//!
//! The manager's [configuration](Configuration) can also be defined using the builder pattern, for
//! example:
//!
//! ```ignore
//! let configuration =
//!     Configuration::builder()
//!     .genesis_block(genesis)
//!     .genesis_authorities(authorities)
//!     .log_events(true)
//!     .build()
//! ```
//!
//! ## Concurrency
//!
//! The schedule tree sits behind a single reader-writer lock. Queries take the read lock, and every
//! mutation (including the prune in `on_finalize`) takes the write lock, so a query never observes
//! a half-applied mutation. Snapshots are written to the key-value store after the tree lock is
//! released, one at a time, in the order of the finalizations that produced them.

use std::fmt::{self, Display, Formatter};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread::JoinHandle;
use std::time::SystemTime;

use typed_builder::TypedBuilder;

use crate::consensus::{decode_authorities, ConsensusEngineId, ConsensusMessage};
use crate::event_bus::*;
use crate::events::*;
use crate::grandpa::messages::Equivocation;
use crate::schedule_tree::{
    pending::{AuthoritySetState, PendingAction},
    pluggables::{BlockAncestry, KVGetError, KVSetError, KVStore, KVWriteError},
    snapshot::ScheduleTreeWriteBatch,
    tree::{ScheduleTree, ScheduleTreeError},
};
use crate::types::{authority_list::AuthorityList, block::BlockInfo, data_types::BlockNumber};

/// Stores the user-defined parameters required to prepare the authority manager, that is:
/// 1. The genesis block, which anchors the root of a freshly created schedule tree.
/// 2. The authority list in effect at the genesis block.
/// 3. The "Log Events" flag, if set to "true" then logs should be printed.
///
/// The genesis parameters are only used if the key-value store does not contain a schedule tree
/// snapshot yet. Otherwise, the snapshot wins.
#[derive(Clone, TypedBuilder)]
#[builder(builder_method(doc = "
    Create a builder for building a [Configuration]. On the builder call the following methods to construct a valid [Configuration].

    Required:
    - `.genesis_block(...)`
    - `.genesis_authorities(...)`
    - `.log_events(...)`
"))]
pub struct Configuration {
    #[builder(setter(doc = "Set the genesis block. Required."))]
    pub genesis_block: BlockInfo,
    #[builder(setter(doc = "Set the authority list in effect at the genesis block. Required."))]
    pub genesis_authorities: AuthorityList,
    #[builder(setter(doc = "Enable logging? Required."))]
    pub log_events: bool,
}

/// Stores all necessary parameters and trait implementations required to prepare the
/// [AuthorityManager].
#[derive(TypedBuilder)]
#[builder(builder_method(doc = "
    Create a builder for building an [AuthorityManagerSpec]. On the builder call the following methods to construct a valid [AuthorityManagerSpec].

    Required:
    - `.configuration(...)`
    - `.ancestry(...)`
    - `.kv_store(...)`

    Optional:
    - `.on_insert_schedule_node(...)`
    - `.on_apply_signal(...)`
    - `.on_finalize_block(...)`
    - `.on_prune_schedule_node(...)`
"))]
pub struct AuthorityManagerSpec<K: KVStore, A: BlockAncestry> {
    // Required parameters
    #[builder(setter(doc = "Set the [configuration](Configuration) of the authority manager. Required."))]
    configuration: Configuration,
    #[builder(setter(doc = "Set the block ancestry oracle. The argument must implement the [BlockAncestry] trait. Required."))]
    ancestry: A,
    #[builder(setter(doc = "Set the key-value store the schedule tree is persisted into. The argument must implement the [KVStore] trait. Required."))]
    kv_store: K,
    // Optional parameters
    #[builder(default, setter(transform = |handler: impl Fn(&InsertScheduleNodeEvent) + Send + 'static| Some(Box::new(handler) as HandlerPtr<InsertScheduleNodeEvent>),
    doc = "Register a handler closure to be invoked after a node is created in the schedule tree. Optional."))]
    on_insert_schedule_node: Option<HandlerPtr<InsertScheduleNodeEvent>>,
    #[builder(default, setter(transform = |handler: impl Fn(&ApplySignalEvent) + Send + 'static| Some(Box::new(handler) as HandlerPtr<ApplySignalEvent>),
    doc = "Register a handler closure to be invoked after a signal is recorded in the schedule tree. Optional."))]
    on_apply_signal: Option<HandlerPtr<ApplySignalEvent>>,
    #[builder(default, setter(transform = |handler: impl Fn(&FinalizeBlockEvent) + Send + 'static| Some(Box::new(handler) as HandlerPtr<FinalizeBlockEvent>),
    doc = "Register a handler closure to be invoked after the schedule tree is re-rooted at a finalized block. Optional."))]
    on_finalize_block: Option<HandlerPtr<FinalizeBlockEvent>>,
    #[builder(default, setter(transform = |handler: impl Fn(&PruneScheduleNodeEvent) + Send + 'static| Some(Box::new(handler) as HandlerPtr<PruneScheduleNodeEvent>),
    doc = "Register a handler closure to be invoked after a node is discarded from the schedule tree. Optional."))]
    on_prune_schedule_node: Option<HandlerPtr<PruneScheduleNodeEvent>>,
}

impl<K: KVStore, A: BlockAncestry> AuthorityManagerSpec<K, A> {
    /// Load the schedule tree from the key-value store, or create it from the genesis configuration
    /// if the store holds no snapshot, and wrap it in an [`AuthorityManager`].
    ///
    /// Events published before [`start`](AuthorityManager::start) is called are queued, and delivered
    /// once it is.
    pub fn prepare(self) -> Result<AuthorityManager<K, A>, AuthorityManagerError> {
        let configuration = self.configuration;

        let tree = match self.kv_store.schedule_tree()? {
            Some(tree) => {
                log::info!(
                    "Restored schedule tree with {} nodes, rooted at {}",
                    tree.len(),
                    tree.root().block()
                );
                tree
            }
            None => {
                if configuration.genesis_authorities.is_empty() {
                    return Err(AuthorityManagerError::InvalidAuthoritySet {
                        block: configuration.genesis_block,
                    });
                }
                ScheduleTree::new(configuration.genesis_block, configuration.genesis_authorities)
            }
        };

        let event_handlers = EventHandlers::new(
            configuration.log_events,
            self.on_insert_schedule_node,
            self.on_apply_signal,
            self.on_finalize_block,
            self.on_prune_schedule_node,
        );

        let (event_publisher, event_bus) = if event_handlers.is_empty() {
            (None, EventBus::default())
        } else {
            let (event_publisher, event_subscriber) = mpsc::channel();
            (
                Some(event_publisher),
                EventBus {
                    idle: Some((event_handlers, event_subscriber)),
                    running: None,
                },
            )
        };

        Ok(AuthorityManager {
            tree: RwLock::new(tree),
            kv_store: Mutex::new(self.kv_store),
            ancestry: self.ancestry,
            event_publisher,
            event_bus: Mutex::new(event_bus),
        })
    }
}

/// Tracks which authority set is in effect at every block that descends from the last finalized
/// block.
///
/// All methods take `&self`, so an `AuthorityManager` can be shared between threads behind an `Arc`.
pub struct AuthorityManager<K: KVStore, A: BlockAncestry> {
    tree: RwLock<ScheduleTree>,
    kv_store: Mutex<K>,
    ancestry: A,
    event_publisher: Option<Sender<Event>>,
    event_bus: Mutex<EventBus>,
}

#[derive(Default)]
struct EventBus {
    idle: Option<(EventHandlers, Receiver<Event>)>,
    running: Option<(JoinHandle<()>, Sender<()>)>,
}

impl EventBus {
    fn shut_down(&mut self) {
        if let Some((event_bus, shutdown)) = self.running.take() {
            let _ = shutdown.send(());
            if event_bus.join().is_err() {
                log::error!("An event handler panicked");
            }
        }
    }
}

impl<K: KVStore, A: BlockAncestry> AuthorityManager<K, A> {
    /* ↓↓↓ Lifecycle ↓↓↓ */

    /// Start delivering events to the registered handlers. Calling `start` more than once has no
    /// further effect.
    pub fn start(&self) {
        let mut event_bus = self.lock_event_bus();
        if let Some((event_handlers, event_subscriber)) = event_bus.idle.take() {
            let (shutdown, shutdown_receiver) = mpsc::channel();
            let handle = start_event_bus(event_handlers, event_subscriber, shutdown_receiver);
            event_bus.running = Some((handle, shutdown));
        }
        log::info!("Authority manager started, root at {}", self.root());
    }

    /// Deliver every queued event, stop the event handling thread, and write a final snapshot of the
    /// schedule tree to the key-value store.
    pub fn stop(&self) -> Result<(), AuthorityManagerError> {
        self.lock_event_bus().shut_down();

        let mut wb = ScheduleTreeWriteBatch::new();
        let tree = self.read_tree();
        wb.set_schedule_tree(&tree)?;
        let mut kv_store = self.lock_kv_store();
        drop(tree);

        kv_store.write(wb.into_inner())?;
        log::info!("Authority manager stopped");
        Ok(())
    }

    /* ↓↓↓ Queries ↓↓↓ */

    /// Get the authority list in effect at `block`.
    ///
    /// # Errors
    ///
    /// [`UnknownBlock`](AuthorityManagerError::UnknownBlock) if `block` does not descend from (and is
    /// not) the last finalized block.
    pub fn authorities(&self, block: &BlockInfo) -> Result<AuthorityList, AuthorityManagerError> {
        Ok(self.authority_set_state(block)?.authorities)
    }

    /// Get the authority list and finality flag in effect at `block`.
    pub fn authority_set_state(
        &self,
        block: &BlockInfo,
    ) -> Result<AuthoritySetState, AuthorityManagerError> {
        let tree = self.read_tree();
        let node = tree.find_ancestor(&self.ancestry, block)?;
        Ok(tree.materialize_state(node, block))
    }

    /// Check whether finality is enabled at `block`.
    pub fn finality_enabled(&self, block: &BlockInfo) -> Result<bool, AuthorityManagerError> {
        Ok(self.authority_set_state(block)?.finality_enabled)
    }

    /// Get the last finalized block, which is the root of the schedule tree.
    pub fn root(&self) -> BlockInfo {
        *self.read_tree().root().block()
    }

    /// Get a copy of the whole schedule tree.
    pub fn schedule_tree(&self) -> ScheduleTree {
        self.read_tree().clone()
    }

    /* ↓↓↓ Signals ↓↓↓ */

    /// Record that `block` scheduled `authorities` to take over at block number `activate_at`.
    ///
    /// # Errors
    ///
    /// - [`InvalidActivationHeight`](AuthorityManagerError::InvalidActivationHeight) if `activate_at`
    ///   is not greater than `block`'s number.
    /// - [`InvalidAuthoritySet`](AuthorityManagerError::InvalidAuthoritySet) if `authorities` is
    ///   empty.
    /// - [`UnknownBlock`](AuthorityManagerError::UnknownBlock) if `block` is not tracked.
    pub fn apply_scheduled_change(
        &self,
        block: &BlockInfo,
        authorities: AuthorityList,
        activate_at: BlockNumber,
    ) -> Result<(), AuthorityManagerError> {
        validate_activation(block, activate_at)?;
        validate_authorities(block, &authorities)?;
        self.insert_signal(
            &mut self.write_tree(),
            block,
            PendingAction::ScheduledChange {
                authorities,
                activate_at,
            },
        )
    }

    /// Record that `block` forced `authorities` to take over at block number `activate_at`,
    /// overriding every scheduled change on the same branch that has not activated by `block`.
    ///
    /// Validated like [`apply_scheduled_change`](Self::apply_scheduled_change).
    pub fn apply_forced_change(
        &self,
        block: &BlockInfo,
        authorities: AuthorityList,
        activate_at: BlockNumber,
    ) -> Result<(), AuthorityManagerError> {
        validate_activation(block, activate_at)?;
        validate_authorities(block, &authorities)?;
        self.insert_signal(
            &mut self.write_tree(),
            block,
            PendingAction::ForcedChange {
                authorities,
                activate_at,
            },
        )
    }

    /// Record that `block` disabled the authority at `authority_index`, effective from `block`
    /// itself.
    ///
    /// # Errors
    ///
    /// [`InvalidAuthorityIndex`](AuthorityManagerError::InvalidAuthorityIndex) if `authority_index`
    /// is out of range of the authority list in effect at `block`.
    pub fn apply_on_disabled(
        &self,
        block: &BlockInfo,
        authority_index: u64,
    ) -> Result<(), AuthorityManagerError> {
        let mut tree = self.write_tree();
        let node = tree.find_ancestor(&self.ancestry, block)?;
        let set_len = tree.materialize(node, block).len();
        if authority_index >= set_len as u64 {
            return Err(AuthorityManagerError::InvalidAuthorityIndex {
                block: *block,
                authority_index,
                set_len,
            });
        }

        self.insert_signal(
            &mut tree,
            block,
            PendingAction::OnDisabled { authority_index },
        )
    }

    /// Record that `block` paused finality starting at block number `activate_at`.
    pub fn apply_pause(
        &self,
        block: &BlockInfo,
        activate_at: BlockNumber,
    ) -> Result<(), AuthorityManagerError> {
        validate_activation(block, activate_at)?;
        self.insert_signal(
            &mut self.write_tree(),
            block,
            PendingAction::Pause { activate_at },
        )
    }

    /// Record that `block` resumed finality starting at block number `activate_at`.
    pub fn apply_resume(
        &self,
        block: &BlockInfo,
        activate_at: BlockNumber,
    ) -> Result<(), AuthorityManagerError> {
        validate_activation(block, activate_at)?;
        self.insert_signal(
            &mut self.write_tree(),
            block,
            PendingAction::Resume { activate_at },
        )
    }

    /// Handle a consensus message carried by `block` in a digest item tagged with `engine_id`.
    ///
    /// Messages from engines other than the [known ones](crate::consensus::KNOWN_ENGINES) are
    /// ignored. Otherwise the message is dispatched to the `apply_*` method of its kind, with its delay
    /// converted into an activation block number.
    pub fn on_consensus(
        &self,
        engine_id: &ConsensusEngineId,
        block: &BlockInfo,
        message: &ConsensusMessage,
    ) -> Result<(), AuthorityManagerError> {
        if !engine_id.is_known() {
            log::debug!("Ignoring consensus message from unknown engine {}", engine_id);
            return Ok(());
        }

        let activate_at = message.activate_at(block.number);
        match message {
            ConsensusMessage::ScheduledChange { authorities, .. } => {
                let authorities = decode_authorities(authorities)
                    .map_err(|_| AuthorityManagerError::InvalidAuthoritySet { block: *block })?;
                self.apply_scheduled_change(block, authorities, activate_at)
            }
            ConsensusMessage::ForcedChange { authorities, .. } => {
                let authorities = decode_authorities(authorities)
                    .map_err(|_| AuthorityManagerError::InvalidAuthoritySet { block: *block })?;
                self.apply_forced_change(block, authorities, activate_at)
            }
            ConsensusMessage::OnDisabled { authority_index } => {
                self.apply_on_disabled(block, *authority_index)
            }
            ConsensusMessage::Pause { .. } => self.apply_pause(block, activate_at),
            ConsensusMessage::Resume { .. } => self.apply_resume(block, activate_at),
        }
    }

    /// Disable the authority that `equivocation` proves to have double-voted, in the authority list
    /// in effect at `block` and on every block that descends from it.
    ///
    /// # Errors
    ///
    /// [`InvalidEquivocation`](AuthorityManagerError::InvalidEquivocation) if the proof is not
    /// [well-formed](Equivocation::is_well_formed), or if the equivocator is not a member of the
    /// authority list in effect at `block`.
    pub fn report_equivocation(
        &self,
        block: &BlockInfo,
        equivocation: &Equivocation,
    ) -> Result<(), AuthorityManagerError> {
        if !equivocation.is_well_formed() {
            return Err(AuthorityManagerError::InvalidEquivocation { block: *block });
        }

        let mut tree = self.write_tree();
        let node = tree.find_ancestor(&self.ancestry, block)?;
        let authorities = tree.materialize(node, block);
        let authority_index = equivocation
            .equivocator_index(&authorities)
            .ok_or(AuthorityManagerError::InvalidEquivocation { block: *block })?;

        log::warn!(
            "Authority {} equivocated in round {}, disabling it from {}",
            authority_index,
            equivocation.round,
            block
        );
        self.insert_signal(
            &mut tree,
            block,
            PendingAction::OnDisabled {
                authority_index: authority_index as u64,
            },
        )
    }

    /* ↓↓↓ Finalization ↓↓↓ */

    /// Re-root the schedule tree at the newly finalized `block`, discarding every fork that does not
    /// contain it, and persist a snapshot of the result.
    ///
    /// Finalizing the current root again has no effect. A failure to persist the snapshot is logged
    /// and does not undo the re-rooting.
    ///
    /// # Errors
    ///
    /// [`ReorgBelowRoot`](AuthorityManagerError::ReorgBelowRoot) if `block` does not descend from
    /// the last finalized block. Finality never moves backwards or sideways, so callers must treat
    /// this as fatal.
    pub fn on_finalize(&self, block: &BlockInfo) -> Result<(), AuthorityManagerError> {
        let mut tree = self.write_tree();
        let root = *tree.root().block();
        if root == *block {
            return Ok(());
        }
        if !self.ancestry.is_direct_ancestor(&root, block) {
            log::error!(
                "Finalized block {} does not descend from the last finalized block {}",
                block,
                root
            );
            return Err(AuthorityManagerError::ReorgBelowRoot {
                root,
                block: *block,
            });
        }

        let pruned = tree.prune(&self.ancestry, block)?;

        let mut wb = ScheduleTreeWriteBatch::new();
        let serialized = wb.set_schedule_tree(&tree);
        let mut kv_store = self.lock_kv_store();
        drop(tree);

        Event::publish(
            &self.event_publisher,
            Event::FinalizeBlock(FinalizeBlockEvent {
                timestamp: SystemTime::now(),
                block: *block,
            }),
        );
        for pruned_block in pruned {
            Event::publish(
                &self.event_publisher,
                Event::PruneScheduleNode(PruneScheduleNodeEvent {
                    timestamp: SystemTime::now(),
                    block: pruned_block,
                }),
            );
        }

        let persisted = match serialized {
            Ok(()) => kv_store.write(wb.into_inner()).map_err(|err| err.to_string()),
            Err(err) => Err(err.to_string()),
        };
        if let Err(reason) = persisted {
            log::error!(
                "Failed to persist schedule tree after finalizing {}: {}",
                block,
                reason
            );
        }

        Ok(())
    }

    /* ↓↓↓ Helpers ↓↓↓ */

    fn insert_signal(
        &self,
        tree: &mut ScheduleTree,
        block: &BlockInfo,
        action: PendingAction,
    ) -> Result<(), AuthorityManagerError> {
        let insertion = tree.insert_signal(&self.ancestry, block, action.clone())?;

        if let Some(parent) = insertion.created_under {
            Event::publish(
                &self.event_publisher,
                Event::InsertScheduleNode(InsertScheduleNodeEvent {
                    timestamp: SystemTime::now(),
                    block: *block,
                    parent,
                }),
            );
        }
        Event::publish(
            &self.event_publisher,
            Event::ApplySignal(ApplySignalEvent {
                timestamp: SystemTime::now(),
                block: *block,
                action,
            }),
        );

        Ok(())
    }

    fn read_tree(&self) -> RwLockReadGuard<'_, ScheduleTree> {
        self.tree.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_tree(&self) -> RwLockWriteGuard<'_, ScheduleTree> {
        self.tree.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_kv_store(&self) -> MutexGuard<'_, K> {
        self.kv_store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_event_bus(&self) -> MutexGuard<'_, EventBus> {
        self.event_bus.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K: KVStore, A: BlockAncestry> Drop for AuthorityManager<K, A> {
    fn drop(&mut self) {
        self.lock_event_bus().shut_down();
    }
}

fn validate_activation(
    block: &BlockInfo,
    activate_at: BlockNumber,
) -> Result<(), AuthorityManagerError> {
    if activate_at <= block.number {
        return Err(AuthorityManagerError::InvalidActivationHeight {
            block: *block,
            activate_at,
        });
    }
    Ok(())
}

fn validate_authorities(
    block: &BlockInfo,
    authorities: &AuthorityList,
) -> Result<(), AuthorityManagerError> {
    if authorities.is_empty() {
        return Err(AuthorityManagerError::InvalidAuthoritySet { block: *block });
    }
    Ok(())
}

/// Errors that may be returned by the methods of [`AuthorityManager`] and
/// [`AuthorityManagerSpec::prepare`].
#[derive(Debug)]
pub enum AuthorityManagerError {
    /// The block is neither the last finalized block nor one of its descendants.
    UnknownBlock { block: BlockInfo },

    /// A signal's activation block number is not greater than the number of the block that signaled
    /// it.
    InvalidActivationHeight {
        block: BlockInfo,
        activate_at: BlockNumber,
    },

    /// A signal carried an empty or undecodable authority list.
    InvalidAuthoritySet { block: BlockInfo },

    /// A disable signal referred to an index outside of the authority list in effect at `block`.
    InvalidAuthorityIndex {
        block: BlockInfo,
        authority_index: u64,
        set_len: usize,
    },

    /// An equivocation proof was malformed, or named a voter that is not an authority at `block`.
    InvalidEquivocation { block: BlockInfo },

    /// A finalized block does not descend from the last finalized block.
    ReorgBelowRoot { root: BlockInfo, block: BlockInfo },

    /// The schedule tree snapshot in the key-value store could not be read.
    KVGetError(KVGetError),

    /// The schedule tree could not be serialized into a write batch.
    KVSetError(KVSetError),

    /// The key-value store failed to write a snapshot.
    KVWriteError(KVWriteError),
}

impl From<ScheduleTreeError> for AuthorityManagerError {
    fn from(value: ScheduleTreeError) -> Self {
        match value {
            ScheduleTreeError::UnknownBlock { block } => AuthorityManagerError::UnknownBlock { block },
        }
    }
}

impl From<KVGetError> for AuthorityManagerError {
    fn from(value: KVGetError) -> Self {
        AuthorityManagerError::KVGetError(value)
    }
}

impl From<KVSetError> for AuthorityManagerError {
    fn from(value: KVSetError) -> Self {
        AuthorityManagerError::KVSetError(value)
    }
}

impl From<KVWriteError> for AuthorityManagerError {
    fn from(value: KVWriteError) -> Self {
        AuthorityManagerError::KVWriteError(value)
    }
}

impl Display for AuthorityManagerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AuthorityManagerError::UnknownBlock { block } => {
                write!(f, "block {} is not tracked by the schedule tree", block)
            }
            AuthorityManagerError::InvalidActivationHeight { block, activate_at } => write!(
                f,
                "signal from block {} activates at #{}, which is not after it",
                block, activate_at
            ),
            AuthorityManagerError::InvalidAuthoritySet { block } => {
                write!(f, "signal from block {} carries an invalid authority set", block)
            }
            AuthorityManagerError::InvalidAuthorityIndex {
                block,
                authority_index,
                set_len,
            } => write!(
                f,
                "signal from block {} disables authority {}, but the set has {} authorities",
                block, authority_index, set_len
            ),
            AuthorityManagerError::InvalidEquivocation { block } => {
                write!(f, "invalid equivocation reported at block {}", block)
            }
            AuthorityManagerError::ReorgBelowRoot { root, block } => write!(
                f,
                "finalized block {} does not descend from the last finalized block {}",
                block, root
            ),
            AuthorityManagerError::KVGetError(err) => Display::fmt(err, f),
            AuthorityManagerError::KVSetError(err) => Display::fmt(err, f),
            AuthorityManagerError::KVWriteError(err) => Display::fmt(err, f),
        }
    }
}

impl std::error::Error for AuthorityManagerError {}
