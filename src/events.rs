/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Definitions of the events emitted by the authority manager, for event handling and logging.
//!
//! An event for a given action indicates that the action has been completed.

use std::sync::mpsc::Sender;
use std::time::SystemTime;

use crate::{schedule_tree::pending::PendingAction, types::block::BlockInfo};

pub enum Event {
    InsertScheduleNode(InsertScheduleNodeEvent),
    ApplySignal(ApplySignalEvent),
    FinalizeBlock(FinalizeBlockEvent),
    PruneScheduleNode(PruneScheduleNodeEvent),
}

impl Event {
    pub(crate) fn publish(event_publisher: &Option<Sender<Event>>, event: Event) {
        if let Some(event_publisher) = event_publisher {
            // The receiving end only goes away after the manager stops publishing.
            let _ = event_publisher.send(event);
        }
    }
}

/// A node was created in the schedule tree, anchored at `block`, under the node anchored at `parent`.
pub struct InsertScheduleNodeEvent {
    pub timestamp: SystemTime,
    pub block: BlockInfo,
    pub parent: BlockInfo,
}

/// A signal for `action` was recorded against `block`.
pub struct ApplySignalEvent {
    pub timestamp: SystemTime,
    pub block: BlockInfo,
    pub action: PendingAction,
}

/// `block` became the root of the schedule tree.
pub struct FinalizeBlockEvent {
    pub timestamp: SystemTime,
    pub block: BlockInfo,
}

/// The node anchored at `block` was discarded from the schedule tree.
pub struct PruneScheduleNodeEvent {
    pub timestamp: SystemTime,
    pub block: BlockInfo,
}
