/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Functions that log out events.
//!
//! The logs defined in this module are printed if the user enabled them via the authority manager's
//! [configuration](crate::authority_manager::Configuration).
//!
//! This crate logs using the [log](https://docs.rs/log/latest/log/) crate. To get these messages
//! printed onto a terminal or to a file, set up a
//! [logging implementation](https://docs.rs/log/latest/log/#available-logging-implementations).
//!
//! ## Log message format
//!
//! Log messages are CSVs (Comma Separated Values) with at least two values. The first two values are
//! always:
//! 1. The name of the [event](crate::events) in PascalCase (defined in this module as constants).
//! 2. The time the event was emitted (as number of seconds since the Unix Epoch).
//!
//! The rest of the values differ depending on the kind of event. For example, the following snippet
//! is how an [ApplySignal](crate::events::ApplySignalEvent) is printed:
//!
//! ```text
//! ApplySignal, 1701329264, fNGCJyk, 10, ScheduledChange, 20
//! ```
//!
//! In the snippet:
//! - The third value is the first seven characters of the Base64 encoding of the hash of the block
//!   that signaled the action.
//! - The fourth value is the number of that block.
//! - The fifth value is the kind of action.
//! - The sixth value is the number of the block at which the action takes effect.

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use std::time::SystemTime;

use crate::{event_bus::HandlerPtr, events::*, types::block::BlockInfo};

// Names of each event in PascalCase for printing:
pub const INSERT_SCHEDULE_NODE: &str = "InsertScheduleNode";
pub const APPLY_SIGNAL: &str = "ApplySignal";
pub const FINALIZE_BLOCK: &str = "FinalizeBlock";
pub const PRUNE_SCHEDULE_NODE: &str = "PruneScheduleNode";

/// Implemented by event types. Used to get a closure that logs the event.
pub(crate) trait Logger {
    /// Returns a pointer to the default logging handler for a given event type.
    fn get_logger() -> HandlerPtr<Self>;
}

impl Logger for InsertScheduleNodeEvent {
    fn get_logger() -> HandlerPtr<Self> {
        let logger = |insert_schedule_node_event: &InsertScheduleNodeEvent| {
            log::info!(
                "{}, {}, {}, {}",
                INSERT_SCHEDULE_NODE,
                secs_since_unix_epoch(insert_schedule_node_event.timestamp),
                block_info(&insert_schedule_node_event.block),
                block_info(&insert_schedule_node_event.parent)
            )
        };
        Box::new(logger)
    }
}

impl Logger for ApplySignalEvent {
    fn get_logger() -> HandlerPtr<Self> {
        let logger = |apply_signal_event: &ApplySignalEvent| {
            let activate_at = apply_signal_event
                .action
                .activate_at()
                .unwrap_or(apply_signal_event.block.number);
            log::info!(
                "{}, {}, {}, {}, {}",
                APPLY_SIGNAL,
                secs_since_unix_epoch(apply_signal_event.timestamp),
                block_info(&apply_signal_event.block),
                apply_signal_event.action.name(),
                activate_at
            )
        };
        Box::new(logger)
    }
}

impl Logger for FinalizeBlockEvent {
    fn get_logger() -> HandlerPtr<Self> {
        let logger = |finalize_block_event: &FinalizeBlockEvent| {
            log::info!(
                "{}, {}, {}",
                FINALIZE_BLOCK,
                secs_since_unix_epoch(finalize_block_event.timestamp),
                block_info(&finalize_block_event.block)
            )
        };
        Box::new(logger)
    }
}

impl Logger for PruneScheduleNodeEvent {
    fn get_logger() -> HandlerPtr<Self> {
        let logger = |prune_schedule_node_event: &PruneScheduleNodeEvent| {
            log::info!(
                "{}, {}, {}",
                PRUNE_SCHEDULE_NODE,
                secs_since_unix_epoch(prune_schedule_node_event.timestamp),
                block_info(&prune_schedule_node_event.block)
            )
        };
        Box::new(logger)
    }
}

// Print a block as the first seven Base64 characters of its hash, followed by its number.
fn block_info(block: &BlockInfo) -> String {
    format!(
        "{}, {}",
        first_seven_base64_chars(&block.hash.bytes()),
        block.number
    )
}

// Get a more readable representation of a bytesequence by base64-encoding it and taking the first 7 characters.
fn first_seven_base64_chars(bytes: &[u8]) -> String {
    let encoded = STANDARD_NO_PAD.encode(bytes);
    if encoded.len() > 7 {
        encoded[0..7].to_string()
    } else {
        encoded
    }
}

fn secs_since_unix_epoch(timestamp: SystemTime) -> u64 {
    timestamp
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|duration| duration.as_secs())
        .unwrap_or(0)
}
