/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! The thread that delivers [events](crate::events) to their registered handlers.
//!
//! The authority manager publishes events into a channel. Handlers run on a separate thread, in the
//! order the events were published.

use std::sync::mpsc::{Receiver, RecvTimeoutError, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::events::*;
use crate::logging::Logger;

pub type HandlerPtr<T> = Box<dyn Fn(&T) + Send>;

pub(crate) struct EventHandlers {
    pub(crate) insert_schedule_node_handlers: Vec<HandlerPtr<InsertScheduleNodeEvent>>,
    pub(crate) apply_signal_handlers: Vec<HandlerPtr<ApplySignalEvent>>,
    pub(crate) finalize_block_handlers: Vec<HandlerPtr<FinalizeBlockEvent>>,
    pub(crate) prune_schedule_node_handlers: Vec<HandlerPtr<PruneScheduleNodeEvent>>,
}

impl EventHandlers {
    /// Collect the user-provided handlers, adding the default [loggers](crate::logging) first if
    /// `log_events` is set.
    pub(crate) fn new(
        log_events: bool,
        insert_schedule_node_handler: Option<HandlerPtr<InsertScheduleNodeEvent>>,
        apply_signal_handler: Option<HandlerPtr<ApplySignalEvent>>,
        finalize_block_handler: Option<HandlerPtr<FinalizeBlockEvent>>,
        prune_schedule_node_handler: Option<HandlerPtr<PruneScheduleNodeEvent>>,
    ) -> EventHandlers {
        EventHandlers {
            insert_schedule_node_handlers: handlers(log_events, insert_schedule_node_handler),
            apply_signal_handlers: handlers(log_events, apply_signal_handler),
            finalize_block_handlers: handlers(log_events, finalize_block_handler),
            prune_schedule_node_handlers: handlers(log_events, prune_schedule_node_handler),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.insert_schedule_node_handlers.is_empty()
            && self.apply_signal_handlers.is_empty()
            && self.finalize_block_handlers.is_empty()
            && self.prune_schedule_node_handlers.is_empty()
    }

    pub(crate) fn fire_handlers(&self, event: Event) {
        match event {
            Event::InsertScheduleNode(insert_schedule_node_event) => self
                .insert_schedule_node_handlers
                .iter()
                .for_each(|handler| handler(&insert_schedule_node_event)),

            Event::ApplySignal(apply_signal_event) => self
                .apply_signal_handlers
                .iter()
                .for_each(|handler| handler(&apply_signal_event)),

            Event::FinalizeBlock(finalize_block_event) => self
                .finalize_block_handlers
                .iter()
                .for_each(|handler| handler(&finalize_block_event)),

            Event::PruneScheduleNode(prune_schedule_node_event) => self
                .prune_schedule_node_handlers
                .iter()
                .for_each(|handler| handler(&prune_schedule_node_event)),
        }
    }
}

fn handlers<T: Logger>(log_events: bool, user_handler: Option<HandlerPtr<T>>) -> Vec<HandlerPtr<T>> {
    let mut handlers = Vec::new();
    if log_events {
        handlers.push(T::get_logger());
    }
    handlers.extend(user_handler);
    handlers
}

/// Start the thread that fires `event_handlers` for every event received from `event_subscriber`.
///
/// On receiving from `shutdown_signal` (or if the shutdown sender goes away), the thread delivers
/// every event still queued in `event_subscriber` and then exits.
pub(crate) fn start_event_bus(
    event_handlers: EventHandlers,
    event_subscriber: Receiver<Event>,
    shutdown_signal: Receiver<()>,
) -> JoinHandle<()> {
    thread::spawn(move || loop {
        let shutting_down = match shutdown_signal.try_recv() {
            Ok(()) | Err(TryRecvError::Disconnected) => true,
            Err(TryRecvError::Empty) => false,
        };

        if shutting_down {
            while let Ok(event) = event_subscriber.try_recv() {
                event_handlers.fire_handlers(event)
            }
            return;
        }

        match event_subscriber.recv_timeout(Duration::from_millis(10)) {
            Ok(event) => event_handlers.fire_handlers(event),
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => return,
        }
    })
}
