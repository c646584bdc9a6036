/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Fork-aware tracking of the authority sets that are entitled to finalize blocks.
//!
//! The entry point is the [authority manager](authority_manager), which records the authority set
//! signals carried by imported blocks in a [schedule tree](schedule_tree), answers which authorities
//! are in effect at a given block, and prunes the tree as blocks are finalized.

pub mod authority_manager;

pub mod consensus;

pub mod events;

pub mod grandpa;

pub mod logging;

pub mod schedule_tree;

pub mod types;

pub(crate) mod event_bus;
