/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Byte-prefixes that specify where each schedule tree variable is stored in the user-provided
//! key-value store.
//!
//! # List of State Variables
//!
//! |Variable|Type|Description|
//! |---|---|---|
//! |Schedule Tree|[`ScheduleTreeBytes`](super::snapshot::ScheduleTreeBytes)|Snapshot of the whole schedule tree: every node's anchoring block, parent, effective authority list, finality flag, and pending signals. Rewritten on every successful finalization.|
//!
//! # Persistence of state variables
//!
//! The schedule tree is stored as a single **Borsh-serialized value** under one reserved key, so
//! that every snapshot replaces the previous one atomically.

pub const SCHEDULE_TREE: [u8; 35] = *b":finality:authorities:schedule_tree";
