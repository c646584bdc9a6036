/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Types that are used across multiple components of this crate.
//!
//! Types specific to a single component can be found in that component's module, e.g.,
//! [`crate::schedule_tree::pending`].

pub mod authority_list;

pub mod block;

pub mod crypto_primitives;

pub mod data_types;
