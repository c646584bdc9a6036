/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Data shapes of the GRANDPA finality gadget.
//!
//! The authority manager does not take part in GRANDPA voting. It only consumes these shapes when
//! another component tells it about misbehavior, for example through an
//! [`Equivocation`](messages::Equivocation) passed to
//! [`report_equivocation`](crate::authority_manager::AuthorityManager::report_equivocation).

pub mod messages;
