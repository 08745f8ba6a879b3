// Copyright 2026 the Domino Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-set tracking and the rebuild harness for the Domino
//! deterministic simulation core (`spec.md` §4.3, §4.4).

#![no_std]

extern crate alloc;

mod dirty_set;
mod rebuild;

pub use dirty_set::{DirtyClass, DirtySet};
pub use rebuild::{
    emit_rebuild_work, pack_component_id, unpack_component_id, RebuildTarget, RegistryHandler,
    SingleTargetHandler,
};
