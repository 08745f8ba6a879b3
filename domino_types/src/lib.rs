// Copyright 2026 the Domino Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared identifiers and error kinds used across the Domino deterministic
//! simulation core.
//!
//! This crate has no behavior of its own; it exists so `domino_graph`,
//! `domino_sched`, `domino_sim` and `domino_systems` can agree on id types
//! and error representation without depending on each other.

#![no_std]
#![cfg_attr(not(feature = "std"), doc = "This crate is `no_std` by default.")]

extern crate alloc;

mod error;
mod ids;

pub use error::{DominoError, DominoResult};
pub use ids::{
    ChunkId, ComponentId, DomainId, EdgeId, EntityId, GraphInstanceId, GraphTypeId, NodeId,
    PartId, Tick, TaskId, TypeId,
};

/// Packed-component kinds used by the rebuild harness (`domino_sim`) to tag a
/// [`ComponentId`] with what table it names. See `SPEC_FULL.md` §A.3/A.4.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(u8)]
pub enum ComponentKind {
    /// A dirty partition id.
    Partition = 1,
    /// A dirty node id.
    Node = 2,
    /// A dirty edge id.
    Edge = 3,
}

impl ComponentKind {
    /// Decodes a raw kind byte, returning `None` for anything not in
    /// `{1, 2, 3}`.
    #[must_use]
    pub const fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            1 => Some(Self::Partition),
            2 => Some(Self::Node),
            3 => Some(Self::Edge),
            _ => None,
        }
    }
}
