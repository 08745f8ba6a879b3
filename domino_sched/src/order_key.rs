// Copyright 2026 the Domino Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The `OrderKey` total order (`spec.md` §3 "Order key").

/// The five tick phases, in execution order. Every task of phase `P`
/// finishes before any task of phase `P + 1` begins (`spec.md` §5).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(u16)]
pub enum Phase {
    /// External mutators append dirty entries / raw input work.
    Input = 0,
    /// Rebuild harness work: dirty sets become graph-rebuild work items.
    Topology = 1,
    /// Subsystem-emitted simulation tasks.
    Simulation = 2,
    /// Staged-output commit tasks (see `spec.md` §5 "Cancellation
    /// semantics" for the stage-then-swap pattern this phase exists for).
    Commit = 3,
    /// Export/reporting tasks.
    Export = 4,
}

impl Phase {
    /// All phases in execution order.
    pub const ALL: [Self; 5] = [
        Self::Input,
        Self::Topology,
        Self::Simulation,
        Self::Commit,
        Self::Export,
    ];
}

/// The core ordering primitive for all scheduling decisions. Compared
/// lexicographically left-to-right over its fields in declaration order;
/// `seq` is a per-producer monotonic counter used as a final tie-breaker
/// so every key is unique within a tick (`spec.md` §9: 32 bits, which
/// bounds ticks to a few billion work items per producer).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct OrderKey {
    /// Tick sub-step this key belongs to.
    pub phase: u16,
    /// Scheduler budget domain.
    pub domain_id: u32,
    /// Partition/chunk scope, `0` if not partition-scoped.
    pub chunk_id: u64,
    /// Entity this key concerns, `0` if not entity-scoped.
    pub entity_id: u64,
    /// Packed component reference; meaning is owned by the work handler
    /// that interprets `work_type_id`.
    pub component_id: u64,
    /// Stable type/category token.
    pub type_id: u32,
    /// Per-producer monotonic tie-breaker.
    pub seq: u32,
}

impl OrderKey {
    /// Builds a key, reading `phase` as its `u16` discriminant.
    #[must_use]
    pub fn new(
        phase: Phase,
        domain_id: u32,
        chunk_id: u64,
        entity_id: u64,
        component_id: u64,
        type_id: u32,
        seq: u32,
    ) -> Self {
        Self {
            phase: phase as u16,
            domain_id,
            chunk_id,
            entity_id,
            component_id,
            type_id,
            seq,
        }
    }
}
