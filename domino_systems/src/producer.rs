// Copyright 2026 the Domino Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The subsystem IR-producer trait (`spec.md` §4.8).

use domino_sched::{AccessSetBuilder, TaskGraphBuilder};
use domino_types::{DominoResult, Tick};

use crate::audit::AuditLog;

/// A coarser-grained operating tier a producer may be asked to degrade
/// to (`spec.md` §4.8 "degrade"). Higher values are coarser.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd)]
pub struct FidelityTier(pub u8);

impl FidelityTier {
    /// The finest tier: refine individuals, no aggregation.
    pub const FULL: Self = Self(0);
    /// One step coarser than `FULL`.
    pub const COARSE: Self = Self(1);
    /// The coarsest tier: aggregate cohorts only.
    pub const COARSEST: Self = Self(2);
}

/// Implemented by every game subsystem that emits deterministic work
/// for a tick (`spec.md` §4.8 "Polymorphic trait").
pub trait SubsystemProducer {
    /// This producer's stable identifier, used as `TaskNode::system_id`.
    fn system_id(&self) -> u32;

    /// Whether this producer's tasks can change simulation-affecting
    /// state (as opposed to e.g. a pure reporting producer).
    fn is_sim_affecting(&self) -> bool;

    /// Opaque tokens naming which invariants ("laws") this producer's
    /// tasks affect.
    fn law_targets(&self) -> &[u32];

    /// The next tick this producer is due to run again; `emit_tasks`
    /// may no-op if `now_tick` is earlier.
    fn get_next_due_tick(&self) -> Tick;

    /// Emits zero or more tasks for the span `[now_tick, target_tick]`
    /// into `work_graph_builder`/`access_set_builder`. `audit`, if
    /// present, receives one entry per emitted task
    /// (`SPEC_FULL.md` §B.6.1); it has no bearing on the tasks emitted
    /// or their ordering.
    fn emit_tasks(
        &mut self,
        now_tick: Tick,
        target_tick: Tick,
        work_graph_builder: &mut TaskGraphBuilder,
        access_set_builder: &mut AccessSetBuilder,
        audit: Option<&mut AuditLog>,
    ) -> DominoResult<()>;

    /// Requests a coarser operating tier for the next `emit_tasks` call.
    fn degrade(&mut self, tier: FidelityTier, reason: &'static str);
}
