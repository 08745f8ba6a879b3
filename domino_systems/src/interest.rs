// Copyright 2026 the Domino Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The interest/fidelity producer: source collection for the interest
//! model. Grounded in `interest_work_ir_tests.cpp`'s
//! `DOM_INTEREST_TASK_COLLECT_SOURCES`, whose `policy_params` the
//! original describes as `{op, source_kind, ...}` rather than a plain
//! slice (`spec.md` §4.8).

use alloc::vec::Vec;

use domino_sched::{AccessSetBuilder, CostModel, TaskGraphBuilder};
use domino_types::{DomainId, DominoResult, Tick};

use crate::audit::AuditLog;
use crate::producer::{FidelityTier, SubsystemProducer};
use crate::slice_producer::SliceProducer;

/// Producer-local token for the source-collection op.
pub const OP_COLLECT_SOURCES: u32 = 1;

/// Emits one source-collection task per call over the registered
/// interest sources. `source_kind` narrows which kind of source this
/// producer instance collects (population, territory, market, ...).
#[derive(Clone, Debug)]
pub struct InterestProducer {
    inner: SliceProducer,
    source_kind: u32,
}

impl InterestProducer {
    /// Builds an interest producer over `source_count` sources of
    /// `source_kind`.
    #[must_use]
    pub fn new(
        domain_id: DomainId,
        phase_id: u16,
        source_kind: u32,
        source_count: u32,
        budget_hint: u32,
    ) -> Self {
        Self {
            inner: SliceProducer::new(
                4,
                domain_id,
                phase_id,
                OP_COLLECT_SOURCES,
                0b1,
                source_count,
                budget_hint,
                0b1,
                CostModel::new(4, 1, 0).unwrap(),
                Vec::new(),
            ),
            source_kind,
        }
    }

    /// This producer's configured source kind.
    #[must_use]
    pub fn source_kind(&self) -> u32 {
        self.source_kind
    }

    /// Replaces the source slice for a fresh tick's inputs.
    pub fn set_sources(&mut self, source_count: u32) {
        self.inner.reset_input(source_count);
    }

    /// Narrows or widens which ops this producer will act on.
    pub fn set_allowed_ops_mask(&mut self, mask: u32) {
        self.inner.set_allowed_ops_mask(mask);
    }
}

impl SubsystemProducer for InterestProducer {
    fn system_id(&self) -> u32 {
        4
    }

    fn is_sim_affecting(&self) -> bool {
        false
    }

    fn law_targets(&self) -> &[u32] {
        &[]
    }

    fn get_next_due_tick(&self) -> Tick {
        self.inner.next_due_tick()
    }

    fn emit_tasks(
        &mut self,
        now_tick: Tick,
        target_tick: Tick,
        work_graph_builder: &mut TaskGraphBuilder,
        access_set_builder: &mut AccessSetBuilder,
        audit: Option<&mut AuditLog>,
    ) -> DominoResult<()> {
        self.inner
            .emit_tasks(now_tick, target_tick, work_graph_builder, access_set_builder, audit)
    }

    fn degrade(&mut self, tier: FidelityTier, reason: &'static str) {
        self.inner.request_degrade(tier, reason);
    }
}
