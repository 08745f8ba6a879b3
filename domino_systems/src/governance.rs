// Copyright 2026 the Domino Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The governance producer: policy application across governed
//! territories. Grounded in `governance_work_ir_tests.cpp`'s
//! `DOM_GOV_TASK_POLICY_APPLY`.

use alloc::vec::Vec;

use domino_sched::{AccessSetBuilder, CostModel, TaskGraphBuilder};
use domino_types::{DomainId, DominoResult, Tick};

use crate::audit::AuditLog;
use crate::producer::{FidelityTier, SubsystemProducer};
use crate::slice_producer::SliceProducer;

/// Producer-local token for the policy-apply op.
pub const OP_POLICY_APPLY: u32 = 1;

/// Emits one policy-application task per call over governed
/// territories.
#[derive(Clone, Debug)]
pub struct GovernanceProducer {
    inner: SliceProducer,
}

impl GovernanceProducer {
    /// Builds a governance producer over `territory_count` governed
    /// territories.
    #[must_use]
    pub fn new(domain_id: DomainId, phase_id: u16, territory_count: u32, budget_hint: u32) -> Self {
        Self {
            inner: SliceProducer::new(
                3,
                domain_id,
                phase_id,
                OP_POLICY_APPLY,
                0b1,
                territory_count,
                budget_hint,
                0b1,
                CostModel::new(3, 3, 0).unwrap(),
                Vec::new(),
            ),
        }
    }

    /// Replaces the territory slice for a fresh tick's inputs.
    pub fn set_territories(&mut self, territory_count: u32) {
        self.inner.reset_input(territory_count);
    }

    /// Narrows or widens which ops this producer will act on.
    pub fn set_allowed_ops_mask(&mut self, mask: u32) {
        self.inner.set_allowed_ops_mask(mask);
    }
}

impl SubsystemProducer for GovernanceProducer {
    fn system_id(&self) -> u32 {
        3
    }

    fn is_sim_affecting(&self) -> bool {
        true
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
