// Copyright 2026 the Domino Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The economy producer: ledger transfer settlement. Grounded in
//! `economy_work_ir_tests.cpp`'s `DOM_ECON_TASK_LEDGER_TRANSFERS`.

use alloc::vec::Vec;

use domino_sched::{AccessSetBuilder, CostModel, TaskGraphBuilder};
use domino_types::{DomainId, DominoResult, Tick};

use crate::audit::AuditLog;
use crate::producer::{FidelityTier, SubsystemProducer};
use crate::slice_producer::SliceProducer;

/// Producer-local token for the ledger-transfer-settlement op.
pub const OP_LEDGER_TRANSFERS: u32 = 1;

/// Emits one ledger-transfer-settlement task per call over the
/// pending transfer queue.
#[derive(Clone, Debug)]
pub struct EconomyProducer {
    inner: SliceProducer,
}

impl EconomyProducer {
    /// Builds an economy producer over `transfer_count` pending
    /// transfers.
    #[must_use]
    pub fn new(domain_id: DomainId, phase_id: u16, transfer_count: u32, budget_hint: u32) -> Self {
        Self {
            inner: SliceProducer::new(
                2,
                domain_id,
                phase_id,
                OP_LEDGER_TRANSFERS,
                0b1,
                transfer_count,
                budget_hint,
                0b1,
                CostModel::new(2, 2, 0).unwrap(),
                Vec::new(),
            ),
        }
    }

    /// Replaces the pending-transfer slice for a fresh tick's inputs.
    pub fn set_transfers(&mut self, transfer_count: u32) {
        self.inner.reset_input(transfer_count);
    }

    /// Narrows or widens which ops this producer will act on.
    pub fn set_allowed_ops_mask(&mut self, mask: u32) {
        self.inner.set_allowed_ops_mask(mask);
    }
}

impl SubsystemProducer for EconomyProducer {
    fn system_id(&self) -> u32 {
        2
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
