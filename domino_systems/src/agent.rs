// Copyright 2026 the Domino Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The agent producer: cohort aggregation over the agent population.
//! Grounded in `agent_system.h`'s `dom_agent_task_op` (this producer
//! covers `DOM_AGENT_TASK_AGGREGATE_COHORTS`) and
//! `agent_aggregation_tasks.cpp`'s slice-at-a-time cohort processing.

use alloc::vec::Vec;

use domino_sched::{AccessSetBuilder, CostModel, TaskGraphBuilder};
use domino_types::{DomainId, DominoResult, Tick};

use crate::audit::AuditLog;
use crate::producer::{FidelityTier, SubsystemProducer};
use crate::slice_producer::SliceProducer;

/// `DOM_AGENT_TASK_AGGREGATE_COHORTS` from `agent_system.h`.
pub const OP_AGGREGATE_COHORTS: u32 = 7;

/// Emits one cohort-aggregation task per call over the agent
/// population, resuming via a stored cursor.
#[derive(Clone, Debug)]
pub struct AgentProducer {
    inner: SliceProducer,
}

impl AgentProducer {
    /// Builds an agent producer over a population of `population_count`
    /// entries.
    #[must_use]
    pub fn new(domain_id: DomainId, phase_id: u16, population_count: u32, budget_hint: u32) -> Self {
        Self {
            inner: SliceProducer::new(
                1,
                domain_id,
                phase_id,
                OP_AGGREGATE_COHORTS,
                0b1,
                population_count,
                budget_hint,
                0b1,
                CostModel::new(1, 4, 0).unwrap(),
                Vec::new(),
            ),
        }
    }

    /// Replaces the population slice for a fresh tick's inputs.
    pub fn set_population(&mut self, population_count: u32) {
        self.inner.reset_input(population_count);
    }

    /// Narrows or widens which ops this producer will act on.
    pub fn set_allowed_ops_mask(&mut self, mask: u32) {
        self.inner.set_allowed_ops_mask(mask);
    }
}

impl SubsystemProducer for AgentProducer {
    fn system_id(&self) -> u32 {
        1
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
