// Copyright 2026 the Domino Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A reusable cursor/budget-bounded slice producer, grounded in
//! `agent_system.h`'s `dom_agent_task_params {op, start_index, count}`
//! and `agent_aggregation_tasks.cpp`'s cohort-slice processing.
//!
//! Every concrete producer in this crate (`Agent`, `Economy`,
//! `Governance`, `Interest`, `Market`) is a thin wrapper over one of
//! these: each processes one bounded input slice per tick, resuming
//! deterministically across budget-limited calls via a stored cursor.

use alloc::vec::Vec;

use domino_sched::{AccessSetBuilder, CommitKey, CostModel, Payload, Range, TaskGraphBuilder, TaskNode};
use domino_types::{DomainId, DominoResult, TaskId, Tick};

use crate::audit::{AuditEntry, AuditLog};
use crate::producer::FidelityTier;

/// Policy parameters a slice task carries: `{op, start_index, count}`,
/// packed as three little-endian `u32`s (`spec.md` §4.8 "a value-copied
/// byte block describing which slice of its input to process").
fn encode_policy_params(op: u32, start_index: u32, count: u32) -> Payload {
    let mut bytes = [0u8; 12];
    bytes[0..4].copy_from_slice(&op.to_le_bytes());
    bytes[4..8].copy_from_slice(&start_index.to_le_bytes());
    bytes[8..12].copy_from_slice(&count.to_le_bytes());
    Payload::from_slice(&bytes)
}

/// Decodes the `{op, start_index, count}` triple `encode_policy_params`
/// produced.
#[must_use]
pub fn decode_policy_params(payload: &Payload) -> Option<(u32, u32, u32)> {
    let bytes = payload.as_slice();
    if bytes.len() != 12 {
        return None;
    }
    let op = u32::from_le_bytes(bytes[0..4].try_into().ok()?);
    let start_index = u32::from_le_bytes(bytes[4..8].try_into().ok()?);
    let count = u32::from_le_bytes(bytes[8..12].try_into().ok()?);
    Some((op, start_index, count))
}

/// Cursor/budget-bounded emitter of one-op, one-slice-per-call tasks.
#[derive(Clone, Debug)]
pub struct SliceProducer {
    system_id: u32,
    domain_id: DomainId,
    phase_id: u16,
    op: u32,
    op_bit: u32,
    total_items: u32,
    budget_hint: u32,
    allowed_ops_mask: u32,
    cost_model: CostModel,
    law_targets: Vec<u32>,
    next_due_tick: Tick,
    cursor: u32,
    fidelity_tier: FidelityTier,
    pending_tier: Option<(FidelityTier, &'static str)>,
    next_task_id: u64,
}

impl SliceProducer {
    /// Builds a producer over `total_items` input items, processing at
    /// most `budget_hint` per `emit_tasks` call.
    #[must_use]
    pub fn new(
        system_id: u32,
        domain_id: DomainId,
        phase_id: u16,
        op: u32,
        op_bit: u32,
        total_items: u32,
        budget_hint: u32,
        allowed_ops_mask: u32,
        cost_model: CostModel,
        law_targets: Vec<u32>,
    ) -> Self {
        Self {
            system_id,
            domain_id,
            phase_id,
            op,
            op_bit,
            total_items,
            budget_hint,
            allowed_ops_mask,
            cost_model,
            law_targets,
            next_due_tick: Tick::new(0),
            cursor: 0,
            fidelity_tier: FidelityTier::FULL,
            pending_tier: None,
            next_task_id: 1,
        }
    }

    /// Replaces the input slice and resets the cursor to the start,
    /// e.g. when a new batch of work arrives for this producer.
    pub fn reset_input(&mut self, total_items: u32) {
        self.total_items = total_items;
        self.cursor = 0;
    }

    /// Replaces the allowed-ops gating mask.
    pub fn set_allowed_ops_mask(&mut self, mask: u32) {
        self.allowed_ops_mask = mask;
    }

    /// The next tick this producer is due to run again.
    #[must_use]
    pub fn next_due_tick(&self) -> Tick {
        self.next_due_tick
    }

    /// Current operating fidelity tier.
    #[must_use]
    pub fn fidelity_tier(&self) -> FidelityTier {
        self.fidelity_tier
    }

    /// Requests a coarser tier for the next `emit_tasks` call
    /// (`spec.md` §4.8 "degrade").
    pub fn request_degrade(&mut self, tier: FidelityTier, reason: &'static str) {
        self.pending_tier = Some((tier, reason));
    }

    /// Emits at most one task covering up to `budget_hint` remaining
    /// items, resuming from the stored cursor. Emits zero tasks if
    /// `now_tick < next_due_tick`, if `allowed_ops_mask`'s bit for this
    /// producer's op is `0`, or if the input is fully drained.
    pub fn emit_tasks(
        &mut self,
        now_tick: Tick,
        target_tick: Tick,
        work_graph_builder: &mut TaskGraphBuilder,
        access_set_builder: &mut AccessSetBuilder,
        audit: Option<&mut AuditLog>,
    ) -> DominoResult<()> {
        if let Some((tier, reason)) = self.pending_tier.take() {
            tracing::debug!(system_id = self.system_id, ?tier, reason, "applying fidelity degrade");
            self.fidelity_tier = tier;
        }

        if now_tick.get() < self.next_due_tick.get() {
            return Ok(());
        }

        if self.allowed_ops_mask & self.op_bit == 0 {
            self.next_due_tick = target_tick;
            return Ok(());
        }

        let remaining = self.total_items.saturating_sub(self.cursor);
        if remaining == 0 {
            self.next_due_tick = target_tick;
            return Ok(());
        }

        let count = remaining.min(self.budget_hint.max(1));
        let start_index = self.cursor;

        access_set_builder.add_write(Range {
            resource_id: u64::from(self.system_id),
            start: u64::from(start_index),
            len: u64::from(count),
        })?;
        let access_set = access_set_builder.finalize()?;

        let task_id = TaskId::new(self.next_task_id);
        self.next_task_id += 1;

        work_graph_builder.add_task(TaskNode {
            task_id,
            system_id: self.system_id,
            category: self.op,
            determinism_class: 0,
            fidelity_tier: self.fidelity_tier.0,
            domain_id: self.domain_id,
            phase_id: self.phase_id,
            commit_key: CommitKey {
                phase_id: self.phase_id,
                task_id: task_id.get(),
                sub_index: 0,
            },
            access_set_id: access_set.id,
            cost_model_id: self.cost_model.id,
            law_targets: self.law_targets.clone(),
            policy_params: encode_policy_params(self.op, start_index, count),
            next_due_tick: target_tick,
        });
        work_graph_builder.add_cost_model(self.cost_model);

        if let Some(log) = audit {
            log.record(AuditEntry {
                tick: now_tick,
                system_id: self.system_id,
                op: self.op,
                start_index,
                count,
            });
        }

        self.cursor += count;
        self.next_due_tick = target_tick;
        Ok(())
    }
}
