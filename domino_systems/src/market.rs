// Copyright 2026 the Domino Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The market producer: order matching over a clearinghouse's open
//! order book. Grounded loosely in `dom_market_clearinghouse.cpp`;
//! unlike the agent/economy/governance/interest systems, the market
//! runtime in `original_source/` predates the Work-IR migration (no
//! `DOM_MARKET_TASK_*` op enum exists), so this producer's op token is
//! newly assigned rather than ported.

use alloc::vec::Vec;

use domino_sched::{AccessSetBuilder, CostModel, TaskGraphBuilder};
use domino_types::{DomainId, DominoResult, Tick};

use crate::audit::AuditLog;
use crate::producer::{FidelityTier, SubsystemProducer};
use crate::slice_producer::SliceProducer;

/// Producer-local token for the order-matching op.
pub const OP_MATCH_ORDERS: u32 = 1;

/// Emits one order-matching task per call over a clearinghouse's open
/// order book.
#[derive(Clone, Debug)]
pub struct MarketProducer {
    inner: SliceProducer,
}

impl MarketProducer {
    /// Builds a market producer over `order_count` open orders.
    #[must_use]
    pub fn new(domain_id: DomainId, phase_id: u16, order_count: u32, budget_hint: u32) -> Self {
        Self {
            inner: SliceProducer::new(
                5,
                domain_id,
                phase_id,
                OP_MATCH_ORDERS,
                0b1,
                order_count,
                budget_hint,
                0b1,
                CostModel::new(5, 5, 0).unwrap(),
                Vec::new(),
            ),
        }
    }

    /// Replaces the order-book slice for a fresh tick's inputs.
    pub fn set_orders(&mut self, order_count: u32) {
        self.inner.reset_input(order_count);
    }

    /// Narrows or widens which ops this producer will act on.
    pub fn set_allowed_ops_mask(&mut self, mask: u32) {
        self.inner.set_allowed_ops_mask(mask);
    }
}

impl SubsystemProducer for MarketProducer {
    fn system_id(&self) -> u32 {
        5
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
