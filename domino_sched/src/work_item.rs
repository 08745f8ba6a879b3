// Copyright 2026 the Domino Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `WorkItem` (`spec.md` §3 "Work item", §4.5).

use domino_types::{Tick, TypeId};

use crate::order_key::OrderKey;
use crate::payload::Payload;

/// A reserved `work_type_id` used by the rebuild harness (`domino_sim`)
/// for items whose semantics are "decode a dirty-entity rebuild request
/// from this item's `OrderKey`" (`spec.md` §4.4).
pub const WORK_TYPE_REBUILD: TypeId = TypeId::new(1);

/// A reserved `work_type_id` used for items lowered from a finalized
/// `TaskGraph` (`spec.md` §4.7/§4.8): `component_id` carries the task's
/// `TaskId`, `payload` carries the task's `policy_params`.
pub const WORK_TYPE_TASK: TypeId = TypeId::new(2);

/// One schedulable unit. Payload is value-copied, never shared mutable
/// state (`spec.md` §3 "Payload is value-copied (no sharing)").
#[derive(Clone, Debug)]
pub struct WorkItem {
    /// Total order over all work items in a tick.
    pub key: OrderKey,
    /// What kind of work this is; interpreted by the registered handler.
    pub work_type_id: TypeId,
    /// Scheduler budget cost, already clamped to be at least `1` by
    /// whichever producer estimated it.
    pub cost_units: u32,
    /// Tick this item was enqueued on.
    pub enqueue_tick: Tick,
    /// Value-copied payload.
    pub payload: Payload,
    /// Value-copied policy parameters (e.g. "which slice to process").
    pub policy_params: Payload,
}

impl WorkItem {
    /// Builds a work item with empty payload/policy params.
    #[must_use]
    pub fn new(key: OrderKey, work_type_id: TypeId, cost_units: u32, enqueue_tick: Tick) -> Self {
        Self {
            key,
            work_type_id,
            cost_units,
            enqueue_tick,
            payload: Payload::empty(),
            policy_params: Payload::empty(),
        }
    }

    /// Sets the payload, returning `self` for chaining.
    #[must_use]
    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    /// Sets the policy params, returning `self` for chaining.
    #[must_use]
    pub fn with_policy_params(mut self, policy_params: Payload) -> Self {
        self.policy_params = policy_params;
        self
    }
}
