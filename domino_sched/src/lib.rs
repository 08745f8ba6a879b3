// Copyright 2026 the Domino Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Work IR and deterministic scheduler for the Domino simulation core.
//!
//! Dependency order within this crate, leaves first: `order_key` →
//! `payload` → `work_item` → `work_queue` → `access` → `cost_model` →
//! `task_graph` → `scheduler`.

#![no_std]

extern crate alloc;

mod access;
mod cost_model;
mod order_key;
mod payload;
mod scheduler;
mod task_graph;
mod work_item;
mod work_queue;

pub use access::{AccessClass, AccessSet, AccessSetBuilder, Range};
pub use cost_model::{CostModel, CostModelId};
pub use order_key::{OrderKey, Phase};
pub use payload::{Payload, INLINE_CAPACITY};
pub use scheduler::{FailureRecord, PhaseBudgetResidual, Scheduler, TickOutcome, WorkHandler};
pub use task_graph::{CommitKey, DependencyEdge, PhaseBarrier, TaskGraph, TaskGraphBuilder, TaskNode};
pub use work_item::{WorkItem, WORK_TYPE_REBUILD, WORK_TYPE_TASK};
pub use work_queue::WorkQueue;
