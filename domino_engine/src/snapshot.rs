// Copyright 2026 the Domino Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The `snapshot()`/`restore()` data shape (`spec.md` §6 "Persisted state
//! layout").
//!
//! `spec.md` asks for five things to round-trip: registered graphs,
//! partitions, dirty sets, scheduler carryover queues, and system
//! runtime cursors. This crate's `Engine` owns the first four directly
//! and captures them here; the fifth is deliberately out of reach of a
//! generic snapshot (see the note on [`EngineSnapshot`] below) since
//! `spec.md` §1 treats concrete subsystem semantics, including their
//! cursor representations, as external collaborators this core does not
//! define. The wire format these types are serialized to is, per
//! `spec.md` §6, unspecified here ("byte-stable but specified
//! elsewhere").

use domino_graph::{Graph, Partition};
use domino_sched::{Phase, WorkQueue};
use domino_sim::DirtySet;
use domino_types::{GraphInstanceId, GraphTypeId, Tick};

/// One registered graph instance's full mutable state at the moment of
/// a snapshot.
#[derive(Clone, Debug)]
pub struct GraphInstanceSnapshot {
    /// Which registered type this instance belongs to.
    pub graph_type_id: GraphTypeId,
    /// This instance's id.
    pub graph_instance_id: GraphInstanceId,
    /// The instance's node/edge tables and adjacency.
    pub graph: Graph,
    /// The instance's node-to-partition mapping.
    pub partition: Partition,
    /// The instance's accumulated (not yet rebuilt) dirty entries.
    pub dirty: DirtySet,
}

/// Everything [`crate::Engine::snapshot`] captures.
///
/// Deliberately excludes the graph registry's `user_ctx`/vtable
/// bindings and each subsystem's runtime cursor: both are embedder- or
/// producer-owned opaque state (`Box<dyn core::any::Any>`, a boxed
/// `SubsystemProducer`) with no generic serialization the core can
/// perform on their behalf. Restoring a snapshot therefore assumes the
/// embedder has already re-registered the same graph types/instances
/// and subsystems it had when the snapshot was taken; only the
/// per-instance graph/partition/dirty state and the scheduler's
/// carryover queues are replaced.
#[derive(Clone, Debug, Default)]
pub struct EngineSnapshot {
    /// One entry per registered graph instance, in the engine's
    /// internal `(graph_type_id, graph_instance_id)` order.
    pub graphs: Vec<GraphInstanceSnapshot>,
    /// Scheduler carryover queues, one per phase in `Phase::ALL` order.
    pub carryover: Vec<(Phase, WorkQueue)>,
    /// The tick the engine had last processed when the snapshot was
    /// taken.
    pub current_tick: Tick,
}
