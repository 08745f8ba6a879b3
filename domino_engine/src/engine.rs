// Copyright 2026 the Domino Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `Engine`, the crate's single external entry point (`spec.md` §6): a
//! struct that owns every piece of per-run state and exposes the
//! handful of functions an embedding game loop calls each tick.

use std::any::Any;
use std::boxed::Box;
use std::rc::Rc;
use std::vec::Vec;

use domino_graph::{Graph, GraphRegistry, Partition, RebuildVtable};
use domino_sched::{
    AccessSetBuilder, OrderKey, Phase, Scheduler, TaskGraph, TaskGraphBuilder, TaskNode, WorkHandler,
    WorkItem, WORK_TYPE_REBUILD, WORK_TYPE_TASK,
};
use domino_sim::{emit_rebuild_work, unpack_component_id, DirtySet, RebuildTarget};
use domino_systems::{AuditLog, SubsystemProducer};
use domino_types::{
    ComponentKind, DomainId, DominoError, DominoResult, GraphInstanceId, GraphTypeId, PartId, Tick,
};

use crate::report::{upstream_causes, CauseKey, ReportDetailMask, TaskCause, TickReport};
use crate::run_descriptor::RunDescriptor;
use crate::snapshot::{EngineSnapshot, GraphInstanceSnapshot};

/// One registered graph instance and everything rebuilt from its dirty
/// entries (`spec.md` §4.2/§4.3).
struct GraphEntry {
    graph_type_id: GraphTypeId,
    graph_instance_id: GraphInstanceId,
    graph: Graph,
    partition: Partition,
    dirty: DirtySet,
}

/// Owns every piece of per-run state: the graph registry, registered
/// graph instances, registered subsystems, the scheduler and its Work
/// IR builders (`spec.md` §6 "Engine").
pub struct Engine {
    run_descriptor: RunDescriptor,
    registry: GraphRegistry,
    graphs: Vec<GraphEntry>,
    systems: Vec<Box<dyn SubsystemProducer>>,
    scheduler: Scheduler,
    task_graph_builder: TaskGraphBuilder,
    access_set_builder: AccessSetBuilder,
    audit_log: AuditLog,
    detail_mask: ReportDetailMask,
    current_tick: Tick,
    next_seq: u32,
    shutdown: bool,
}

/// Builds a new engine from a run configuration (`spec.md` §6
/// "engine_init(config) -> Engine").
#[must_use]
pub fn engine_init(run_descriptor: RunDescriptor) -> Engine {
    let mut scheduler = Scheduler::new();
    for &phase in &Phase::ALL {
        scheduler.set_phase_budget(phase, run_descriptor.phase_budget(phase));
    }
    for &(domain_id, limit) in &run_descriptor.domain_budgets {
        scheduler.set_domain_budget(DomainId::new(domain_id), limit);
    }
    tracing::info!(
        schema_version = run_descriptor.schema_version,
        "engine initialized"
    );
    Engine {
        run_descriptor,
        registry: GraphRegistry::new(),
        graphs: Vec::new(),
        systems: Vec::new(),
        scheduler,
        task_graph_builder: TaskGraphBuilder::new(),
        access_set_builder: AccessSetBuilder::new(),
        audit_log: AuditLog::new(),
        detail_mask: ReportDetailMask::NONE,
        current_tick: Tick::new(0),
        next_seq: 0,
        shutdown: false,
    }
}

impl Engine {
    /// Requests that `task_causes` be populated on future `engine_tick`
    /// reports (`SPEC_FULL.md` §B.6.2). Defaults to
    /// [`ReportDetailMask::NONE`].
    pub fn set_report_detail(&mut self, mask: ReportDetailMask) {
        self.detail_mask = mask;
    }

    /// Registers a graph type. `node_schema`/`edge_schema` are opaque
    /// byte blobs the core neither interprets nor stores; no concrete
    /// schema representation is part of this core's scope
    /// (`spec.md` §6 "engine_register_graph_type").
    pub fn engine_register_graph_type(
        &mut self,
        graph_type_id: GraphTypeId,
        _node_schema: &[u8],
        _edge_schema: &[u8],
        rebuild_vtable: Option<Rc<dyn RebuildVtable>>,
    ) -> DominoResult<()> {
        self.registry.add_type(graph_type_id, rebuild_vtable)
    }

    /// Registers a graph instance of an already-registered type, with a
    /// fresh partition map and dirty set.
    pub fn engine_register_graph_instance(
        &mut self,
        graph_type_id: GraphTypeId,
        graph_instance_id: GraphInstanceId,
        graph: Graph,
        user_ctx: Box<dyn Any>,
    ) -> DominoResult<()> {
        self.registry.add_instance(graph_type_id, graph_instance_id, user_ctx)?;
        let pos = self
            .graphs
            .binary_search_by_key(&(graph_type_id, graph_instance_id), |e| {
                (e.graph_type_id, e.graph_instance_id)
            })
            .expect_err("registry just accepted this instance as new");
        self.graphs.insert(
            pos,
            GraphEntry {
                graph_type_id,
                graph_instance_id,
                graph,
                partition: Partition::new(),
                dirty: DirtySet::new(),
            },
        );
        Ok(())
    }

    /// Marks a node/edge/partition dirty on a registered graph instance,
    /// so the next `engine_tick` emits rebuild work for it.
    pub fn engine_mark_dirty(
        &mut self,
        graph_type_id: GraphTypeId,
        graph_instance_id: GraphInstanceId,
        kind: ComponentKind,
        item_id: u64,
    ) -> DominoResult<()> {
        let entry = self
            .graph_entry_mut(graph_type_id, graph_instance_id)
            .ok_or(DominoError::NotFound)?;
        match kind {
            ComponentKind::Partition => entry.dirty.add_part(PartId::new(item_id)),
            ComponentKind::Node => entry.dirty.add_node(domino_types::NodeId::new(item_id as u32)),
            ComponentKind::Edge => entry.dirty.add_edge(domino_types::EdgeId::new(item_id as u32)),
        }
    }

    fn graph_entry_mut(
        &mut self,
        graph_type_id: GraphTypeId,
        graph_instance_id: GraphInstanceId,
    ) -> Option<&mut GraphEntry> {
        self.graphs
            .iter_mut()
            .find(|e| e.graph_type_id == graph_type_id && e.graph_instance_id == graph_instance_id)
    }

    /// Registers a subsystem producer. Rejects a duplicate `system_id`.
    pub fn engine_register_system(&mut self, system: Box<dyn SubsystemProducer>) -> DominoResult<()> {
        if self.systems.iter().any(|s| s.system_id() == system.system_id()) {
            return Err(DominoError::DuplicateId);
        }
        self.systems.push(system);
        Ok(())
    }

    fn system_enabled(&self, system_id: u32) -> bool {
        self.run_descriptor.enabled_systems.is_empty()
            || self.run_descriptor.enabled_systems.contains(&system_id)
    }

    /// Runs one tick: rebuild harness, then subsystem producers, then
    /// the scheduler, per `spec.md` §4.6's five steps.
    pub fn engine_tick(&mut self, target_tick: Tick) -> TickReport {
        let _span = tracing::info_span!("engine_tick", tick = target_tick.get()).entered();

        self.scheduler.begin_tick(target_tick);
        self.task_graph_builder.reset();
        self.access_set_builder.reset();

        let mut pretick_faults: Vec<DominoError> = Vec::new();
        let mut because_of: Vec<(domino_types::TaskId, CauseKey)> = Vec::new();

        self.emit_rebuild_phase(target_tick, &mut pretick_faults, &mut because_of);
        self.emit_subsystem_phase(target_tick, &mut pretick_faults);

        let mut task_graph = TaskGraph::default();
        if let Err(e) = self.task_graph_builder.finalize(&mut task_graph) {
            pretick_faults.push(e);
        }
        self.lower_tasks(&task_graph, &mut pretick_faults);

        let mut handler = EngineWorkHandler {
            registry: &mut self.registry,
        };
        let outcome = self.scheduler.tick(&mut handler, &task_graph.phase_barriers);

        let task_causes = self.build_task_causes(&task_graph, &because_of);

        self.current_tick = target_tick;

        let mut determinism_faults = outcome.determinism_faults;
        determinism_faults.extend(pretick_faults);

        TickReport {
            faults: outcome.faults,
            determinism_faults,
            dropped_work: outcome.dropped_work,
            phase_budget_residuals: outcome.phase_budget_residuals,
            task_causes,
        }
    }

    fn emit_rebuild_phase(
        &mut self,
        target_tick: Tick,
        faults: &mut Vec<DominoError>,
        because_of: &mut Vec<(domino_types::TaskId, CauseKey)>,
    ) {
        let mut next_seq = self.next_seq;
        for entry in &mut self.graphs {
            if entry.dirty.parts().is_empty() && entry.dirty.nodes().is_empty() && entry.dirty.edges().is_empty() {
                continue;
            }
            let target = RebuildTarget {
                graph_type_id: entry.graph_type_id,
                graph_instance_id: entry.graph_instance_id,
            };
            let registry = &mut self.registry;
            let items = match emit_rebuild_work(&entry.dirty, target, target_tick, next_seq, |kind, item_id, part_id| {
                registry
                    .estimate_rebuild_cost(target.graph_type_id, target.graph_instance_id, kind, item_id, part_id)
                    .unwrap_or(1)
            }) {
                Ok(items) => items,
                Err(e) => {
                    faults.push(e);
                    continue;
                }
            };
            next_seq += items.len() as u32;
            tracing::debug!(
                graph_type_id = target.graph_type_id.get(),
                graph_instance_id = target.graph_instance_id.get(),
                count = items.len(),
                "emitted rebuild work"
            );
            for item in items {
                if let Ok((kind, item_id)) = unpack_component_id(item.key.component_id) {
                    let cause = match kind {
                        ComponentKind::Partition => CauseKey::DirtyPart(PartId::new(item_id)),
                        ComponentKind::Node => CauseKey::DirtyNode(domino_types::NodeId::new(item_id as u32)),
                        ComponentKind::Edge => CauseKey::DirtyEdge(domino_types::EdgeId::new(item_id as u32)),
                    };
                    because_of.push((domino_types::TaskId::new(item.key.component_id), cause));
                }
                if let Err(e) = self.scheduler.enqueue_work(Phase::Topology, item) {
                    faults.push(e);
                }
            }
            entry.dirty.clear();
        }
        self.next_seq = next_seq;
    }

    fn emit_subsystem_phase(&mut self, target_tick: Tick, faults: &mut Vec<DominoError>) {
        for system in &mut self.systems {
            if !self.run_descriptor.enabled_systems.is_empty()
                && !self.run_descriptor.enabled_systems.contains(&system.system_id())
            {
                continue;
            }
            let result = system.emit_tasks(
                self.current_tick,
                target_tick,
                &mut self.task_graph_builder,
                &mut self.access_set_builder,
                Some(&mut self.audit_log),
            );
            if let Err(e) = result {
                faults.push(e);
            }
        }
    }

    fn lower_tasks(&mut self, task_graph: &TaskGraph, faults: &mut Vec<DominoError>) {
        for (index, task) in task_graph.tasks.iter().enumerate() {
            let Some(phase) = phase_from_id(task.phase_id) else {
                faults.push(DominoError::IntegrityViolation {
                    what: "task phase_id is not a valid Phase discriminant",
                });
                continue;
            };
            let cost = task_cost(task, &task_graph.cost_models);
            let key = OrderKey::new(
                phase,
                task.domain_id.get(),
                0,
                0,
                task.task_id.get(),
                task.system_id,
                index as u32,
            );
            let item = WorkItem::new(key, WORK_TYPE_TASK, cost, task.next_due_tick)
                .with_policy_params(task.policy_params.clone());
            if let Err(e) = self.scheduler.enqueue_work(phase, item) {
                faults.push(e);
            }
        }
    }

    /// Builds the optional `task_causes` detail. Rebuild-triggered work
    /// and subsystem-emitted tasks are disjoint groups reported
    /// separately: a rebuild item's only form of "cause" is the dirty
    /// entry that produced it, while a subsystem task's only form of
    /// "cause" is the tasks it depends on. `because_of` entries use the
    /// rebuild item's packed `component_id` as a label, not a real
    /// `TaskId` — this report is diagnostic and never consulted by the
    /// scheduler.
    fn build_task_causes(
        &self,
        task_graph: &TaskGraph,
        because_of: &[(domino_types::TaskId, CauseKey)],
    ) -> Vec<TaskCause> {
        if self.detail_mask == ReportDetailMask::NONE {
            return Vec::new();
        }
        let mut causes = Vec::new();
        if self.detail_mask.contains(ReportDetailMask::BECAUSE_OF) {
            causes.extend(because_of.iter().map(|(task_id, cause)| TaskCause {
                task_id: *task_id,
                because_of: Some(*cause),
                why_path: None,
            }));
        }
        if self.detail_mask.contains(ReportDetailMask::WHY_PATH) {
            causes.extend(task_graph.tasks.iter().map(|task| TaskCause {
                task_id: task.task_id,
                because_of: None,
                why_path: Some(upstream_causes(task.task_id, &task_graph.deps)),
            }));
        }
        causes
    }

    /// Discards every pending phase queue and marks the engine shut
    /// down; no further ticks may be run (`spec.md` §5 "Engine shutdown
    /// cancels the whole tick by discarding pending queues").
    pub fn engine_shutdown(&mut self) {
        self.scheduler = Scheduler::new();
        self.shutdown = true;
        tracing::info!("engine shut down");
    }

    /// `true` once [`Self::engine_shutdown`] has been called.
    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        self.shutdown
    }

    /// Captures registered graphs, partitions, dirty sets, and scheduler
    /// carryover queues (`spec.md` §6 "snapshot()/restore()"). See
    /// [`EngineSnapshot`]'s doc comment for what is deliberately left
    /// out (registry `user_ctx`, subsystem cursors).
    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            graphs: self
                .graphs
                .iter()
                .map(|e| GraphInstanceSnapshot {
                    graph_type_id: e.graph_type_id,
                    graph_instance_id: e.graph_instance_id,
                    graph: e.graph.clone(),
                    partition: e.partition.clone(),
                    dirty: e.dirty.clone(),
                })
                .collect(),
            carryover: Phase::ALL
                .into_iter()
                .map(|phase| (phase, self.scheduler.phase_queue(phase).clone()))
                .collect(),
            current_tick: self.current_tick,
        }
    }

    /// Restores graph/partition/dirty-set state and scheduler carryover
    /// queues from a prior [`Self::snapshot`]. Every graph instance named
    /// in `snapshot` must already be registered (via
    /// [`Self::engine_register_graph_instance`]) on `self`; an instance
    /// the snapshot names but `self` does not have registered is an
    /// [`DominoError::IntegrityViolation`], since restoring into an
    /// engine with a different registered instance set cannot be
    /// deterministic.
    pub fn restore(&mut self, snapshot: EngineSnapshot) -> DominoResult<()> {
        for entry in snapshot.graphs {
            let target = self
                .graph_entry_mut(entry.graph_type_id, entry.graph_instance_id)
                .ok_or(DominoError::IntegrityViolation {
                    what: "restore() named a graph instance that is not registered",
                })?;
            target.graph = entry.graph;
            target.partition = entry.partition;
            target.dirty = entry.dirty;
        }
        for (phase, queue) in snapshot.carryover {
            self.scheduler.set_phase_queue(phase, queue);
        }
        self.current_tick = snapshot.current_tick;
        Ok(())
    }
}

fn phase_from_id(raw: u16) -> Option<Phase> {
    Phase::ALL.into_iter().find(|p| *p as u16 == raw)
}

fn task_cost(task: &TaskNode, cost_models: &[domino_sched::CostModel]) -> u32 {
    cost_models
        .iter()
        .find(|cm| cm.id == task.cost_model_id)
        .map_or(1, |cm| cm.estimated_units.max(1))
}

/// The engine's own work handler: rebuild items dispatch to the graph
/// registry, task items are recorded only by the scheduler's own
/// `executed_task_ids` tracking. Actual task business logic belongs to
/// the embedding game runtime, outside this core's scope
/// (`spec.md` §6 "the core's external boundary is the embedding game
/// runtime").
struct EngineWorkHandler<'a> {
    registry: &'a mut GraphRegistry,
}

impl WorkHandler for EngineWorkHandler<'_> {
    fn handle(&mut self, item: &WorkItem) -> DominoResult<()> {
        if item.work_type_id == WORK_TYPE_REBUILD {
            let graph_type_id = GraphTypeId::new(item.key.type_id);
            let graph_instance_id = GraphInstanceId::new(item.key.entity_id);
            let part_id = PartId::new(item.key.chunk_id);
            let (kind, item_id) = unpack_component_id(item.key.component_id)?;
            self.registry
                .dispatch_rebuild(graph_type_id, graph_instance_id, kind, item_id, part_id)
        } else {
            Ok(())
        }
    }
}
