// Copyright 2026 the Domino Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end regression coverage for budget-bounded rebuild deferral
//! and subsystem producer determinism (`spec.md` §8 scenarios 5-6),
//! exercised through `domino_engine`'s public `Engine` and
//! `domino_systems`'s public `AgentProducer`.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use domino_engine::{engine_init, Engine, RunDescriptor};
use domino_graph::RebuildVtable;
use domino_sched::{AccessSetBuilder, Phase, TaskGraph, TaskGraphBuilder};
use domino_systems::{decode_policy_params, AgentProducer, SubsystemProducer};
use domino_types::{ComponentKind, DomainId, DominoResult, GraphInstanceId, GraphTypeId, PartId, Tick};

/// Charges 5 units per partition rebuild, records the order partitions
/// were actually executed in. Shared via `Rc<RefCell<_>>` since the
/// vtable (not the per-instance context) is what this test inspects.
struct PartitionCostVtable {
    executed: Rc<RefCell<Vec<u64>>>,
}

impl RebuildVtable for PartitionCostVtable {
    fn estimate_cost_units(
        &self,
        _instance_ctx: &mut dyn Any,
        kind: ComponentKind,
        _item_id: u64,
        _part_id: PartId,
    ) -> u32 {
        match kind {
            ComponentKind::Partition => 5,
            ComponentKind::Node | ComponentKind::Edge => 1,
        }
    }

    fn execute(
        &self,
        _instance_ctx: &mut dyn Any,
        kind: ComponentKind,
        item_id: u64,
        _part_id: PartId,
    ) -> DominoResult<()> {
        if kind == ComponentKind::Partition {
            self.executed.borrow_mut().push(item_id);
        }
        Ok(())
    }
}

fn mark_four_partitions_dirty(engine: &mut Engine) {
    for part in 1..=4u64 {
        engine
            .engine_mark_dirty(GraphTypeId::new(1), GraphInstanceId::new(1), ComponentKind::Partition, part)
            .unwrap();
    }
}

#[test]
fn budget_bounded_rebuild_deferral_matches_unbounded_single_tick_outcome() {
    // Bounded run: a 10-unit Topology budget forces the four 5-unit
    // partition rebuilds to spread over two ticks.
    let bounded_log = Rc::new(RefCell::new(Vec::new()));
    let mut bounded_descriptor = RunDescriptor::default();
    bounded_descriptor.phase_budget_limits[Phase::Topology as u16 as usize] = 10;
    let mut bounded = engine_init(bounded_descriptor);
    bounded
        .engine_register_graph_type(
            GraphTypeId::new(1),
            &[],
            &[],
            Some(Rc::new(PartitionCostVtable {
                executed: bounded_log.clone(),
            })),
        )
        .unwrap();
    bounded
        .engine_register_graph_instance(
            GraphTypeId::new(1),
            GraphInstanceId::new(1),
            domino_graph::Graph::new(),
            Box::new(()),
        )
        .unwrap();
    mark_four_partitions_dirty(&mut bounded);

    let first = bounded.engine_tick(Tick::new(1));
    assert!(first.is_clean());
    assert_eq!(first.dropped_work, 2);
    assert_eq!(*bounded_log.borrow(), vec![1, 2]);

    let second = bounded.engine_tick(Tick::new(2));
    assert!(second.is_clean());
    assert_eq!(second.dropped_work, 0);
    assert_eq!(*bounded_log.borrow(), vec![1, 2, 3, 4]);

    // Unbounded run: the same four partitions, dirtied and ticked once,
    // with no Topology budget cap at all.
    let unbounded_log = Rc::new(RefCell::new(Vec::new()));
    let mut unbounded = engine_init(RunDescriptor::default());
    unbounded
        .engine_register_graph_type(
            GraphTypeId::new(1),
            &[],
            &[],
            Some(Rc::new(PartitionCostVtable {
                executed: unbounded_log.clone(),
            })),
        )
        .unwrap();
    unbounded
        .engine_register_graph_instance(
            GraphTypeId::new(1),
            GraphInstanceId::new(1),
            domino_graph::Graph::new(),
            Box::new(()),
        )
        .unwrap();
    mark_four_partitions_dirty(&mut unbounded);

    let only_tick = unbounded.engine_tick(Tick::new(1));
    assert!(only_tick.is_clean());
    assert_eq!(only_tick.dropped_work, 0);

    // Same final executed set and order regardless of how the work was
    // split across ticks: deferral changes wall-clock progress, not the
    // deterministic outcome.
    assert_eq!(*bounded_log.borrow(), *unbounded_log.borrow());
}

/// Runs one `AgentProducer` to exhaustion over `population` items with
/// a single `emit_tasks` call per tick, returning the `(start, count)`
/// slices it emitted in order.
fn drain_producer(mut producer: AgentProducer, ticks: u64) -> Vec<(u32, u32)> {
    let mut slices = Vec::new();
    for tick in 0..ticks {
        let mut wgb = TaskGraphBuilder::new();
        let mut asb = AccessSetBuilder::new();
        producer
            .emit_tasks(Tick::new(tick), Tick::new(tick + 1), &mut wgb, &mut asb, None)
            .unwrap();
        let mut graph = TaskGraph::default();
        wgb.finalize(&mut graph).unwrap();
        for task in &graph.tasks {
            let (_, start, count) = decode_policy_params(&task.policy_params).unwrap();
            slices.push((start, count));
        }
    }
    slices
}

#[test]
fn agent_producer_batch_and_step_coverage_are_observably_equivalent() {
    const POPULATION: u32 = 37;

    let batch = AgentProducer::new(DomainId::new(1), Phase::Simulation as u16, POPULATION, POPULATION);
    let batch_slices = drain_producer(batch, 1);

    let stepped = AgentProducer::new(DomainId::new(1), Phase::Simulation as u16, POPULATION, 4);
    let stepped_slices = drain_producer(stepped, 10);

    let coverage_of = |slices: &[(u32, u32)]| -> Vec<bool> {
        let mut covered = vec![false; POPULATION as usize];
        for &(start, count) in slices {
            for i in start..start + count {
                assert!(!covered[i as usize], "item {i} processed twice");
                covered[i as usize] = true;
            }
        }
        covered
    };

    let batch_coverage = coverage_of(&batch_slices);
    let stepped_coverage = coverage_of(&stepped_slices);
    assert!(batch_coverage.iter().all(|&c| c));
    assert_eq!(batch_coverage, stepped_coverage);

    let batch_total: u32 = batch_slices.iter().map(|&(_, c)| c).sum();
    let stepped_total: u32 = stepped_slices.iter().map(|&(_, c)| c).sum();
    assert_eq!(batch_total, POPULATION);
    assert_eq!(stepped_total, POPULATION);
}
