// Copyright 2026 the Domino Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use domino_sched::{OrderKey, Phase, Scheduler, WorkHandler, WorkItem, WORK_TYPE_TASK};
use domino_sim::{emit_rebuild_work, DirtySet, RebuildTarget};
use domino_types::{DominoResult, GraphInstanceId, GraphTypeId, NodeId, Tick};

/// Entry point for `domino_sched`/`domino_sim` wind-tunnel benchmarks.
///
/// Registers scenarios covering the scheduler's per-tick drain loop
/// and the rebuild harness's dirty-set-to-work-item conversion, at a
/// range of work-item counts.
fn bench_scheduler(c: &mut Criterion) {
    bench_tick_drain_unbounded(c);
    bench_tick_drain_budget_bounded(c);
    bench_rebuild_emission(c);
}

struct NoopHandler;

impl WorkHandler for NoopHandler {
    fn handle(&mut self, _item: &WorkItem) -> DominoResult<()> {
        Ok(())
    }
}

fn populated_scheduler(count: u32) -> Scheduler {
    let mut sched = Scheduler::new();
    sched.begin_tick(Tick::new(1));
    for seq in 0..count {
        let key = OrderKey::new(Phase::Simulation, 0, 0, 0, 0, 0, seq);
        sched
            .enqueue_work(Phase::Simulation, WorkItem::new(key, WORK_TYPE_TASK, 1, Tick::new(1)))
            .unwrap();
    }
    sched
}

/// Drains `count` unit-cost work items through one tick with no phase
/// budget cap.
fn bench_tick_drain_unbounded(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick_drain_unbounded");
    for &count in &[10_u32, 100, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter_batched(
                || populated_scheduler(count),
                |mut sched| {
                    let mut handler = NoopHandler;
                    black_box(sched.tick(&mut handler, &[]))
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

/// Drains the same work through a tight per-tick budget, forcing most
/// items to carry over; measures the forward-progress/carryover path
/// rather than a single unbounded drain.
fn bench_tick_drain_budget_bounded(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick_drain_budget_bounded");
    for &count in &[10_u32, 100, 1_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter_batched(
                || {
                    let mut sched = populated_scheduler(count);
                    sched.set_phase_budget(Phase::Simulation, count / 4);
                    sched
                },
                |mut sched| {
                    let mut handler = NoopHandler;
                    black_box(sched.tick(&mut handler, &[]))
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

/// Converts a `count`-entry dirty node set into `PH_TOPOLOGY` work
/// items, the per-tick cost the rebuild harness pays before the
/// scheduler ever runs.
fn bench_rebuild_emission(c: &mut Criterion) {
    let mut group = c.benchmark_group("rebuild_emission");
    for &count in &[10_u32, 100, 1_000, 10_000] {
        let mut dirty = DirtySet::new();
        for i in 1..=count {
            dirty.add_node(NodeId::new(i)).unwrap();
        }
        let target = RebuildTarget {
            graph_type_id: GraphTypeId::new(1),
            graph_instance_id: GraphInstanceId::new(1),
        };
        group.bench_with_input(BenchmarkId::from_parameter(count), &dirty, |b, dirty| {
            b.iter(|| black_box(emit_rebuild_work(dirty, target, Tick::new(1), 0, |_, _, _| 1).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_scheduler);
criterion_main!(benches);
