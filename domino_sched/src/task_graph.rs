// Copyright 2026 the Domino Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-tick Work IR: `TaskGraph` and its builder (`spec.md` §4.7).

use alloc::vec::Vec;

use domino_types::{DomainId, DominoError, DominoResult, TaskId, Tick};

use crate::cost_model::{CostModel, CostModelId};

/// `(phase_id, task_id, sub_index)`, the sort key tasks are stably
/// ordered by at `finalize` (`spec.md` §3 "Task node").
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct CommitKey {
    /// Phase the task belongs to.
    pub phase_id: u16,
    /// Task identifier.
    pub task_id: u64,
    /// Sub-ordering within a task emitted as multiple pieces.
    pub sub_index: u32,
}

/// A work item as seen by the executor (`spec.md` §3 "Task node").
#[derive(Clone, Debug)]
pub struct TaskNode {
    /// Unique task identifier within the graph.
    pub task_id: TaskId,
    /// Producer's stable system id (`spec.md` §4.8).
    pub system_id: u32,
    /// Producer-defined task category token.
    pub category: u32,
    /// Producer-defined determinism classification token.
    pub determinism_class: u8,
    /// Current fidelity tier this task was emitted at.
    pub fidelity_tier: u8,
    /// Budget domain this task's cost is charged against
    /// (`spec.md` §4.6 "per-domain budget").
    pub domain_id: DomainId,
    /// Phase this task runs in.
    pub phase_id: u16,
    /// Stable sort key within the graph.
    pub commit_key: CommitKey,
    /// Which [`crate::access::AccessSet`] this task declares.
    pub access_set_id: u64,
    /// Which [`CostModel`] estimates this task's cost.
    pub cost_model_id: CostModelId,
    /// Opaque tokens naming which invariants ("laws") this task affects.
    pub law_targets: Vec<u32>,
    /// Value-copied policy parameters (which slice of input to process).
    pub policy_params: crate::payload::Payload,
    /// Next tick this task's producer is due to run again.
    pub next_due_tick: Tick,
}

/// An edge recording that `from_task_id` must complete before
/// `to_task_id` runs, for some producer-defined `reason_id`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DependencyEdge {
    /// Upstream task.
    pub from_task_id: TaskId,
    /// Downstream task.
    pub to_task_id: TaskId,
    /// Producer-defined reason token, retained for diagnostics.
    pub reason_id: u32,
}

/// "Every task listed in `before` must complete before any task listed
/// in `after` runs" (`spec.md` §3 "Phase barrier").
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PhaseBarrier {
    /// Phase this barrier applies to.
    pub phase_id: u16,
    /// Tasks that must complete first.
    pub before_tasks: Vec<TaskId>,
    /// Tasks gated on `before_tasks`.
    pub after_tasks: Vec<TaskId>,
}

/// The finalized, per-tick Work IR (`spec.md` §4.7 "Work graph builder").
#[derive(Clone, Debug, Default)]
pub struct TaskGraph {
    /// Identifies which logical graph this Work IR was built for.
    pub graph_id: u64,
    /// Monotonic epoch, bumped each time the graph is rebuilt from
    /// scratch (as opposed to carried over).
    pub epoch_id: u64,
    /// Tasks, sorted by `commit_key` after `finalize`.
    pub tasks: Vec<TaskNode>,
    /// Dependency edges, sorted by `(from, to, reason_id)` after
    /// `finalize`.
    pub deps: Vec<DependencyEdge>,
    /// Phase barriers registered this tick.
    pub phase_barriers: Vec<PhaseBarrier>,
    /// Cost models referenced by this tick's tasks.
    pub cost_models: Vec<CostModel>,
}

/// Accumulates tasks/dependencies/barriers across a tick and validates
/// + sorts them into a [`TaskGraph`] at `finalize` (`spec.md` §4.7).
#[derive(Debug, Default)]
pub struct TaskGraphBuilder {
    graph_id: u64,
    epoch_id: u64,
    tasks: Vec<TaskNode>,
    deps: Vec<DependencyEdge>,
    phase_barriers: Vec<PhaseBarrier>,
    cost_models: Vec<CostModel>,
}

impl TaskGraphBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all internal buffers, preserving capacities.
    pub fn reset(&mut self) {
        self.graph_id = 0;
        self.epoch_id = 0;
        self.tasks.clear();
        self.deps.clear();
        self.phase_barriers.clear();
        self.cost_models.clear();
    }

    /// Sets the identifying pair for the graph under construction.
    pub fn set_ids(&mut self, graph_id: u64, epoch_id: u64) {
        self.graph_id = graph_id;
        self.epoch_id = epoch_id;
    }

    /// Appends a task node.
    pub fn add_task(&mut self, task: TaskNode) {
        self.tasks.push(task);
    }

    /// Appends a dependency edge.
    pub fn add_dependency(&mut self, from_task_id: TaskId, to_task_id: TaskId, reason_id: u32) {
        self.deps.push(DependencyEdge {
            from_task_id,
            to_task_id,
            reason_id,
        });
    }

    /// Appends a phase barrier.
    pub fn add_phase_barrier(&mut self, phase_id: u16, before: Vec<TaskId>, after: Vec<TaskId>) {
        self.phase_barriers.push(PhaseBarrier {
            phase_id,
            before_tasks: before,
            after_tasks: after,
        });
    }

    /// Registers a cost model referenced by this tick's tasks.
    pub fn add_cost_model(&mut self, cost_model: CostModel) {
        self.cost_models.push(cost_model);
    }

    /// Validates and sorts the accumulated graph into `out`.
    ///
    /// Validation: no duplicate `task_id`; every barrier task reference
    /// exists; dependencies form a DAG. Tasks are stably sorted by
    /// `commit_key` using insertion sort (small `N` expected, stability
    /// required); dependency edges are sorted by
    /// `(from, to, reason_id)`.
    pub fn finalize(&mut self, out: &mut TaskGraph) -> DominoResult<()> {
        let mut ids: Vec<u64> = self.tasks.iter().map(|t| t.task_id.get()).collect();
        ids.sort_unstable();
        if ids.windows(2).any(|w| w[0] == w[1]) {
            return Err(DominoError::IntegrityViolation {
                what: "duplicate task_id in task graph",
            });
        }

        for barrier in &self.phase_barriers {
            for id in barrier.before_tasks.iter().chain(barrier.after_tasks.iter()) {
                if !self.tasks.iter().any(|t| t.task_id == *id) {
                    return Err(DominoError::IntegrityViolation {
                        what: "phase barrier references unknown task",
                    });
                }
            }
        }

        check_acyclic(&self.tasks, &self.deps)?;

        insertion_sort_by_key(&mut self.tasks, |t| t.commit_key);
        self.deps
            .sort_by_key(|d| (d.from_task_id.get(), d.to_task_id.get(), d.reason_id));

        out.graph_id = self.graph_id;
        out.epoch_id = self.epoch_id;
        out.tasks = core::mem::take(&mut self.tasks);
        out.deps = core::mem::take(&mut self.deps);
        out.phase_barriers = core::mem::take(&mut self.phase_barriers);
        out.cost_models = core::mem::take(&mut self.cost_models);
        Ok(())
    }
}

fn insertion_sort_by_key<T, K: Ord>(items: &mut [T], key: impl Fn(&T) -> K) {
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && key(&items[j - 1]) > key(&items[j]) {
            items.swap(j - 1, j);
            j -= 1;
        }
    }
}

fn check_acyclic(tasks: &[TaskNode], deps: &[DependencyEdge]) -> DominoResult<()> {
    let mut indegree: Vec<(u64, u32)> = tasks.iter().map(|t| (t.task_id.get(), 0)).collect();
    indegree.sort_unstable_by_key(|(id, _)| *id);
    for d in deps {
        if let Ok(idx) = indegree.binary_search_by_key(&d.to_task_id.get(), |(id, _)| *id) {
            indegree[idx].1 += 1;
        } else {
            return Err(DominoError::IntegrityViolation {
                what: "dependency references unknown task",
            });
        }
    }

    let mut queue: Vec<u64> = indegree.iter().filter(|(_, deg)| *deg == 0).map(|(id, _)| *id).collect();
    let mut visited = 0usize;
    while let Some(id) = queue.pop() {
        visited += 1;
        for d in deps.iter().filter(|d| d.from_task_id.get() == id) {
            let idx = indegree
                .binary_search_by_key(&d.to_task_id.get(), |(tid, _)| *tid)
                .expect("validated above");
            indegree[idx].1 -= 1;
            if indegree[idx].1 == 0 {
                queue.push(d.to_task_id.get());
            }
        }
    }

    if visited != tasks.len() {
        return Err(DominoError::Cycle);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::Payload;

    fn task(task_id: u64, phase_id: u16, sub_index: u32) -> TaskNode {
        TaskNode {
            task_id: TaskId::new(task_id),
            system_id: 1,
            category: 0,
            determinism_class: 0,
            fidelity_tier: 0,
            domain_id: DomainId::new(1),
            phase_id,
            commit_key: CommitKey {
                phase_id,
                task_id,
                sub_index,
            },
            access_set_id: 0,
            cost_model_id: CostModelId::new(1).unwrap(),
            law_targets: Vec::new(),
            policy_params: Payload::empty(),
            next_due_tick: Tick::new(0),
        }
    }

    #[test]
    fn finalize_sorts_by_commit_key() {
        let mut b = TaskGraphBuilder::new();
        b.add_task(task(2, 0, 0));
        b.add_task(task(1, 0, 0));
        b.add_task(task(3, 1, 0));
        let mut out = TaskGraph::default();
        b.finalize(&mut out).unwrap();
        let ids: Vec<u64> = out.tasks.iter().map(|t| t.task_id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn duplicate_task_id_rejected() {
        let mut b = TaskGraphBuilder::new();
        b.add_task(task(1, 0, 0));
        b.add_task(task(1, 0, 1));
        let mut out = TaskGraph::default();
        assert!(matches!(
            b.finalize(&mut out),
            Err(DominoError::IntegrityViolation { .. })
        ));
    }

    #[test]
    fn barrier_referencing_unknown_task_rejected() {
        let mut b = TaskGraphBuilder::new();
        b.add_task(task(1, 0, 0));
        b.add_phase_barrier(0, alloc::vec![TaskId::new(1)], alloc::vec![TaskId::new(99)]);
        let mut out = TaskGraph::default();
        assert!(matches!(
            b.finalize(&mut out),
            Err(DominoError::IntegrityViolation { .. })
        ));
    }

    #[test]
    fn cyclic_dependencies_rejected() {
        let mut b = TaskGraphBuilder::new();
        b.add_task(task(1, 0, 0));
        b.add_task(task(2, 0, 0));
        b.add_dependency(TaskId::new(1), TaskId::new(2), 0);
        b.add_dependency(TaskId::new(2), TaskId::new(1), 0);
        let mut out = TaskGraph::default();
        assert!(matches!(b.finalize(&mut out), Err(DominoError::Cycle)));
    }

    #[test]
    fn acyclic_dependencies_sort_by_from_to_reason() {
        let mut b = TaskGraphBuilder::new();
        b.add_task(task(1, 0, 0));
        b.add_task(task(2, 0, 0));
        b.add_dependency(TaskId::new(2), TaskId::new(1), 5);
        b.add_dependency(TaskId::new(1), TaskId::new(2), 1);
        let mut out = TaskGraph::default();
        b.finalize(&mut out).unwrap();
        assert_eq!(out.deps[0].from_task_id.get(), 1);
        assert_eq!(out.deps[1].from_task_id.get(), 2);
    }
}
