// Copyright 2026 the Domino Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The deterministic scheduler (`spec.md` §4.6).

use alloc::vec::Vec;

use domino_types::{DomainId, DominoError, DominoResult, TaskId, Tick};

use crate::order_key::Phase;
use crate::task_graph::PhaseBarrier;
use crate::work_item::{WorkItem, WORK_TYPE_TASK};
use crate::work_queue::WorkQueue;

/// Invoked by the scheduler once per drained [`WorkItem`]. Implementations
/// decode `work_type_id` to decide how to interpret the item (`spec.md`
/// §4.4 "rebuild_sched_work_handler", §4.8 task execution).
pub trait WorkHandler {
    /// Executes one work item. A returned error is recorded in the
    /// tick's failure log; it does not abort the tick (`spec.md` §4.6
    /// "its errors are surfaced via a per-tick failure log but do not
    /// abort the tick").
    fn handle(&mut self, item: &WorkItem) -> DominoResult<()>;
}

/// One recorded work-handler failure, kept for `TickReport::faults`.
#[derive(Clone, Debug)]
pub struct FailureRecord {
    /// The item whose handler returned an error.
    pub item: WorkItem,
    /// The error the handler returned.
    pub error: DominoError,
}

/// Per-phase leftover budget at the end of a tick, reported so callers
/// can diagnose chronically starved phases.
#[derive(Copy, Clone, Debug)]
pub struct PhaseBudgetResidual {
    /// Which phase this residual belongs to.
    pub phase: Phase,
    /// Units of the phase's soft cap left unspent.
    pub remaining: u32,
}

/// Result of one `tick()` call.
#[derive(Clone, Debug, Default)]
pub struct TickOutcome {
    /// Work handler failures recorded this tick.
    pub faults: Vec<FailureRecord>,
    /// Determinism faults detected this tick (duplicate keys rejected at
    /// `enqueue_work` are reported there; barrier violations are
    /// reported here).
    pub determinism_faults: Vec<DominoError>,
    /// Items left in a phase queue for the next tick because the
    /// budget was exhausted.
    pub dropped_work: usize,
    /// Leftover per-phase budget, one entry per phase processed.
    pub phase_budget_residuals: Vec<PhaseBudgetResidual>,
}

const PHASE_COUNT: usize = 5;

fn phase_index(phase: Phase) -> usize {
    phase as u16 as usize
}

/// Aggregates work items for a tick, runs them in commit-key order,
/// enforces phase barriers and budgets, and carries over deferred work
/// deterministically (`spec.md` §4.6).
#[derive(Debug)]
pub struct Scheduler {
    current_tick: Tick,
    phase_queues: [WorkQueue; PHASE_COUNT],
    phase_budget_limits: [u32; PHASE_COUNT],
    domain_budget_limits: Vec<(DomainId, u32)>,
    executed_task_ids: Vec<TaskId>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self {
            current_tick: Tick::new(0),
            phase_queues: Default::default(),
            phase_budget_limits: [u32::MAX; PHASE_COUNT],
            domain_budget_limits: Vec::new(),
            executed_task_ids: Vec::new(),
        }
    }
}

impl Scheduler {
    /// Creates a scheduler with all phase budgets defaulted to
    /// `u32::MAX` and no per-domain budgets configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the soft per-tick budget cap for `phase`.
    pub fn set_phase_budget(&mut self, phase: Phase, limit: u32) {
        self.phase_budget_limits[phase_index(phase)] = limit;
    }

    /// Sets (or replaces) the per-tick budget cap for `domain_id`.
    pub fn set_domain_budget(&mut self, domain_id: DomainId, limit: u32) {
        match self
            .domain_budget_limits
            .binary_search_by_key(&domain_id, |(d, _)| *d)
        {
            Ok(idx) => self.domain_budget_limits[idx].1 = limit,
            Err(idx) => self.domain_budget_limits.insert(idx, (domain_id, limit)),
        }
    }

    /// Starts tick `t`. Carryover queues (items left from a prior tick
    /// whose budget ran out) are retained; only bookkeeping is reset.
    pub fn begin_tick(&mut self, t: Tick) {
        self.current_tick = t;
        self.executed_task_ids.clear();
    }

    /// Borrows `phase`'s current queue, including any items carried over
    /// from a prior tick. Used by `domino_engine`'s `snapshot()`
    /// (`spec.md` §6 "scheduler carryover queues").
    #[must_use]
    pub fn phase_queue(&self, phase: Phase) -> &WorkQueue {
        &self.phase_queues[phase_index(phase)]
    }

    /// Replaces `phase`'s queue wholesale. Used by `domino_engine`'s
    /// `restore()` to reinstate carried-over work from a snapshot.
    pub fn set_phase_queue(&mut self, phase: Phase, queue: WorkQueue) {
        self.phase_queues[phase_index(phase)] = queue;
    }

    /// Enqueues `item` into the named phase's queue. Rejects a duplicate
    /// `OrderKey` with `DeterminismFault` (`spec.md` §4.6 "two work
    /// items with identical OrderKey").
    pub fn enqueue_work(&mut self, phase: Phase, item: WorkItem) -> DominoResult<()> {
        let queue = &mut self.phase_queues[phase_index(phase)];
        if queue.contains_key(&item.key) {
            return Err(DominoError::DeterminismFault {
                what: "duplicate OrderKey enqueued",
            });
        }
        queue.push(item);
        Ok(())
    }

    /// Runs one tick: drains each phase's queue in commit order under
    /// budget, then checks phase barriers against the tasks that were
    /// actually executed (`spec.md` §4.6 steps 4-5).
    pub fn tick(
        &mut self,
        handler: &mut dyn WorkHandler,
        phase_barriers: &[PhaseBarrier],
    ) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        let domain_limits = self.domain_budget_limits.clone();
        let mut domain_remaining = domain_limits;

        for &phase in &Phase::ALL {
            let idx = phase_index(phase);
            let limit = self.phase_budget_limits[idx];
            let mut spent: u32 = 0;
            let queue = &mut self.phase_queues[idx];

            loop {
                let Some(item) = queue.front() else { break };
                let domain_id = DomainId::new(item.key.domain_id);
                let domain_ok = domain_budget_covers(&domain_remaining, domain_id, item.cost_units);
                let phase_ok = spent == 0 || spent.saturating_add(item.cost_units) <= limit;

                if !phase_ok || !domain_ok {
                    break;
                }

                let item = queue.pop_front().expect("front() just returned Some");
                spent = spent.saturating_add(item.cost_units);
                charge_domain_budget(&mut domain_remaining, domain_id, item.cost_units);

                if item.work_type_id == WORK_TYPE_TASK {
                    self.executed_task_ids.push(TaskId::new(item.key.component_id));
                }

                if let Err(error) = handler.handle(&item) {
                    outcome.faults.push(FailureRecord { item, error });
                }
            }

            outcome.dropped_work += queue.count();
            outcome.phase_budget_residuals.push(PhaseBudgetResidual {
                phase,
                remaining: limit.saturating_sub(spent),
            });
        }

        self.executed_task_ids.sort_unstable();
        for barrier in phase_barriers {
            for after in &barrier.after_tasks {
                if self.executed_task_ids.binary_search(after).is_err() {
                    outcome.determinism_faults.push(DominoError::DeterminismFault {
                        what: "phase barrier after_task did not execute",
                    });
                }
            }
        }

        outcome
    }
}

fn domain_budget_covers(remaining: &[(DomainId, u32)], domain_id: DomainId, cost: u32) -> bool {
    match remaining.binary_search_by_key(&domain_id, |(d, _)| *d) {
        Ok(idx) => cost <= remaining[idx].1,
        Err(_) => true,
    }
}

fn charge_domain_budget(remaining: &mut [(DomainId, u32)], domain_id: DomainId, cost: u32) {
    if let Ok(idx) = remaining.binary_search_by_key(&domain_id, |(d, _)| *d) {
        remaining[idx].1 = remaining[idx].1.saturating_sub(cost);
    }
}
