// Copyright 2026 the Domino Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `TickReport` (`spec.md` §6 "report contains faults, dropped work,
//! phase budget residuals") plus the "why rerun" cause-path supplement
//! (`SPEC_FULL.md` §B.6.2): an additive `ReportDetailMask` gating
//! `because_of`/`why_path` detail on each executed task.

use domino_sched::{DependencyEdge, FailureRecord, PhaseBudgetResidual};
use domino_types::{DominoError, EdgeId, NodeId, PartId, TaskId};

/// Which optional detail a [`TickReport`] should carry: a `NONE`
/// default and an additive `FULL`.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ReportDetailMask(u8);

impl ReportDetailMask {
    /// No optional detail; `task_causes` stays empty.
    pub const NONE: Self = Self(0);
    /// Record `because_of` for rebuild-triggered tasks.
    pub const BECAUSE_OF: Self = Self(1 << 0);
    /// Record the dependency chain leading to a subsystem-emitted task.
    pub const WHY_PATH: Self = Self(1 << 1);
    /// Both of the above.
    pub const FULL: Self = Self(Self::BECAUSE_OF.0 | Self::WHY_PATH.0);

    /// Returns `true` if every bit of `other` is set in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl core::ops::BitOr for ReportDetailMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// What caused a dirty-set-driven rebuild task to be scheduled: a
/// dirty partition/node/edge named directly, or completion of an
/// upstream task.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CauseKey {
    /// Caused by a dirty partition.
    DirtyPart(PartId),
    /// Caused by a dirty node.
    DirtyNode(NodeId),
    /// Caused by a dirty edge.
    DirtyEdge(EdgeId),
    /// Caused by completion of an upstream task.
    UpstreamTask(TaskId),
}

/// Diagnostic record of why one executed task was scheduled. Empty
/// unless requested via [`ReportDetailMask`]; has no bearing on
/// scheduling or determinism.
#[derive(Clone, Debug)]
pub struct TaskCause {
    /// The task this record is about.
    pub task_id: TaskId,
    /// Direct cause, if [`ReportDetailMask::BECAUSE_OF`] was requested
    /// and this task was rebuild-triggered.
    pub because_of: Option<CauseKey>,
    /// Upstream tasks this task depended on, if
    /// [`ReportDetailMask::WHY_PATH`] was requested.
    pub why_path: Option<Vec<CauseKey>>,
}

/// Result of one `engine_tick` call (`spec.md` §6).
#[derive(Clone, Debug, Default)]
pub struct TickReport {
    /// Work handler failures recorded this tick.
    pub faults: Vec<FailureRecord>,
    /// Determinism faults detected this tick.
    pub determinism_faults: Vec<DominoError>,
    /// Items carried over to the next tick because a budget ran out.
    pub dropped_work: usize,
    /// Leftover per-phase budget.
    pub phase_budget_residuals: Vec<PhaseBudgetResidual>,
    /// Optional cause-path detail, empty unless requested (`SPEC_FULL.md`
    /// §B.6.2).
    pub task_causes: Vec<TaskCause>,
}

impl TickReport {
    /// `true` if the tick produced no faults of any kind.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.faults.is_empty() && self.determinism_faults.is_empty()
    }
}

pub(crate) fn upstream_causes(task_id: TaskId, deps: &[DependencyEdge]) -> Vec<CauseKey> {
    deps.iter()
        .filter(|d| d.to_task_id == task_id)
        .map(|d| CauseKey::UpstreamTask(d.from_task_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_mask_contains_both_bits() {
        assert!(ReportDetailMask::FULL.contains(ReportDetailMask::BECAUSE_OF));
        assert!(ReportDetailMask::FULL.contains(ReportDetailMask::WHY_PATH));
        assert!(!ReportDetailMask::NONE.contains(ReportDetailMask::BECAUSE_OF));
    }

    #[test]
    fn upstream_causes_collects_matching_deps() {
        let deps = vec![
            DependencyEdge {
                from_task_id: TaskId::new(1),
                to_task_id: TaskId::new(2),
                reason_id: 0,
            },
            DependencyEdge {
                from_task_id: TaskId::new(3),
                to_task_id: TaskId::new(2),
                reason_id: 0,
            },
            DependencyEdge {
                from_task_id: TaskId::new(1),
                to_task_id: TaskId::new(9),
                reason_id: 0,
            },
        ];
        let causes = upstream_causes(TaskId::new(2), &deps);
        assert_eq!(
            causes,
            vec![
                CauseKey::UpstreamTask(TaskId::new(1)),
                CauseKey::UpstreamTask(TaskId::new(3))
            ]
        );
    }
}
