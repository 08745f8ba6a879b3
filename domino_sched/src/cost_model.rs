// Copyright 2026 the Domino Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `CostModel` (`spec.md` §3 "Cost model").

use domino_types::{DominoError, DominoResult};

/// Newtype for a cost model identifier. `0` is reserved and always
/// rejected by [`CostModel::new`]: `spec.md` §4.6 lists "a cost model
/// with id 0" among the conditions producing a `DeterminismFault`.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct CostModelId(u64);

impl CostModelId {
    /// Builds an id, returning `None` for the reserved `0` value.
    #[must_use]
    pub fn new(raw: u64) -> Option<Self> {
        if raw == 0 {
            None
        } else {
            Some(Self(raw))
        }
    }

    /// Returns the raw value.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

/// A named cost estimate consulted by the scheduler when admitting work
/// against a budget.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CostModel {
    /// Identifier; `0` is rejected at construction.
    pub id: CostModelId,
    /// Estimated scheduler budget units this cost model predicts.
    pub estimated_units: u32,
    /// Opaque hint consulted by subsystems deciding whether to degrade
    /// fidelity (`spec.md` §4.8 "degrade").
    pub degrade_hint: u8,
}

impl CostModel {
    /// Builds a cost model, rejecting id `0` per `spec.md` §4.6.
    pub fn new(id: u64, estimated_units: u32, degrade_hint: u8) -> DominoResult<Self> {
        let id = CostModelId::new(id).ok_or(DominoError::DeterminismFault {
            what: "cost model id 0 is reserved",
        })?;
        Ok(Self {
            id,
            estimated_units,
            degrade_hint,
        })
    }
}
