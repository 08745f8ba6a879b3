// Copyright 2026 the Domino Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `RunDescriptor`, the engine's determinism configuration surface
//! (`spec.md` §6 "Determinism configuration").

use domino_sched::Phase;
use serde::{Deserialize, Serialize};

/// Everything two engines must agree on, byte-for-byte, to guarantee
/// byte-identical tick reports from byte-identical tick inputs.
///
/// Ids here are plain `u32`s rather than `domino_types` newtypes: this
/// struct is a serialized configuration surface (`serde`, behind the
/// `std` feature that is always on for this crate), and the core's id
/// newtypes intentionally carry no `serde` impls to keep the `no_std`
/// crates free of the dependency (`SPEC_FULL.md` §B.4).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunDescriptor {
    /// Schema version of the embedding game's own data, opaque to the
    /// core. Carried so two runs can assert they speak the same schema
    /// before comparing tick reports.
    pub schema_version: u32,
    /// Initial seed handed to subsystems, unused by the core proper.
    pub initial_seed: u64,
    /// Soft per-tick budget cap for each of the five phases, in
    /// `Phase::ALL` order.
    pub phase_budget_limits: [u32; 5],
    /// Per-domain budget caps, `(domain_id, units)`.
    pub domain_budgets: Vec<(u32, u32)>,
    /// Which `system_id`s are driven during `engine_tick`. Empty means
    /// "every registered system is enabled" (see `domino_engine::Engine`
    /// design notes).
    pub enabled_systems: Vec<u32>,
    /// `(system_id, allowed_ops_mask)` pairs. The engine does not apply
    /// these itself (the `SubsystemProducer` trait has no generic mask
    /// setter); each concrete producer is configured with its mask by
    /// the embedder before `engine_register_system`. Carried here purely
    /// so the whole run configuration round-trips through one
    /// serialized `RunDescriptor`.
    pub allowed_ops_masks: Vec<(u32, u32)>,
}

impl Default for RunDescriptor {
    fn default() -> Self {
        Self {
            schema_version: 1,
            initial_seed: 0,
            phase_budget_limits: [u32::MAX; 5],
            domain_budgets: Vec::new(),
            enabled_systems: Vec::new(),
            allowed_ops_masks: Vec::new(),
        }
    }
}

impl RunDescriptor {
    /// The configured budget limit for `phase`.
    #[must_use]
    pub fn phase_budget(&self, phase: Phase) -> u32 {
        self.phase_budget_limits[phase as u16 as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_budgets_are_unbounded() {
        let rd = RunDescriptor::default();
        assert_eq!(rd.phase_budget(Phase::Input), u32::MAX);
        assert_eq!(rd.phase_budget(Phase::Export), u32::MAX);
    }

    #[test]
    fn byte_identical_descriptors_compare_equal() {
        let mut a = RunDescriptor::default();
        a.domain_budgets.push((3, 100));
        a.enabled_systems.push(1);
        let b = a.clone();
        assert_eq!(a, b);
    }
}
