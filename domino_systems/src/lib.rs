// Copyright 2026 the Domino Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The subsystem IR-producer framework and its five concrete game
//! systems for the Domino deterministic simulation core (`spec.md`
//! §4.8).

#![no_std]

extern crate alloc;

mod agent;
mod audit;
mod economy;
mod governance;
mod interest;
mod market;
mod producer;
mod slice_producer;

pub use agent::AgentProducer;
pub use audit::{AuditEntry, AuditLog};
pub use economy::EconomyProducer;
pub use governance::GovernanceProducer;
pub use interest::InterestProducer;
pub use market::MarketProducer;
pub use producer::{FidelityTier, SubsystemProducer};
pub use slice_producer::decode_policy_params;
