// Copyright 2026 the Domino Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The Domino deterministic simulation core's external boundary
//! (`spec.md` §6): `Engine`, its configuration surface (`RunDescriptor`),
//! per-tick reporting (`TickReport`), and the `snapshot()`/`restore()`
//! pair.
//!
//! Unlike the other core crates, `domino_engine` is `std`-only: it wants
//! `tracing`'s span/event machinery and (via `RunDescriptor`) `serde`
//! derives for configuration loading (`SPEC_FULL.md` §B.1/§B.4).

mod engine;
mod report;
mod run_descriptor;
mod snapshot;

pub use engine::{engine_init, Engine};
pub use report::{CauseKey, ReportDetailMask, TaskCause, TickReport};
pub use run_descriptor::RunDescriptor;
pub use snapshot::{EngineSnapshot, GraphInstanceSnapshot};
