// Copyright 2026 the Domino Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canonical sorted graph storage, traversal, partitioning and boundary
//! stitching for the Domino deterministic simulation core.
//!
//! Everything here is a pure, synchronous data structure: no I/O, no
//! threads, no floating point in any ordering decision. See
//! `SPEC_FULL.md` §A.1/§A.2 for the responsibilities this crate covers.

#![no_std]

extern crate alloc;

mod boundary;
mod graph;
mod partition;
mod registry;

pub use boundary::{stitch, BoundaryEndpoint};
pub use graph::{EdgeFlags, EdgeView, Graph, Neighbors, NodeView};
pub use partition::Partition;
pub use registry::{GraphRegistry, RebuildVtable};
