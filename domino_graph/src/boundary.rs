// Copyright 2026 the Domino Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic boundary-endpoint stitching (`spec.md` §4.2).

use alloc::vec::Vec;

use domino_types::{DominoError, DominoResult, EdgeId, NodeId, PartId};

use crate::graph::Graph;

/// An ephemeral boundary endpoint, consumed by [`stitch`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct BoundaryEndpoint {
    /// Stable, domain-provided key. No floats; ties are broken by
    /// `(part_id, node_id)`.
    pub boundary_key: u64,
    /// Partition the endpoint's node belongs to.
    pub part_id: PartId,
    /// The node this endpoint names.
    pub node_id: NodeId,
}

fn cmp_key(e: &BoundaryEndpoint) -> (u64, u64, u32) {
    (e.boundary_key, e.part_id.get(), e.node_id.get())
}

/// Stitches boundary endpoints into cross-partition edges.
///
/// 1. Copies and sorts `endpoints` by `(boundary_key, part_id, node_id)`.
/// 2. Rejects with [`DominoError::DeterminismFault`] if any two sorted
///    elements are exactly equal under that key.
/// 3. For each maximal run sharing `boundary_key`, adds an undirected,
///    allocator-issued edge between every pair `(a, b)` with `a < b` in
///    sorted order whose partitions differ; same-partition pairs are
///    skipped.
///
/// Sorting first guarantees two different input orders of the same
/// endpoint set yield bit-identical edge ids and adjacency.
pub fn stitch(graph: &mut Graph, endpoints: &[BoundaryEndpoint]) -> DominoResult<()> {
    if endpoints.is_empty() {
        return Ok(());
    }

    let mut sorted: Vec<BoundaryEndpoint> = endpoints.to_vec();
    sorted.sort_by_key(cmp_key);

    for w in sorted.windows(2) {
        if cmp_key(&w[0]) == cmp_key(&w[1]) {
            return Err(DominoError::DeterminismFault {
                what: "duplicate boundary endpoint",
            });
        }
    }

    let mut group_start = 0;
    while group_start < sorted.len() {
        let key = sorted[group_start].boundary_key;
        let mut group_end = group_start + 1;
        while group_end < sorted.len() && sorted[group_end].boundary_key == key {
            group_end += 1;
        }

        for a in group_start..group_end {
            for b in (a + 1)..group_end {
                let ea = sorted[a];
                let eb = sorted[b];
                if ea.part_id == eb.part_id {
                    continue;
                }
                graph.add_edge(EdgeId::INVALID, ea.node_id, eb.node_id, false)?;
            }
        }

        group_start = group_end;
    }

    Ok(())
}
