// Copyright 2026 the Domino Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-set tracking (`spec.md` §4.3).

use alloc::vec::Vec;

use domino_types::{DominoError, DominoResult, EdgeId, NodeId, PartId};

/// Three sorted, deduplicated sequences of changed ids, accumulated
/// within a tick and drained by the rebuild harness. `merge` computes
/// the sorted union; id `0` is rejected in every class.
#[derive(Clone, Debug, Default)]
pub struct DirtySet {
    nodes: Vec<NodeId>,
    edges: Vec<EdgeId>,
    parts: Vec<PartId>,
}

/// Which class of dirty entry an operation targets, also doubling as
/// the fixed emission order the rebuild harness iterates in
/// (`spec.md` §4.3 "classes are emitted in the fixed order partition,
/// node, edge").
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DirtyClass {
    /// Dirty partitions, emitted first.
    Partition,
    /// Dirty nodes, emitted second.
    Node,
    /// Dirty edges, emitted last.
    Edge,
}

impl DirtySet {
    /// Creates an empty dirty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `node_id` dirty. Rejects id `0`; no-op if already present.
    pub fn add_node(&mut self, node_id: NodeId) -> DominoResult<()> {
        if !node_id.is_valid() {
            return Err(zero_id_error());
        }
        insert_sorted_dedup(&mut self.nodes, node_id);
        Ok(())
    }

    /// Marks `edge_id` dirty. Rejects id `0`; no-op if already present.
    pub fn add_edge(&mut self, edge_id: EdgeId) -> DominoResult<()> {
        if !edge_id.is_valid() {
            return Err(zero_id_error());
        }
        insert_sorted_dedup(&mut self.edges, edge_id);
        Ok(())
    }

    /// Marks `part_id` dirty. Rejects id `0`; no-op if already present.
    pub fn add_part(&mut self, part_id: PartId) -> DominoResult<()> {
        if !part_id.is_valid() {
            return Err(zero_id_error());
        }
        insert_sorted_dedup(&mut self.parts, part_id);
        Ok(())
    }

    /// Removes `node_id` from the dirty set, if present.
    pub fn remove_node(&mut self, node_id: NodeId) {
        remove_sorted(&mut self.nodes, node_id);
    }

    /// Removes `edge_id` from the dirty set, if present.
    pub fn remove_edge(&mut self, edge_id: EdgeId) {
        remove_sorted(&mut self.edges, edge_id);
    }

    /// Removes `part_id` from the dirty set, if present.
    pub fn remove_part(&mut self, part_id: PartId) {
        remove_sorted(&mut self.parts, part_id);
    }

    /// Unions `src` into `self`, preserving sort and dedup in every
    /// class.
    pub fn merge(&mut self, src: &DirtySet) {
        for &n in &src.nodes {
            insert_sorted_dedup(&mut self.nodes, n);
        }
        for &e in &src.edges {
            insert_sorted_dedup(&mut self.edges, e);
        }
        for &p in &src.parts {
            insert_sorted_dedup(&mut self.parts, p);
        }
    }

    /// Empties every class, preserving capacity.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.parts.clear();
    }

    /// Number of dirty ids in `class`.
    #[must_use]
    pub fn count(&self, class: DirtyClass) -> usize {
        match class {
            DirtyClass::Partition => self.parts.len(),
            DirtyClass::Node => self.nodes.len(),
            DirtyClass::Edge => self.edges.len(),
        }
    }

    /// Borrows the dirty nodes, ascending.
    #[must_use]
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Borrows the dirty edges, ascending.
    #[must_use]
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    /// Borrows the dirty parts, ascending.
    #[must_use]
    pub fn parts(&self) -> &[PartId] {
        &self.parts
    }
}

fn insert_sorted_dedup<T: Ord + Copy>(dst: &mut Vec<T>, id: T) {
    if let Err(pos) = dst.binary_search(&id) {
        dst.insert(pos, id);
    }
}

fn remove_sorted<T: Ord + Copy>(dst: &mut Vec<T>, id: T) {
    if let Ok(pos) = dst.binary_search(&id) {
        dst.remove(pos);
    }
}

fn zero_id_error() -> DominoError {
    DominoError::InvalidArgument {
        what: "id 0 is not a valid dirty-set entry",
    }
}
