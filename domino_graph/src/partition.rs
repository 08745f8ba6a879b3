// Copyright 2026 the Domino Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node-to-partition mapping and per-partition node lists (`spec.md` §4.2).

use alloc::vec::Vec;

use domino_types::{DominoError, DominoResult, NodeId, PartId};

#[derive(Clone)]
struct PartEntry {
    part_id: PartId,
    /// Sorted by `node_id`, each node present at most once.
    nodes: Vec<NodeId>,
}

/// Maintains `NodeId -> PartId` (sorted by node id) and `PartId -> ordered
/// node list` (sorted by part id, each inner list sorted by node id). A
/// node belongs to at most one partition.
#[derive(Default, Clone)]
pub struct Partition {
    node_map: Vec<(NodeId, PartId)>,
    parts: Vec<PartEntry>,
}

impl Partition {
    /// Creates an empty partition map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn node_map_index(&self, node_id: NodeId) -> Result<usize, usize> {
        self.node_map.binary_search_by_key(&node_id, |(n, _)| *n)
    }

    fn part_index(&self, part_id: PartId) -> Result<usize, usize> {
        self.parts.binary_search_by_key(&part_id, |p| p.part_id)
    }

    /// Current partition of `node_id`, or [`PartId::INVALID`] if
    /// unassigned.
    #[must_use]
    pub fn get_node_partition(&self, node_id: NodeId) -> PartId {
        match self.node_map_index(node_id) {
            Ok(idx) => self.node_map[idx].1,
            Err(_) => PartId::INVALID,
        }
    }

    /// Assigns `node_id` to `part_id`, removing it from any prior
    /// partition first. Passing [`PartId::INVALID`] unassigns the node.
    /// A no-op (same partition twice) returns `Ok(())` without mutating
    /// anything. Storage for the destination partition's node list is
    /// reserved before any removal happens, so a failure here leaves the
    /// map in its pre-call state (`dg_graph_part_set_node`'s atomicity,
    /// ported faithfully).
    pub fn set_node_partition(&mut self, node_id: NodeId, part_id: PartId) -> DominoResult<()> {
        if !node_id.is_valid() {
            return Err(DominoError::InvalidArgument { what: "node_id" });
        }
        let old = self.get_node_partition(node_id);
        if old == part_id {
            return Ok(());
        }

        if part_id.is_valid() {
            let dest_idx = match self.part_index(part_id) {
                Ok(idx) => idx,
                Err(pos) => {
                    self.parts.try_reserve(1).map_err(|_| DominoError::OutOfMemory)?;
                    self.parts.insert(
                        pos,
                        PartEntry {
                            part_id,
                            nodes: Vec::new(),
                        },
                    );
                    pos
                }
            };
            self.parts[dest_idx]
                .nodes
                .try_reserve(1)
                .map_err(|_| DominoError::OutOfMemory)?;
        }
        if !old.is_valid() {
            self.node_map
                .try_reserve(1)
                .map_err(|_| DominoError::OutOfMemory)?;
        }

        if old.is_valid() {
            self.remove_from_part(old, node_id);
        }

        if part_id.is_valid() {
            let dest_idx = self.part_index(part_id).expect("reserved above");
            let nodes = &mut self.parts[dest_idx].nodes;
            let pos = nodes.binary_search(&node_id).unwrap_or_else(|p| p);
            nodes.insert(pos, node_id);
            match self.node_map_index(node_id) {
                Ok(idx) => self.node_map[idx].1 = part_id,
                Err(pos) => self.node_map.insert(pos, (node_id, part_id)),
            }
        } else if let Ok(idx) = self.node_map_index(node_id) {
            self.node_map.remove(idx);
        }
        Ok(())
    }

    fn remove_from_part(&mut self, part_id: PartId, node_id: NodeId) {
        if let Ok(part_idx) = self.part_index(part_id) {
            let nodes = &mut self.parts[part_idx].nodes;
            if let Ok(pos) = nodes.binary_search(&node_id) {
                nodes.remove(pos);
            }
        }
    }

    /// Enumerates partitions in ascending `part_id`, each with its node
    /// list in ascending `node_id` order.
    pub fn parts(&self) -> impl Iterator<Item = (PartId, &[NodeId])> {
        self.parts.iter().map(|p| (p.part_id, p.nodes.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assign_then_reassign_keeps_lists_sorted() {
        let mut p = Partition::new();
        p.set_node_partition(NodeId::new(5), PartId::new(10)).unwrap();
        p.set_node_partition(NodeId::new(1), PartId::new(10)).unwrap();
        p.set_node_partition(NodeId::new(3), PartId::new(20)).unwrap();

        let collected: Vec<_> = p
            .parts()
            .map(|(pid, nodes)| (pid.get(), nodes.iter().map(|n| n.get()).collect::<Vec<_>>()))
            .collect();
        assert_eq!(collected, vec![(10, vec![1, 5]), (20, vec![3])]);

        p.set_node_partition(NodeId::new(1), PartId::new(20)).unwrap();
        let collected: Vec<_> = p
            .parts()
            .map(|(pid, nodes)| (pid.get(), nodes.iter().map(|n| n.get()).collect::<Vec<_>>()))
            .collect();
        assert_eq!(collected, vec![(10, vec![5]), (20, vec![1, 3])]);
    }

    #[test]
    fn unassign_removes_node_map_entry() {
        let mut p = Partition::new();
        p.set_node_partition(NodeId::new(1), PartId::new(10)).unwrap();
        p.set_node_partition(NodeId::new(1), PartId::INVALID).unwrap();
        assert_eq!(p.get_node_partition(NodeId::new(1)), PartId::INVALID);
        assert_eq!(p.parts().next().unwrap().1.len(), 0);
    }

    #[test]
    fn no_op_reassign_to_same_partition() {
        let mut p = Partition::new();
        p.set_node_partition(NodeId::new(1), PartId::new(10)).unwrap();
        p.set_node_partition(NodeId::new(1), PartId::new(10)).unwrap();
        assert_eq!(p.parts().next().unwrap().1, &[NodeId::new(1)]);
    }
}
