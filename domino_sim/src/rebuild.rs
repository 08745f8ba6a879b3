// Copyright 2026 the Domino Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The rebuild harness: dirty set → `PH_TOPOLOGY` work items
//! (`spec.md` §4.4).

use alloc::rc::Rc;

use domino_graph::{GraphRegistry, RebuildVtable};
use domino_types::{ComponentKind, DominoError, DominoResult, GraphInstanceId, GraphTypeId, PartId};
use domino_sched::{OrderKey, Phase, WorkHandler, WorkItem, WORK_TYPE_REBUILD};

use crate::dirty_set::DirtySet;

const KIND_SHIFT: u32 = 56;
const ITEM_ID_MASK: u64 = 0x00FF_FFFF_FFFF_FFFF;

/// Packs `(kind, item_id)` into the bit layout `OrderKey::component_id`
/// carries for rebuild work: `(kind:u8 << 56) | (item_id & 2^56-1)`.
/// Rejects `item_id >= 2^56` so the kind tag can never be clobbered.
pub fn pack_component_id(kind: ComponentKind, item_id: u64) -> DominoResult<u64> {
    if item_id > ITEM_ID_MASK {
        return Err(DominoError::InvalidArgument {
            what: "item_id exceeds 2^56, cannot be packed into component_id",
        });
    }
    Ok((u64::from(kind as u8) << KIND_SHIFT) | (item_id & ITEM_ID_MASK))
}

/// Inverse of [`pack_component_id`].
pub fn unpack_component_id(component_id: u64) -> DominoResult<(ComponentKind, u64)> {
    let kind_raw = (component_id >> KIND_SHIFT) as u8;
    let kind = ComponentKind::from_u8(kind_raw).ok_or(DominoError::IntegrityViolation {
        what: "component_id kind tag is not PARTITION/NODE/EDGE",
    })?;
    Ok((kind, component_id & ITEM_ID_MASK))
}

/// One rebuild target: which registered graph type/instance a dirty
/// set's entries should be rebuilt against.
#[derive(Copy, Clone, Debug)]
pub struct RebuildTarget {
    /// The registered graph type to rebuild.
    pub graph_type_id: GraphTypeId,
    /// The registered instance of that type.
    pub graph_instance_id: GraphInstanceId,
}

/// Converts `dirty` into `PH_TOPOLOGY` `WorkItem`s for `target`, in the
/// fixed emission order parts → nodes → edges, each with a
/// monotonically increasing `seq` starting at `next_seq`. `cost_of`
/// supplies the estimated cost per item (the harness itself only
/// clamps `0` to `1`, per `spec.md` §4.4).
///
/// Returns the produced items and the next unused `seq`.
pub fn emit_rebuild_work(
    dirty: &DirtySet,
    target: RebuildTarget,
    enqueue_tick: domino_types::Tick,
    mut next_seq: u32,
    mut cost_of: impl FnMut(ComponentKind, u64, PartId) -> u32,
) -> DominoResult<alloc::vec::Vec<WorkItem>> {
    let mut items = alloc::vec::Vec::with_capacity(
        dirty.parts().len() + dirty.nodes().len() + dirty.edges().len(),
    );

    for &part_id in dirty.parts() {
        items.push(build_item(
            target,
            ComponentKind::Partition,
            part_id.get(),
            part_id,
            enqueue_tick,
            next_seq,
            &mut cost_of,
        )?);
        next_seq += 1;
    }
    for &node_id in dirty.nodes() {
        items.push(build_item(
            target,
            ComponentKind::Node,
            u64::from(node_id.get()),
            PartId::INVALID,
            enqueue_tick,
            next_seq,
            &mut cost_of,
        )?);
        next_seq += 1;
    }
    for &edge_id in dirty.edges() {
        items.push(build_item(
            target,
            ComponentKind::Edge,
            u64::from(edge_id.get()),
            PartId::INVALID,
            enqueue_tick,
            next_seq,
            &mut cost_of,
        )?);
        next_seq += 1;
    }

    Ok(items)
}

fn build_item(
    target: RebuildTarget,
    kind: ComponentKind,
    item_id: u64,
    part_id: PartId,
    enqueue_tick: domino_types::Tick,
    seq: u32,
    cost_of: &mut impl FnMut(ComponentKind, u64, PartId) -> u32,
) -> DominoResult<WorkItem> {
    let component_id = pack_component_id(kind, item_id)?;
    let key = OrderKey::new(
        Phase::Topology,
        0,
        part_id.get(),
        target.graph_instance_id.get(),
        component_id,
        target.graph_type_id.get(),
        seq,
    );
    let cost = cost_of(kind, item_id, part_id).max(1);
    Ok(WorkItem::new(key, WORK_TYPE_REBUILD, cost, enqueue_tick))
}

fn decode(item: &WorkItem) -> DominoResult<(GraphTypeId, GraphInstanceId, PartId, ComponentKind, u64)> {
    let graph_type_id = GraphTypeId::new(item.key.type_id);
    let graph_instance_id = GraphInstanceId::new(item.key.entity_id);
    let part_id = PartId::new(item.key.chunk_id);
    let (kind, item_id) = unpack_component_id(item.key.component_id)?;
    Ok((graph_type_id, graph_instance_id, part_id, kind, item_id))
}

/// A single fixed `(type, instance)` target, dispatched directly against
/// one registered vtable + context (`spec.md` §4.4 "Execution").
pub struct SingleTargetHandler {
    vtable: Rc<dyn RebuildVtable>,
    instance_ctx: alloc::boxed::Box<dyn core::any::Any>,
}

impl SingleTargetHandler {
    /// Builds a handler bound to one vtable and its instance context.
    #[must_use]
    pub fn new(vtable: Rc<dyn RebuildVtable>, instance_ctx: alloc::boxed::Box<dyn core::any::Any>) -> Self {
        Self { vtable, instance_ctx }
    }
}

impl WorkHandler for SingleTargetHandler {
    fn handle(&mut self, item: &WorkItem) -> DominoResult<()> {
        let (_, _, part_id, kind, item_id) = decode(item)?;
        self.vtable.execute(self.instance_ctx.as_mut(), kind, item_id, part_id)
    }
}

/// A registry-backed handler that looks up the target type's vtable
/// and the target instance's context at dispatch time, so one
/// scheduler can service multiple graph types without a hard-coded
/// table (`spec.md` §4.4 "Registry variant").
pub struct RegistryHandler<'a> {
    registry: &'a mut GraphRegistry,
}

impl<'a> RegistryHandler<'a> {
    /// Builds a handler dispatching against `registry`.
    #[must_use]
    pub fn new(registry: &'a mut GraphRegistry) -> Self {
        Self { registry }
    }
}

impl WorkHandler for RegistryHandler<'_> {
    fn handle(&mut self, item: &WorkItem) -> DominoResult<()> {
        let (graph_type_id, graph_instance_id, part_id, kind, item_id) = decode(item)?;
        self.registry
            .dispatch_rebuild(graph_type_id, graph_instance_id, kind, item_id, part_id)
    }
}
