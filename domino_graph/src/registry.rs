// Copyright 2026 the Domino Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Graph type/instance registry (`spec.md` §3 "Graph registry", §9
//! "Global mutable state... the registry is an explicit engine field").

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::any::Any;

use domino_types::{ComponentKind, DominoError, DominoResult, GraphInstanceId, GraphTypeId, PartId};

/// The rebuild callback pair a registered graph type supplies. Mirrors the
/// original `dg_graph_rebuild_vtbl`'s `(instance_user, work)` shape: the
/// `instance_ctx` each call receives comes from the *instance*, while the
/// vtable implementation (the code) is shared by every instance of the
/// type.
pub trait RebuildVtable {
    /// Estimates the cost, in scheduler work units, of one rebuild work
    /// item against this instance's state. The rebuild harness clamps
    /// `0` to `1`.
    fn estimate_cost_units(
        &self,
        instance_ctx: &mut dyn Any,
        kind: ComponentKind,
        item_id: u64,
        part_id: PartId,
    ) -> u32;

    /// Executes one rebuild work item against this instance's state.
    fn execute(
        &self,
        instance_ctx: &mut dyn Any,
        kind: ComponentKind,
        item_id: u64,
        part_id: PartId,
    ) -> DominoResult<()>;
}

struct TypeEntry {
    graph_type_id: GraphTypeId,
    vtable: Option<Rc<dyn RebuildVtable>>,
    insert_index: u32,
}

struct InstanceEntry {
    graph_type_id: GraphTypeId,
    graph_instance_id: GraphInstanceId,
    user_ctx: Box<dyn Any>,
    insert_index: u32,
}

/// `(types: sorted by graph_type_id, instances: sorted by (graph_type_id,
/// graph_instance_id))`. `insert_index` is retained purely as a stable
/// debug field on each entry; it plays no role in lookup or iteration
/// order.
#[derive(Default)]
pub struct GraphRegistry {
    types: Vec<TypeEntry>,
    next_type_insert_index: u32,
    instances: Vec<InstanceEntry>,
    next_instance_insert_index: u32,
}

impl GraphRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn type_index(&self, graph_type_id: GraphTypeId) -> Result<usize, usize> {
        self.types.binary_search_by_key(&graph_type_id, |t| t.graph_type_id)
    }

    fn instance_index(
        &self,
        graph_type_id: GraphTypeId,
        graph_instance_id: GraphInstanceId,
    ) -> Result<usize, usize> {
        self.instances
            .binary_search_by_key(&(graph_type_id, graph_instance_id), |i| {
                (i.graph_type_id, i.graph_instance_id)
            })
    }

    /// Registers a graph type, optionally with a rebuild vtable.
    /// `graph_type_id == 0` is rejected, matching the original
    /// implementation (`spec.md` §3 describes the sort order; this guard
    /// is filled in from `original_source/` per `SPEC_FULL.md` §B.6.3).
    pub fn add_type(
        &mut self,
        graph_type_id: GraphTypeId,
        vtable: Option<Rc<dyn RebuildVtable>>,
    ) -> DominoResult<()> {
        if !graph_type_id.is_valid() {
            return Err(DominoError::InvalidArgument {
                what: "graph_type_id",
            });
        }
        let pos = match self.type_index(graph_type_id) {
            Ok(_) => return Err(DominoError::DuplicateId),
            Err(pos) => pos,
        };
        let insert_index = self.next_type_insert_index;
        self.next_type_insert_index = self.next_type_insert_index.saturating_add(1);
        self.types.insert(
            pos,
            TypeEntry {
                graph_type_id,
                vtable,
                insert_index,
            },
        );
        Ok(())
    }

    /// Registers a graph instance of an already-registered type.
    /// `graph_type_id == 0 || graph_instance_id == 0` is rejected; the
    /// type must have been registered first (returns
    /// [`DominoError::NotFound`] otherwise), matching the original.
    pub fn add_instance(
        &mut self,
        graph_type_id: GraphTypeId,
        graph_instance_id: GraphInstanceId,
        user_ctx: Box<dyn Any>,
    ) -> DominoResult<()> {
        if !graph_type_id.is_valid() || !graph_instance_id.is_valid() {
            return Err(DominoError::InvalidArgument {
                what: "graph_type_id/graph_instance_id",
            });
        }
        if self.type_index(graph_type_id).is_err() {
            return Err(DominoError::NotFound);
        }
        let pos = match self.instance_index(graph_type_id, graph_instance_id) {
            Ok(_) => return Err(DominoError::DuplicateId),
            Err(pos) => pos,
        };
        let insert_index = self.next_instance_insert_index;
        self.next_instance_insert_index = self.next_instance_insert_index.saturating_add(1);
        self.instances.insert(
            pos,
            InstanceEntry {
                graph_type_id,
                graph_instance_id,
                user_ctx,
                insert_index,
            },
        );
        Ok(())
    }

    /// Looks up a registered type's vtable, if it has one.
    #[must_use]
    pub fn find_type_vtable(&self, graph_type_id: GraphTypeId) -> Option<Rc<dyn RebuildVtable>> {
        let idx = self.type_index(graph_type_id).ok()?;
        self.types[idx].vtable.clone()
    }

    /// Dispatches a rebuild work item to the registered instance's vtable
    /// and context. Used by `domino_sim`'s registry-based rebuild
    /// handler.
    pub fn dispatch_rebuild(
        &mut self,
        graph_type_id: GraphTypeId,
        graph_instance_id: GraphInstanceId,
        kind: ComponentKind,
        item_id: u64,
        part_id: PartId,
    ) -> DominoResult<()> {
        let vtable = self.find_type_vtable(graph_type_id).ok_or(DominoError::NotFound)?;
        let idx = self
            .instance_index(graph_type_id, graph_instance_id)
            .map_err(|_| DominoError::NotFound)?;
        let ctx = self.instances[idx].user_ctx.as_mut();
        vtable.execute(ctx, kind, item_id, part_id)
    }

    /// Estimates the cost of one rebuild item against the registered
    /// instance's context, via its type's vtable. Returns `None` if the
    /// type has no vtable or the instance is not registered. Used by
    /// the engine to cost rebuild work before enqueuing it, mirroring
    /// [`Self::dispatch_rebuild`]'s lookup but calling
    /// [`RebuildVtable::estimate_cost_units`] instead of `execute`.
    pub fn estimate_rebuild_cost(
        &mut self,
        graph_type_id: GraphTypeId,
        graph_instance_id: GraphInstanceId,
        kind: ComponentKind,
        item_id: u64,
        part_id: PartId,
    ) -> Option<u32> {
        let vtable = self.find_type_vtable(graph_type_id)?;
        let idx = self.instance_index(graph_type_id, graph_instance_id).ok()?;
        let ctx = self.instances[idx].user_ctx.as_mut();
        Some(vtable.estimate_cost_units(ctx, kind, item_id, part_id))
    }

    /// Number of registered types.
    #[must_use]
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// Number of registered instances.
    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Stable debug `insert_index` for a registered type, if present.
    #[must_use]
    pub fn type_insert_index(&self, graph_type_id: GraphTypeId) -> Option<u32> {
        self.type_index(graph_type_id)
            .ok()
            .map(|idx| self.types[idx].insert_index)
    }
}
