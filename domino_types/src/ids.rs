// Copyright 2026 the Domino Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Identifier newtypes (`spec.md` §3 "Identifiers").
//!
//! All ids are 32- or 64-bit unsigned integers with `0` reserved as the
//! "invalid/none" sentinel. Ids are stable within a run and issued
//! monotonically by whichever allocator owns them; nothing here allocates.

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident($repr:ty)) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Ord, PartialOrd)]
        pub struct $name($repr);

        impl $name {
            /// The sentinel "invalid/none" value.
            pub const INVALID: Self = Self(0);

            /// Wraps a raw value. `0` means "invalid" by convention; this
            /// constructor does not reject it, since some call sites (e.g.
            /// the allocator itself) need to construct it to compare against.
            #[inline]
            #[must_use]
            pub const fn new(raw: $repr) -> Self {
                Self(raw)
            }

            /// Returns the raw value backing this id.
            #[inline]
            #[must_use]
            pub const fn get(self) -> $repr {
                self.0
            }

            /// Returns `true` unless this id is the `0` sentinel.
            #[inline]
            #[must_use]
            pub const fn is_valid(self) -> bool {
                self.0 != 0
            }
        }

        impl From<$repr> for $name {
            #[inline]
            fn from(raw: $repr) -> Self {
                Self::new(raw)
            }
        }
    };
}

define_id!(
    /// Identifies a node within a `domino_graph` graph.
    NodeId(u32)
);
define_id!(
    /// Identifies an edge within a graph.
    EdgeId(u32)
);
define_id!(
    /// Identifies a partition (`Part`) that a node may belong to.
    PartId(u64)
);
define_id!(
    /// Scopes a scheduler budget to a subsystem domain.
    DomainId(u32)
);
define_id!(
    /// A stable type token, e.g. for dependency-edge `reason_id` or access-range class.
    TypeId(u32)
);
define_id!(
    /// Identifies a simulated entity (agent, ledger account, market, ...).
    EntityId(u64)
);
define_id!(
    /// Identifies a chunk-aligned grouping used by `OrderKey` and by
    /// partition-scoped rebuild work.
    ChunkId(u64)
);
define_id!(
    /// A packed `(kind, item_id)` pair; see [`crate::ComponentKind`].
    ComponentId(u64)
);
define_id!(
    /// Identifies a task within a tick's `TaskGraph`.
    TaskId(u64)
);
define_id!(
    /// Identifies a registered graph type in the `GraphRegistry`.
    GraphTypeId(u32)
);
define_id!(
    /// Identifies a registered graph instance of a given [`GraphTypeId`].
    GraphInstanceId(u64)
);
define_id!(
    /// A monotonically increasing simulation tick counter.
    Tick(u64)
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_is_zero() {
        assert_eq!(NodeId::INVALID.get(), 0);
        assert!(!NodeId::INVALID.is_valid());
        assert!(NodeId::new(1).is_valid());
    }

    #[test]
    fn ordering_matches_raw_value() {
        assert!(NodeId::new(1) < NodeId::new(2));
        assert!(PartId::new(100) > PartId::new(99));
    }
}
