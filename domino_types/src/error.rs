// Copyright 2026 the Domino Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The shared error enum (`spec.md` §7 "Error handling design").

use core::fmt;

/// Error kinds shared across every Domino core crate.
///
/// `NotFound` and `Cycle` are soft, expected conditions (lookup misses,
/// acyclicity violations a caller may legitimately want to probe for) and
/// are never produced by a panic; everything else signals a programming
/// error or a resource limit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DominoError {
    /// Null/ill-formed input, including id `0` where not permitted.
    InvalidArgument {
        /// Name of the offending argument or field.
        what: &'static str,
    },
    /// An id lookup missed. Soft, expected.
    NotFound,
    /// Attempted to insert an id that is already present.
    DuplicateId,
    /// An allocator failed to grow a backing store.
    OutOfMemory,
    /// A caller-provided output buffer was too small to hold the result.
    BufferTooSmall {
        /// Number of elements the caller needed to provide.
        needed: usize,
    },
    /// A canonical invariant was found violated mid-operation.
    IntegrityViolation {
        /// Short, stable description of which invariant failed.
        what: &'static str,
    },
    /// A determinism guarantee was violated: duplicate `OrderKey`, a task
    /// referencing a missing barrier target, or an access-set conflict.
    DeterminismFault {
        /// Short, stable description of the violated guarantee.
        what: &'static str,
    },
    /// A graph has a cycle where acyclicity was required.
    Cycle,
    /// A subsystem emitted tasks referencing a phase/capability it did not
    /// declare.
    CapabilityMismatch,
}

impl fmt::Display for DominoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument { what } => write!(f, "invalid argument: {what}"),
            Self::NotFound => write!(f, "not found"),
            Self::DuplicateId => write!(f, "duplicate id"),
            Self::OutOfMemory => write!(f, "out of memory"),
            Self::BufferTooSmall { needed } => {
                write!(f, "buffer too small: needed {needed} elements")
            }
            Self::IntegrityViolation { what } => write!(f, "integrity violation: {what}"),
            Self::DeterminismFault { what } => write!(f, "determinism fault: {what}"),
            Self::Cycle => write!(f, "cycle detected"),
            Self::CapabilityMismatch => write!(f, "capability mismatch"),
        }
    }
}

impl core::error::Error for DominoError {}

/// Convenience alias used throughout the Domino core crates.
pub type DominoResult<T> = Result<T, DominoError>;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn display_does_not_panic() {
        let errs = [
            DominoError::InvalidArgument { what: "node_id" },
            DominoError::NotFound,
            DominoError::DuplicateId,
            DominoError::OutOfMemory,
            DominoError::BufferTooSmall { needed: 3 },
            DominoError::IntegrityViolation { what: "node table sort" },
            DominoError::DeterminismFault { what: "duplicate order key" },
            DominoError::Cycle,
            DominoError::CapabilityMismatch,
        ];
        for e in &errs {
            assert!(!e.to_string().is_empty());
        }
    }
}
