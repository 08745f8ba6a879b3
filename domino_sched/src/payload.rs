// Copyright 2026 the Domino Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Value-copied work item payloads (`spec.md` §4.5 "`WorkItem` carries an
//! inline copy of its small payload...").

use alloc::rc::Rc;

/// Payloads up to this many bytes are stored inline in the `WorkItem`
/// itself; larger payloads spill to [`Payload::External`].
pub const INLINE_CAPACITY: usize = 32;

/// A value-copied, bounded-size byte payload. Items within
/// [`INLINE_CAPACITY`] are stored inline (no allocation); larger items
/// reference external storage. `spec.md` describes the external case as
/// "a borrowed pointer with a documented lifetime (at least until the
/// work item is executed or dropped by the scheduler)" — an `Rc<[u8]>`
/// satisfies that lifetime without unsafe code or a raw pointer, at the
/// cost of a refcount bump instead of a true borrow.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Payload {
    /// Inline payload, value-copied into the work item.
    Inline {
        /// Backing storage; only the first `len` bytes are meaningful.
        buf: [u8; INLINE_CAPACITY],
        /// Number of valid bytes in `buf`.
        len: u8,
    },
    /// Payload exceeding [`INLINE_CAPACITY`], held externally.
    External(Rc<[u8]>),
}

impl Payload {
    /// Empty payload.
    #[must_use]
    pub const fn empty() -> Self {
        Self::Inline {
            buf: [0; INLINE_CAPACITY],
            len: 0,
        }
    }

    /// Copies `bytes`, choosing inline or external storage based on
    /// length.
    #[must_use]
    pub fn from_slice(bytes: &[u8]) -> Self {
        if bytes.len() <= INLINE_CAPACITY {
            let mut buf = [0u8; INLINE_CAPACITY];
            buf[..bytes.len()].copy_from_slice(bytes);
            Self::Inline {
                buf,
                len: bytes.len() as u8,
            }
        } else {
            Self::External(Rc::from(bytes))
        }
    }

    /// Borrows the payload's bytes.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        match self {
            Self::Inline { buf, len } => &buf[..usize::from(*len)],
            Self::External(bytes) => bytes,
        }
    }
}

impl Default for Payload {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn small_payload_round_trips_inline() {
        let p = Payload::from_slice(&[1, 2, 3]);
        assert!(matches!(p, Payload::Inline { .. }));
        assert_eq!(p.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn large_payload_spills_external() {
        let bytes = vec![7u8; INLINE_CAPACITY + 1];
        let p = Payload::from_slice(&bytes);
        assert!(matches!(p, Payload::External(_)));
        assert_eq!(p.as_slice(), bytes.as_slice());
    }
}
