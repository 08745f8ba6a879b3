// Copyright 2026 the Domino Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Access sets (`spec.md` §3 "Access set", §4.7 "Access-set builder").

use alloc::vec::Vec;

use domino_types::{DominoError, DominoResult};

/// Which access class a [`Range`] belongs to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum AccessClass {
    /// Read-only access.
    Read,
    /// Exclusive mutation.
    Write,
    /// Commutative accumulation (e.g. `+=`); writers of this class do not
    /// conflict with each other.
    Reduce,
}

/// A contiguous span of a named resource, e.g. a population index range or
/// a ledger account range. `resource_id` names the resource; `start`/`len`
/// bound the span within it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Range {
    /// Which resource this range is within.
    pub resource_id: u64,
    /// First index covered.
    pub start: u64,
    /// Number of indices covered; `0` is rejected by the builder.
    pub len: u64,
}

impl Range {
    /// Exclusive end index (`start + len`).
    #[must_use]
    pub fn end(&self) -> u64 {
        self.start + self.len
    }

    fn overlaps(&self, other: &Self) -> bool {
        self.resource_id == other.resource_id && self.start < other.end() && other.start < self.end()
    }
}

/// A finalized set of declarative read/write/reduce ranges referenced by a
/// task via `access_set_id` (`spec.md` §3).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AccessSet {
    /// Identifier of this access set, assigned by the builder at finalize.
    pub id: u64,
    /// Sorted, non-overlapping read ranges.
    pub reads: Vec<Range>,
    /// Sorted, non-overlapping write ranges.
    pub writes: Vec<Range>,
    /// Sorted, non-overlapping reduce ranges.
    pub reduces: Vec<Range>,
}

/// Builds [`AccessSet`]s across a tick, merging overlapping ranges of the
/// same class and rejecting read/write conflicts at `finalize`
/// (`spec.md` §4.7). Every `AccessSet` a single builder produces within
/// a tick is checked against every `AccessSet` it already produced
/// since the last `reset()`, so overlaps are caught across tasks (and
/// across the different producers that share one builder instance), not
/// just within one task's own ranges.
#[derive(Debug, Default)]
pub struct AccessSetBuilder {
    next_id: u64,
    reads: Vec<Range>,
    writes: Vec<Range>,
    reduces: Vec<Range>,
    committed_reads: Vec<Range>,
    committed_writes: Vec<Range>,
    committed_reduces: Vec<Range>,
}

impl AccessSetBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all buffered ranges, including the committed history
    /// `finalize` checks new access sets against, preserving capacities.
    /// Called once per tick, before any task emits its access set
    /// (`spec.md` §4.6 step 1 "begin_tick").
    pub fn reset(&mut self) {
        self.reads.clear();
        self.writes.clear();
        self.reduces.clear();
        self.committed_reads.clear();
        self.committed_writes.clear();
        self.committed_reduces.clear();
    }

    /// Adds a read range.
    pub fn add_read(&mut self, range: Range) -> DominoResult<()> {
        Self::push_checked(&mut self.reads, range)
    }

    /// Adds a write range.
    pub fn add_write(&mut self, range: Range) -> DominoResult<()> {
        Self::push_checked(&mut self.writes, range)
    }

    /// Adds a reduce range.
    pub fn add_reduce(&mut self, range: Range) -> DominoResult<()> {
        Self::push_checked(&mut self.reduces, range)
    }

    fn push_checked(dst: &mut Vec<Range>, range: Range) -> DominoResult<()> {
        if range.len == 0 {
            return Err(DominoError::InvalidArgument {
                what: "range length must be non-zero",
            });
        }
        dst.push(range);
        Ok(())
    }

    /// Finalizes the current set of ranges: merges overlapping ranges
    /// within each class, verifies no read overlaps a write of a
    /// higher-priority writer, and returns the built [`AccessSet`].
    /// "Higher-priority" means committed earlier in the tick: every
    /// range here is checked against every range already committed by
    /// an earlier `finalize()` call on this same builder since the last
    /// `reset()`, so a later task's declared access set can conflict
    /// with an earlier task's, not only with itself. Returns
    /// `DeterminismFault` on conflict (`spec.md` §4.6 "an access-set
    /// conflict detected by the builder").
    pub fn finalize(&mut self) -> DominoResult<AccessSet> {
        let reads = merge_class(&mut self.reads);
        let writes = merge_class(&mut self.writes);
        let reduces = merge_class(&mut self.reduces);

        for w in &writes {
            if reads.iter().any(|r| r.overlaps(w)) || reduces.iter().any(|r| r.overlaps(w)) {
                return Err(DominoError::DeterminismFault {
                    what: "access set: write overlaps read or reduce",
                });
            }
        }
        for (i, w1) in writes.iter().enumerate() {
            if writes[i + 1..].iter().any(|w2| w1.overlaps(w2)) {
                return Err(DominoError::DeterminismFault {
                    what: "access set: write overlaps write",
                });
            }
        }

        for w in &writes {
            if self.committed_reads.iter().any(|r| r.overlaps(w))
                || self.committed_writes.iter().any(|r| r.overlaps(w))
                || self.committed_reduces.iter().any(|r| r.overlaps(w))
            {
                return Err(DominoError::DeterminismFault {
                    what: "access set: write overlaps an earlier task's access set",
                });
            }
        }
        for r in &reads {
            if self.committed_writes.iter().any(|w| w.overlaps(r))
                || self.committed_reduces.iter().any(|w| w.overlaps(r))
            {
                return Err(DominoError::DeterminismFault {
                    what: "access set: read overlaps an earlier task's write or reduce",
                });
            }
        }
        for rd in &reduces {
            if self.committed_writes.iter().any(|w| w.overlaps(rd))
                || self.committed_reads.iter().any(|w| w.overlaps(rd))
            {
                return Err(DominoError::DeterminismFault {
                    what: "access set: reduce overlaps an earlier task's read or write",
                });
            }
        }

        let id = self.next_id;
        self.next_id += 1;
        self.committed_reads.extend(reads.iter().copied());
        self.committed_writes.extend(writes.iter().copied());
        self.committed_reduces.extend(reduces.iter().copied());
        self.reads.clear();
        self.writes.clear();
        self.reduces.clear();
        Ok(AccessSet {
            id,
            reads,
            writes,
            reduces,
        })
    }
}

fn merge_class(ranges: &mut Vec<Range>) -> Vec<Range> {
    ranges.sort();
    let mut merged: Vec<Range> = Vec::with_capacity(ranges.len());
    for r in ranges.drain(..) {
        if let Some(last) = merged.last_mut() {
            if last.resource_id == r.resource_id && r.start <= last.end() {
                let new_end = last.end().max(r.end());
                last.len = new_end - last.start;
                continue;
            }
        }
        merged.push(r);
    }
    merged
}
