//! Strongly-typed identifiers for cells and their inputs.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique [`NodeId`] allocation.
static NODE_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-instance identity of an accumulator node.
///
/// Allocated from a monotonic atomic counter via [`NodeId::next`]. Two
/// distinct accumulators always have different IDs, even when they were
/// built from identical inputs and combiners. Upstream link maps are keyed
/// by `NodeId` so that the same accumulator reached through two different
/// derived paths coalesces into a single entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// Allocate a fresh, unique node ID.
    ///
    /// Each call returns an ID that has never been returned before within
    /// this process.
    pub fn next() -> Self {
        Self(NODE_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index of a declared input within one accumulator's input list.
///
/// Inputs are positional: `InputId(n)` is the n-th cell passed to the
/// accumulator constructor. The ID is only meaningful relative to its
/// owning accumulator; change batches ([`InputSet`](crate::InputSet))
/// carry these indices rather than cell handles so that batches of
/// differently-typed accumulators share one representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InputId(pub u32);

impl fmt::Display for InputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for InputId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}
