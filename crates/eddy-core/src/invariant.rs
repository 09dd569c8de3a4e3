//! Stable identifiers for internal invariant assertions.
//!
//! The public API of the engine is total: every call either returns a
//! solved value or does not return. The conditions below can only arise
//! from a bug in the engine itself or from a caller breaking a documented
//! usage contract, so they are enforced by assertions rather than
//! surfaced as recoverable errors. Cannot-happen internal states use
//! `debug_assert!` (compiled out in release); contract violations that
//! would otherwise produce garbage panic unconditionally.
//!
//! Every assertion message leads with one of these identifiers so a bug
//! report can name the exact violated contract.

/// An empty change batch was delivered to an accumulator update.
///
/// The worklist only stores batches produced by seeding (full input set of
/// a non-empty accumulator) or by merging non-empty notification batches,
/// so an empty batch reaching an update indicates an engine bug.
pub const EMPTY_CHANGE_BATCH: &str = "EDDY_INVARIANT_EMPTY_CHANGE_BATCH";

/// A single-input accumulator received a batch with more than one entry.
///
/// The single-input constructor declares exactly one input, so every
/// batch for it is a subset of `{0}`.
pub const SINGLETON_BATCH: &str = "EDDY_INVARIANT_SINGLETON_BATCH";

/// `depth_first` was launched on an already-discovered node.
///
/// Callers must check `is_discovered` before launching; the engine does so
/// in `get`.
pub const REDISCOVERED_NODE: &str = "EDDY_INVARIANT_REDISCOVERED_NODE";

/// Two nodes were compared by finish time before both were finished.
///
/// Finish-time ordering is only defined once DFS has stamped both nodes;
/// the engine never enqueues a locus before its finish stamp.
pub const UNFINISHED_ORDERING: &str = "EDDY_INVARIANT_UNFINISHED_ORDERING";

/// A delay cell forced itself during its own resolution.
///
/// A thunk whose resolution reaches back into the same delay describes an
/// infinite regress with no accumulator to cap it; no value exists.
pub const RECURSIVE_DELAY: &str = "EDDY_INVARIANT_RECURSIVE_DELAY";

/// A placeholder from `Context::recursive` was forced before the closure
/// returned a cell to back it.
///
/// Placeholders may be stored and wired during the closure, but nothing
/// may *solve* through one until `recursive` has returned.
pub const UNRESOLVED_PLACEHOLDER: &str = "EDDY_INVARIANT_UNRESOLVED_PLACEHOLDER";

/// An accumulator's link map reached a cell owned by a different context.
///
/// Contexts are fully isolated; wiring cells from two contexts into one
/// equation is a usage violation per the solver's contract.
pub const FOREIGN_CONTEXT: &str = "EDDY_INVARIANT_FOREIGN_CONTEXT";
