//! Core types for the Eddy dataflow fixpoint engine.
//!
//! This is the leaf crate with zero internal Eddy dependencies. It defines
//! the strongly-typed identifiers shared across the workspace, the
//! [`InputSet`] bitset used to coalesce change notifications, and the
//! stable invariant-code table referenced by fatal assertions.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod id;
pub mod inputs;
pub mod invariant;

// Re-export core types at crate root for convenience.
pub use id::{InputId, NodeId};
pub use inputs::{InputSet, InputSetIter};
