//! Traversal and scheduling machinery for the Eddy fixpoint engine.
//!
//! Two generic building blocks live here, deliberately independent of the
//! solver's node types:
//!
//! - [`dfs`]: recursive depth-first search stamping discovery and finish
//!   times from a shared [`TimeSource`], so that multiple launches yield a
//!   single coherent timeline.
//! - [`worklist`]: a priority worklist with monoidal coalescing of pending
//!   work per locus.
//!
//! The engine crate wires accumulators into both; tests here exercise the
//! machinery on plain graphs and plain monoids.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod dfs;
pub mod worklist;

pub use dfs::{depth_first, finish_time_ordering, DfsNode, TimeSource, Timestamp};
pub use worklist::Worklist;
