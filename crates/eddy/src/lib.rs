//! Eddy: a dataflow fixpoint engine.
//!
//! Declare a network of mutually dependent values — cycles and direct
//! self-reference included — and ask for a solved value. The engine
//! discovers the reachable subgraph on demand and iterates it to
//! quiescence; convergence is guaranteed for monotone combiners over
//! bounded semilattices, the shape of classic dataflow analyses
//! (nullability and first/follow sets, liveness, constant propagation).
//!
//! This is the top-level facade crate re-exporting the public API of the
//! Eddy sub-crates. For most users, adding `eddy` as a single dependency
//! is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use eddy::prelude::*;
//!
//! let ctx = Context::new();
//!
//! // Transitive closure over a two-node cycle: each side starts with its
//! // own element and absorbs the other's, until neither side grows.
//! let left = ctx.recursive(|left| {
//!     let right = ctx.accumulator_single(
//!         left,
//!         std::collections::BTreeSet::from([2]),
//!         |seen: &std::collections::BTreeSet<i32>, got| seen | got,
//!     );
//!     ctx.accumulator_single(
//!         right,
//!         std::collections::BTreeSet::from([1]),
//!         |seen, got| seen | got,
//!     )
//! });
//!
//! assert_eq!(left.get(), std::collections::BTreeSet::from([1, 2]));
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the
//! prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `eddy-core` | IDs, the `InputSet` bitset, invariant codes |
//! | [`graph`] | `eddy-graph` | Depth-first traversal and the generic worklist |
//! | [`engine`] | `eddy-engine` | Cells, contexts, combinators, metrics, tracing |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and invariant codes (`eddy-core`).
///
/// Contains [`types::NodeId`], [`types::InputId`], the
/// [`types::InputSet`] bitset, and the stable identifiers carried by
/// fatal assertions.
pub use eddy_core as types;

/// Traversal and scheduling machinery (`eddy-graph`).
///
/// The [`graph::DfsNode`] capability trait with
/// [`graph::depth_first`], shared [`graph::TimeSource`] clocks, and the
/// generic coalescing [`graph::Worklist`].
pub use eddy_graph as graph;

/// The solver (`eddy-engine`).
///
/// [`engine::Context`] and [`engine::Cell`] are the main entry points;
/// [`engine::combinators`] holds the derived vocabulary.
pub use eddy_engine as engine;

/// Common imports for typical Eddy usage.
///
/// ```rust
/// use eddy::prelude::*;
/// ```
pub mod prelude {
    // Cells and contexts
    pub use eddy_engine::{Cell, Context, ContextConfig};

    // Derived combinators
    pub use eddy_engine::{ap, ap2, map2, sequence, traverse};

    // Diagnostics
    pub use eddy_engine::{SolveMetrics, TraceEvent, TraceSink};

    // Core types
    pub use eddy_core::{InputId, InputSet, NodeId};
}
