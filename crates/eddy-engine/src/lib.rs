//! The Eddy dataflow fixpoint solver.
//!
//! A [`Context`] owns a network of [`Cell`]s — constants, derived
//! mappers/zips, lazy delays, and stateful *accumulators* — and solves it
//! on demand: `get` on an accumulator discovers the reachable subgraph by
//! depth-first search, then drives a finish-time-ordered worklist until no
//! accumulator's value changes. Cyclic equations (including direct
//! self-reference) converge whenever the user's combiners stabilize, e.g.
//! monotone combiners over bounded semilattices.
//!
//! ```rust
//! use eddy_engine::Context;
//!
//! let ctx = Context::new();
//! // Heron's method as a self-referential equation: a = (a + 1764/a) / 2.
//! let a = ctx.recursive(|a| {
//!     ctx.accumulator_single(a, 1.0_f64, |x, y| (x + 1764.0 / y) / 2.0)
//! });
//! assert_eq!(a.get(), 42.0);
//! ```
//!
//! The engine is single-threaded and synchronous: a `get` runs the whole
//! solve on the calling thread, and `Context` is `!Send` by construction.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cell;
pub mod combinators;
pub mod context;
pub mod metrics;
pub mod reactive;
pub mod trace;

mod node;
mod solve;

pub use cell::Cell;
pub use combinators::{ap, ap2, map2, sequence, traverse};
pub use context::{Context, ContextConfig};
pub use metrics::SolveMetrics;
pub use reactive::Reactive;
pub use trace::{TraceEvent, TraceSink};
