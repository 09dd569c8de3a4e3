//! The public [`Cell`] handle.
//!
//! A `Cell<A>` is a cheap clone over a shared heap node; cloning never
//! copies values or graph structure. Structurally a cell is one of four
//! kinds — constant, derived (maps and zips), accumulator, or delay — but
//! the kind is an implementation detail: the public surface is reading
//! ([`current_value`](Cell::current_value)), solving ([`get`](Cell::get)),
//! and building new cells on top ([`map`](Cell::map), [`zip`](Cell::zip)).

use std::fmt;
use std::rc::Rc;

use smallvec::smallvec;

use eddy_graph::DfsNode;

use crate::node::{merge_upstream, AccRef, AccumNode, AnyCell, DelayNode, DerivedNode, UpstreamList};
use crate::solve;

/// A node in a dataflow network, producing values of type `A`.
///
/// Cells are created through a [`Context`](crate::Context) and live as
/// long as any handle to them (or to a cell downstream of them) does.
/// They are structurally immutable once wired; only an accumulator's
/// *value* changes, and only while a solve is running.
pub struct Cell<A> {
    inner: Inner<A>,
}

enum Inner<A> {
    Constant(Rc<A>),
    Derived(Rc<DerivedNode<A>>),
    Accumulator {
        node: Rc<AccumNode<A>>,
        handle: AccRef,
    },
    Delay(Rc<DelayNode<A>>),
}

impl<A> Clone for Cell<A> {
    fn clone(&self) -> Self {
        let inner = match &self.inner {
            Inner::Constant(value) => Inner::Constant(value.clone()),
            Inner::Derived(node) => Inner::Derived(node.clone()),
            Inner::Accumulator { node, handle } => Inner::Accumulator {
                node: node.clone(),
                handle: handle.clone(),
            },
            Inner::Delay(node) => Inner::Delay(node.clone()),
        };
        Self { inner }
    }
}

// ── Construction (crate-internal; the context is the public door) ──

impl<A> Cell<A> {
    pub(crate) fn from_constant(value: A) -> Self {
        Self {
            inner: Inner::Constant(Rc::new(value)),
        }
    }

    pub(crate) fn from_derived(node: DerivedNode<A>) -> Self {
        Self {
            inner: Inner::Derived(Rc::new(node)),
        }
    }

    pub(crate) fn from_accumulator(node: Rc<AccumNode<A>>, handle: AccRef) -> Self {
        Self {
            inner: Inner::Accumulator { node, handle },
        }
    }

    pub(crate) fn from_delay(node: DelayNode<A>) -> Self {
        Self {
            inner: Inner::Delay(Rc::new(node)),
        }
    }
}

// ── Reading and solving ────────────────────────────────────────────

impl<A: 'static> Cell<A> {
    /// The accumulators whose current values feed this cell with no
    /// intervening accumulator. An accumulator caps upstream visibility
    /// and reports only itself.
    pub(crate) fn upstream_accumulators(&self) -> UpstreamList {
        match &self.inner {
            Inner::Constant(_) => UpstreamList::new(),
            Inner::Derived(node) => node.upstream_accumulators(),
            Inner::Accumulator { handle, .. } => smallvec![handle.clone()],
            Inner::Delay(node) => node.force().upstream_accumulators(),
        }
    }

    /// The erased solver handle, when this cell is an accumulator.
    pub(crate) fn accumulator_handle(&self) -> Option<AccRef> {
        match &self.inner {
            Inner::Accumulator { handle, .. } => Some(handle.clone()),
            _ => None,
        }
    }
}

impl<A: Clone + 'static> Cell<A> {
    /// The cell's value as of now, without solving.
    ///
    /// Constants and derived cells compute on demand; an accumulator that
    /// has never been solved reports its initial value. Reading a delay
    /// resolves its inner cell.
    pub fn current_value(&self) -> A {
        match &self.inner {
            Inner::Constant(value) => (**value).clone(),
            Inner::Derived(node) => node.value(),
            Inner::Accumulator { node, .. } => node.value(),
            Inner::Delay(node) => node.force().current_value(),
        }
    }

    /// Solve this cell and return its converged value.
    ///
    /// On an undiscovered accumulator this runs the full two-phase solve:
    /// depth-first discovery of the reachable subgraph, then a worklist
    /// drain to quiescence. On an already-discovered accumulator it is a
    /// read. Non-accumulators force each upstream accumulator and then
    /// recompute.
    ///
    /// Termination is the caller's contract: combiners must eventually
    /// reproduce their current value (monotone functions over bounded
    /// semilattices always do).
    pub fn get(&self) -> A {
        match &self.inner {
            Inner::Constant(value) => (**value).clone(),
            Inner::Accumulator { node, handle } => {
                if !handle.is_discovered() {
                    solve::discover_and_solve(handle);
                }
                node.value()
            }
            Inner::Derived(_) | Inner::Delay(_) => {
                for upstream in self.upstream_accumulators() {
                    if !upstream.is_discovered() {
                        solve::discover_and_solve(&upstream);
                    }
                }
                self.current_value()
            }
        }
    }
}

// ── Combinators ────────────────────────────────────────────────────

impl<A: Clone + 'static> Cell<A> {
    /// A cell whose value is `f` applied to this cell's value.
    pub fn map<B: 'static>(&self, f: impl Fn(A) -> B + 'static) -> Cell<B> {
        let source = self.clone();
        let upstream_source = self.clone();
        Cell::from_derived(DerivedNode::new(
            move || f(source.current_value()),
            move || upstream_source.upstream_accumulators(),
        ))
    }

    /// A cell pairing this cell's value with `other`'s.
    pub fn zip<B: Clone + 'static>(&self, other: &Cell<B>) -> Cell<(A, B)> {
        let left = self.clone();
        let right = other.clone();
        let upstream_left = self.clone();
        let upstream_right = other.clone();
        Cell::from_derived(DerivedNode::new(
            move || (left.current_value(), right.current_value()),
            move || {
                merge_upstream(
                    upstream_left.upstream_accumulators(),
                    upstream_right.upstream_accumulators(),
                )
            },
        ))
    }

    /// A cell tripling this cell's value with `b`'s and `c`'s.
    pub fn zip3<B, C>(&self, b: &Cell<B>, c: &Cell<C>) -> Cell<(A, B, C)>
    where
        B: Clone + 'static,
        C: Clone + 'static,
    {
        self.zip(b).zip(c).map(|((a, b), c)| (a, b, c))
    }
}

impl<A> Cell<A> {
    /// Attach a human-readable label for trace output and `Debug`.
    ///
    /// Purely diagnostic; no semantic effect. Labels attach to the
    /// underlying node: constants and delays have no node of their own
    /// and ignore the label.
    pub fn named(self, name: &str) -> Self {
        match &self.inner {
            Inner::Accumulator { node, .. } => node.set_name(name),
            Inner::Derived(node) => node.set_name(name),
            Inner::Constant(_) | Inner::Delay(_) => {}
        }
        self
    }
}

impl<A> fmt::Debug for Cell<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (kind, label) = match &self.inner {
            Inner::Constant(_) => ("constant", None),
            Inner::Derived(node) => ("derived", node.debug_label()),
            Inner::Accumulator { node, .. } => ("accumulator", node.debug_label()),
            Inner::Delay(_) => ("delay", None),
        };
        let mut debug = f.debug_struct("Cell");
        debug.field("kind", &kind);
        if let Some(label) = label {
            debug.field("name", &label);
        }
        debug.finish()
    }
}

impl<A: 'static> AnyCell for Cell<A> {
    fn upstream_accumulators(&self) -> UpstreamList {
        Cell::upstream_accumulators(self)
    }
}
