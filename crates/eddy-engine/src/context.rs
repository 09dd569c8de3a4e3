//! Solver contexts: ownership boundary of one dataflow network.
//!
//! A [`Context`] owns exactly one traversal clock, one worklist, and one
//! set of metrics. Everything a `get` touches belongs to the context that
//! created the cell; independent contexts share no state at all. The
//! shared state is `Rc`-based, so a context (and every cell it creates)
//! is `!Send` — concurrent solving is ruled out at compile time rather
//! than documented away.
//!
//! Cells that participate in reference cycles keep each other alive
//! through registered observers; they are reclaimed with the cycle, not
//! with the last user handle. Context-scoped lifetimes make this a
//! non-issue in practice: cells live as long as the equations they model.

use std::cell::{OnceCell, RefCell};
use std::fmt;
use std::rc::Rc;

use eddy_core::{invariant, InputSet};
use eddy_graph::{TimeSource, Worklist};

use crate::cell::Cell;
use crate::metrics::SolveMetrics;
use crate::node::{AccRef, AccumCore, AccumNode, AnyCell};
use crate::reactive::Reactive;
use crate::solve::Locus;
use crate::trace::{TraceEvent, TraceSink};

// ── Shared state ───────────────────────────────────────────────────

/// State shared by every accumulator of one context.
pub(crate) struct SolverState {
    pub(crate) time: TimeSource,
    pub(crate) worklist: Worklist<Locus, InputSet>,
    pub(crate) metrics: RefCell<SolveMetrics>,
    trace: Option<TraceSink>,
}

impl SolverState {
    fn new(config: ContextConfig) -> Rc<Self> {
        Rc::new(Self {
            time: TimeSource::new(),
            worklist: Worklist::new(
                |locus: &Locus, todos: InputSet| locus.node().0.apply(&todos),
                InputSet::empty(),
                |incoming: InputSet, pending: InputSet| incoming.union(&pending),
            ),
            metrics: RefCell::new(SolveMetrics::default()),
            trace: config.trace,
        })
    }

    /// Hand an event to the trace sink, if one is installed.
    ///
    /// The event is only built when a sink exists.
    pub(crate) fn emit(&self, event: impl FnOnce() -> TraceEvent) {
        if let Some(sink) = &self.trace {
            sink(&event());
        }
    }
}

// ── Configuration ──────────────────────────────────────────────────

/// Configuration for a [`Context`].
#[derive(Clone, Default)]
pub struct ContextConfig {
    /// Optional diagnostic event sink. `None` = tracing off.
    pub trace: Option<TraceSink>,
}

impl fmt::Debug for ContextConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextConfig")
            .field("trace", &self.trace.is_some())
            .finish()
    }
}

// ── Context ────────────────────────────────────────────────────────

/// An isolated solver instance: one traversal clock, one worklist, one
/// metrics block.
///
/// All cell constructors live here so that every accumulator is born
/// knowing its owner. Wiring cells from two different contexts into one
/// equation is a usage violation; the engine debug-asserts against it
/// while building upstream links.
pub struct Context {
    state: Rc<SolverState>,
}

impl Context {
    /// Create a context with default configuration.
    pub fn new() -> Self {
        Self::with_config(ContextConfig::default())
    }

    /// Create a context with an explicit [`ContextConfig`].
    pub fn with_config(config: ContextConfig) -> Self {
        Self {
            state: SolverState::new(config),
        }
    }

    /// A snapshot of the context's cumulative [`SolveMetrics`].
    pub fn metrics(&self) -> SolveMetrics {
        self.state.metrics.borrow().clone()
    }

    // ── Cell constructors ──────────────────────────────────────

    /// A constant cell.
    pub fn pure<A: 'static>(&self, value: A) -> Cell<A> {
        Cell::from_constant(value)
    }

    /// A constant cell of the unit value.
    pub fn unit(&self) -> Cell<()> {
        self.pure(())
    }

    /// A lazy cell: `thunk` produces the inner cell on first use and runs
    /// at most once.
    ///
    /// This is the cycle-breaking primitive: a thunk may reference cells
    /// that do not exist yet at declaration time, as long as they exist
    /// by first use. A thunk that forces its own delay during resolution
    /// panics (`EDDY_INVARIANT_RECURSIVE_DELAY`).
    pub fn delay<A: 'static>(&self, thunk: impl FnOnce() -> Cell<A> + 'static) -> Cell<A> {
        Cell::from_delay(crate::node::DelayNode::new(thunk))
    }

    /// Tie a recursive knot: hand `wire` a placeholder for the cell it is
    /// about to build, and back the placeholder with the result.
    ///
    /// The placeholder is a delay; it may be stored and used as an input
    /// inside `wire`, but nothing may *solve* through it until `recursive`
    /// has returned (`EDDY_INVARIANT_UNRESOLVED_PLACEHOLDER`).
    ///
    /// ```rust
    /// # use eddy_engine::Context;
    /// let ctx = Context::new();
    /// // a = (a + 1764/a) / 2, seeded at 1.0
    /// let a = ctx.recursive(|a| {
    ///     ctx.accumulator_single(a, 1.0_f64, |x, y| (x + 1764.0 / y) / 2.0)
    /// });
    /// assert_eq!(a.get(), 42.0);
    /// ```
    pub fn recursive<A: 'static>(&self, wire: impl FnOnce(Cell<A>) -> Cell<A>) -> Cell<A> {
        let slot: Rc<OnceCell<Cell<A>>> = Rc::new(OnceCell::new());
        let read = slot.clone();
        let placeholder = self.delay(move || {
            read.get()
                .unwrap_or_else(|| {
                    panic!(
                        "{}: placeholder solved before `recursive` returned",
                        invariant::UNRESOLVED_PLACEHOLDER,
                    )
                })
                .clone()
        });
        let cell = wire(placeholder);
        let _ = slot.set(cell.clone());
        cell
    }

    /// A multi-input accumulator.
    ///
    /// `combine` receives the current state and the *changed* inputs'
    /// current values, in input-declaration order; it must return the next
    /// state. An accumulator with an empty input list keeps `initial`
    /// forever — it is a constant by another name, and no later API call
    /// can grow its input list.
    ///
    /// Termination of a solve is `combine`'s contract: it must eventually
    /// return a value equal (`PartialEq`) to the current one. Monotone
    /// combiners over bounded semilattices always do; anything else is
    /// the caller's risk.
    pub fn accumulator<A, B>(
        &self,
        inputs: impl IntoIterator<Item = Cell<A>>,
        initial: B,
        combine: impl Fn(&B, &[A]) -> B + 'static,
    ) -> Cell<B>
    where
        A: Clone + 'static,
        B: Clone + PartialEq + 'static,
    {
        let typed: Rc<Vec<Cell<A>>> = Rc::new(inputs.into_iter().collect());
        let erased: Vec<Box<dyn AnyCell>> = typed
            .iter()
            .map(|cell| Box::new(cell.clone()) as Box<dyn AnyCell>)
            .collect();

        let reader = typed.clone();
        let recompute = move |state: &B, changed: &InputSet| {
            let values: Vec<A> = changed
                .iter()
                .map(|id| reader[id.0 as usize].current_value())
                .collect();
            combine(state, &values)
        };

        let node = Rc::new(AccumNode::new(
            self.state.clone(),
            erased,
            Reactive::new(initial, recompute),
        ));
        let handle = AccRef(node.clone() as Rc<dyn AccumCore>);
        Cell::from_accumulator(node, handle)
    }

    /// A single-input accumulator; sugar over [`accumulator`](Self::accumulator).
    ///
    /// `step` receives the one changed input's value directly. Every
    /// change batch for a single-input accumulator is a singleton; the
    /// wrapper asserts as much (`EDDY_INVARIANT_SINGLETON_BATCH`).
    pub fn accumulator_single<A, B>(
        &self,
        input: Cell<A>,
        initial: B,
        step: impl Fn(&B, &A) -> B + 'static,
    ) -> Cell<B>
    where
        A: Clone + 'static,
        B: Clone + PartialEq + 'static,
    {
        self.accumulator([input], initial, move |state, changed: &[A]| {
            debug_assert!(
                changed.len() == 1,
                "{}: single-input accumulator received {} changed inputs",
                invariant::SINGLETON_BATCH,
                changed.len(),
            );
            step(state, &changed[0])
        })
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("metrics", &self.metrics())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_context_has_zero_metrics() {
        let ctx = Context::new();
        assert_eq!(ctx.metrics(), SolveMetrics::default());
    }

    #[test]
    fn pure_and_unit_are_constants() {
        let ctx = Context::new();
        assert_eq!(ctx.pure(9i32).get(), 9);
        ctx.unit().get();
        // Constants never launch a traversal.
        assert_eq!(ctx.metrics().traversals, 0);
    }

    #[test]
    fn empty_input_accumulator_keeps_its_initial_value() {
        let ctx = Context::new();
        let inputs: Vec<Cell<u32>> = Vec::new();
        let acc = ctx.accumulator(inputs, 7u32, |state: &u32, _changed: &[u32]| {
            unreachable!("no inputs, so combine can never run: state {state}")
        });

        assert_eq!(acc.get(), 7);
        // The accumulator was discovered but never seeded or updated.
        let m = ctx.metrics();
        assert_eq!(m.traversals, 1);
        assert_eq!(m.discovered, 1);
        assert_eq!(m.updates, 0);
    }

    #[test]
    #[should_panic(expected = "EDDY_INVARIANT_UNRESOLVED_PLACEHOLDER")]
    fn placeholder_solved_inside_wire_panics() {
        let ctx = Context::new();
        let _ = ctx.recursive(|placeholder: Cell<u32>| {
            let _ = placeholder.get(); // too early: nothing backs it yet
            placeholder
        });
    }
}
