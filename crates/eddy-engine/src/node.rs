//! Heap nodes behind [`Cell`](crate::Cell) and the type-erasure seam.
//!
//! Element types live in closures: an accumulator built over `Cell<A>`
//! inputs keeps the typed input list inside its recompute function, and
//! everything the solver needs at runtime — timestamps, upstream links,
//! change application — goes through the object-safe [`AccumCore`] trait.
//! The erased handle [`AccRef`] is what participates in depth-first
//! discovery and the worklist.

use std::cell::Cell as StdCell;
use std::cell::{OnceCell, RefCell};
use std::rc::Rc;

use indexmap::IndexMap;
use smallvec::SmallVec;

use eddy_core::{invariant, InputId, InputSet, NodeId};
use eddy_graph::{DfsNode, Timestamp};

use crate::cell::Cell;
use crate::context::SolverState;
use crate::reactive::Reactive;
use crate::trace::TraceEvent;

/// Short list of upstream accumulator handles.
///
/// Most cells sit over one or two accumulators; four inline slots cover
/// every graph in the test corpus without touching the heap.
pub(crate) type UpstreamList = SmallVec<[AccRef; 4]>;

/// Append `extra` onto `base`, dropping handles already present.
///
/// Order is preserved: first-seen wins, which keeps link-map insertion
/// order (and through it, traversal order) deterministic.
pub(crate) fn merge_upstream(mut base: UpstreamList, extra: UpstreamList) -> UpstreamList {
    for acc in extra {
        if !base.iter().any(|seen| seen.id() == acc.id()) {
            base.push(acc);
        }
    }
    base
}

// ── Erasure traits ─────────────────────────────────────────────────

/// Upstream discovery for a cell of any element type.
///
/// This is the only capability an accumulator needs from its inputs at
/// link-building time; reading input *values* stays inside the typed
/// recompute closure.
pub(crate) trait AnyCell {
    /// The accumulators whose values feed this cell with no intervening
    /// accumulator.
    fn upstream_accumulators(&self) -> UpstreamList;
}

/// Object-safe solver-side surface of an accumulator node.
pub(crate) trait AccumCore {
    /// Process-unique identity.
    fn node_id(&self) -> NodeId;
    /// The owning context's shared state.
    fn state(&self) -> &Rc<SolverState>;
    /// Diagnostic label, if attached.
    fn label(&self) -> Option<String>;
    /// Discovery timestamp slot.
    fn discovery_time(&self) -> Option<Timestamp>;
    /// Stamp the discovery time.
    fn set_discovery_time(&self, time: Timestamp);
    /// Finish timestamp slot.
    fn finish_time(&self) -> Option<Timestamp>;
    /// Stamp the finish time.
    fn set_finish_time(&self, time: Timestamp);
    /// Upstream accumulators paired with the inputs routed through each,
    /// building the link map on first call.
    fn links(&self) -> Vec<(AccRef, InputSet)>;
    /// Number of declared inputs.
    fn input_count(&self) -> u32;
    /// Apply a change batch: recompute, and on change notify observers.
    fn apply(&self, todos: &InputSet);
    /// Register an observer fired on every value change.
    fn register_on_update(&self, observer: Rc<dyn Fn()>);
}

/// Erased, cheaply clonable handle to an accumulator.
#[derive(Clone)]
pub(crate) struct AccRef(pub(crate) Rc<dyn AccumCore>);

impl AccRef {
    pub(crate) fn id(&self) -> NodeId {
        self.0.node_id()
    }
}

impl DfsNode for AccRef {
    fn discovery_time(&self) -> Option<Timestamp> {
        self.0.discovery_time()
    }
    fn set_discovery_time(&self, time: Timestamp) {
        self.0.set_discovery_time(time);
    }
    fn finish_time(&self) -> Option<Timestamp> {
        self.0.finish_time()
    }
    fn set_finish_time(&self, time: Timestamp) {
        self.0.set_finish_time(time);
    }
    fn child_nodes(&self) -> Vec<Self> {
        self.0.links().into_iter().map(|(upstream, _)| upstream).collect()
    }
}

// ── Accumulator ────────────────────────────────────────────────────

/// The stateful cell kind: the only node with timestamps, observers, and
/// a link map.
pub(crate) struct AccumNode<B> {
    id: NodeId,
    state: Rc<SolverState>,
    name: RefCell<Option<String>>,
    reactive: Reactive<B, InputSet>,
    inputs: Vec<Box<dyn AnyCell>>,
    /// `childNodesToInputs`: per upstream accumulator, the inputs whose
    /// value routes through it. Built lazily on first discovery.
    links: RefCell<Option<IndexMap<NodeId, (AccRef, InputSet)>>>,
    discovery: StdCell<Option<Timestamp>>,
    finish: StdCell<Option<Timestamp>>,
}

impl<B> AccumNode<B> {
    pub(crate) fn new(
        state: Rc<SolverState>,
        inputs: Vec<Box<dyn AnyCell>>,
        reactive: Reactive<B, InputSet>,
    ) -> Self {
        Self {
            id: NodeId::next(),
            state,
            name: RefCell::new(None),
            reactive,
            inputs,
            links: RefCell::new(None),
            discovery: StdCell::new(None),
            finish: StdCell::new(None),
        }
    }

    pub(crate) fn set_name(&self, name: &str) {
        *self.name.borrow_mut() = Some(name.to_string());
    }

    pub(crate) fn debug_label(&self) -> Option<String> {
        self.name.borrow().clone()
    }
}

impl<B: Clone> AccumNode<B> {
    pub(crate) fn value(&self) -> B {
        self.reactive.current_value()
    }
}

impl<B: Clone + PartialEq + 'static> AccumCore for AccumNode<B> {
    fn node_id(&self) -> NodeId {
        self.id
    }

    fn state(&self) -> &Rc<SolverState> {
        &self.state
    }

    fn label(&self) -> Option<String> {
        self.name.borrow().clone()
    }

    fn discovery_time(&self) -> Option<Timestamp> {
        self.discovery.get()
    }

    fn set_discovery_time(&self, time: Timestamp) {
        self.discovery.set(Some(time));
    }

    fn finish_time(&self) -> Option<Timestamp> {
        self.finish.get()
    }

    fn set_finish_time(&self, time: Timestamp) {
        self.finish.set(Some(time));
    }

    fn links(&self) -> Vec<(AccRef, InputSet)> {
        if self.links.borrow().is_none() {
            let mut map: IndexMap<NodeId, (AccRef, InputSet)> = IndexMap::new();
            for (index, input) in self.inputs.iter().enumerate() {
                for upstream in input.upstream_accumulators() {
                    debug_assert!(
                        Rc::ptr_eq(upstream.0.state(), &self.state),
                        "{}: input {} of accumulator {} is owned by a different context",
                        invariant::FOREIGN_CONTEXT,
                        index,
                        self.id,
                    );
                    let key = upstream.id();
                    let entry = map
                        .entry(key)
                        .or_insert_with(|| (upstream, InputSet::empty()));
                    entry.1.insert(InputId(index as u32));
                }
            }
            *self.links.borrow_mut() = Some(map);
        }
        self.links
            .borrow()
            .as_ref()
            .map(|map| map.values().cloned().collect())
            .unwrap_or_default()
    }

    fn input_count(&self) -> u32 {
        self.inputs.len() as u32
    }

    fn apply(&self, todos: &InputSet) {
        debug_assert!(
            !todos.is_empty(),
            "{}: empty change batch delivered to accumulator {}",
            invariant::EMPTY_CHANGE_BATCH,
            self.id,
        );
        let changed = self.reactive.update(todos);

        let mut metrics = self.state.metrics.borrow_mut();
        metrics.updates += 1;
        if changed {
            metrics.value_changes += 1;
        }
        drop(metrics);

        self.state.emit(|| TraceEvent::Updated {
            name: self.label(),
            changed,
        });
    }

    fn register_on_update(&self, observer: Rc<dyn Fn()>) {
        self.reactive.register_on_update(observer);
    }
}

// ── Derived ────────────────────────────────────────────────────────

/// The stateless cell kind: maps, zips, and wider formal combinators all
/// reduce to an evaluation closure plus an upstream closure.
pub(crate) struct DerivedNode<A> {
    eval: Box<dyn Fn() -> A>,
    upstream: Box<dyn Fn() -> UpstreamList>,
    name: RefCell<Option<String>>,
}

impl<A> DerivedNode<A> {
    pub(crate) fn new(
        eval: impl Fn() -> A + 'static,
        upstream: impl Fn() -> UpstreamList + 'static,
    ) -> Self {
        Self {
            eval: Box::new(eval),
            upstream: Box::new(upstream),
            name: RefCell::new(None),
        }
    }

    pub(crate) fn value(&self) -> A {
        (self.eval)()
    }

    pub(crate) fn upstream_accumulators(&self) -> UpstreamList {
        (self.upstream)()
    }

    pub(crate) fn set_name(&self, name: &str) {
        *self.name.borrow_mut() = Some(name.to_string());
    }

    pub(crate) fn debug_label(&self) -> Option<String> {
        self.name.borrow().clone()
    }
}

// ── Delay ──────────────────────────────────────────────────────────

/// Lazy wrapper resolving its inner cell at most once, on first use.
pub(crate) struct DelayNode<A> {
    thunk: RefCell<Option<Box<dyn FnOnce() -> Cell<A>>>>,
    resolved: OnceCell<Cell<A>>,
}

impl<A: 'static> DelayNode<A> {
    pub(crate) fn new(thunk: impl FnOnce() -> Cell<A> + 'static) -> Self {
        Self {
            thunk: RefCell::new(Some(Box::new(thunk))),
            resolved: OnceCell::new(),
        }
    }

    /// Resolve the inner cell, running the thunk on first call.
    pub(crate) fn force(&self) -> Cell<A> {
        if let Some(cell) = self.resolved.get() {
            return cell.clone();
        }
        let thunk = self.thunk.borrow_mut().take().unwrap_or_else(|| {
            panic!(
                "{}: delay forced during its own resolution",
                invariant::RECURSIVE_DELAY,
            )
        });
        let cell = thunk();
        let _ = self.resolved.set(cell.clone());
        cell
    }
}
