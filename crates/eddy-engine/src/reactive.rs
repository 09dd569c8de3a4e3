//! The observable state container behind every accumulator.
//!
//! A [`Reactive`] holds a value, a recompute function, and a list of
//! observers. [`update`](Reactive::update) produces a candidate value from
//! the current one plus a *hint* (for accumulators, the set of changed
//! inputs) and notifies observers only when the candidate differs from the
//! stored value. That suppression is the engine's sole termination
//! mechanism: a combiner that reaches its fixpoint stops producing
//! notifications, the worklist stops receiving todos, and the solve
//! quiesces.

use std::cell::RefCell;
use std::rc::Rc;

/// An observable value of type `A` recomputed from change hints of type `H`.
///
/// Observers run in registration order, exactly once per value change.
/// The stored value is only ever written by [`update`](Self::update).
pub struct Reactive<A, H> {
    value: RefCell<A>,
    recompute: Box<dyn Fn(&A, &H) -> A>,
    observers: RefCell<Vec<Rc<dyn Fn()>>>,
}

impl<A, H> Reactive<A, H> {
    /// Create a reactive holding `initial`, recomputing with `recompute`.
    ///
    /// `recompute` must be deterministic. It receives the current value
    /// and the hint; it may read other parts of the cell graph (including,
    /// through a delay, the very cell it backs) but must not mutate
    /// anything.
    pub fn new(initial: A, recompute: impl Fn(&A, &H) -> A + 'static) -> Self {
        Self {
            value: RefCell::new(initial),
            recompute: Box::new(recompute),
            observers: RefCell::new(Vec::new()),
        }
    }

    /// Append an observer. Observers fire in registration order.
    pub fn register_on_update(&self, observer: Rc<dyn Fn()>) {
        self.observers.borrow_mut().push(observer);
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.observers.borrow().len()
    }
}

impl<A: Clone, H> Reactive<A, H> {
    /// A clone of the stored value.
    pub fn current_value(&self) -> A {
        self.value.borrow().clone()
    }
}

impl<A: Clone + PartialEq, H> Reactive<A, H> {
    /// Recompute from `hint`; on change, store the new value and notify
    /// every observer once, in registration order. Returns whether the
    /// value changed.
    ///
    /// The value borrow is released before `recompute` runs: a
    /// self-referential accumulator reads its own value back through the
    /// graph during recomputation.
    pub fn update(&self, hint: &H) -> bool {
        let current = self.value.borrow().clone();
        let next = (self.recompute)(&current, hint);
        if next == current {
            return false;
        }
        *self.value.borrow_mut() = next;

        // Snapshot the observer list so notification survives an observer
        // registering further observers on this same reactive.
        let observers: Vec<Rc<dyn Fn()>> = self.observers.borrow().clone();
        for observer in &observers {
            observer();
        }
        true
    }
}
