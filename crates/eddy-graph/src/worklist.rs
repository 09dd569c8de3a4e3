//! Priority worklist with monoidal coalescing of pending work.
//!
//! A [`Worklist`] holds *loci* — work sites, ordered by a caller-chosen
//! total order — and, per locus, a pending batch of *todos*. Enqueueing a
//! locus that is already pending does not add a second entry: the incoming
//! batch is merged into the pending one through the todo monoid. Draining
//! pops the minimum locus, removes its batch, and hands both to the work
//! function.
//!
//! The batch is removed *before* the work function runs, so work may
//! re-enqueue the very locus it is processing. There is no tracking of
//! already-seen loci: that re-enqueueing is the mechanism by which cyclic
//! equation systems iterate until they converge.

use std::cell::RefCell;
use std::collections::BTreeMap;

/// A coalescing priority worklist over loci of type `L` and todo batches
/// of type `T`.
///
/// `T` forms a monoid: `empty_todos` is the identity and `combine` the
/// associative merge. The ordered map doubles as the priority set and the
/// pending-batch store, so re-enqueueing an already-present locus costs
/// one tree touch plus one combine.
///
/// All methods take `&self`; the internal state lives behind a `RefCell`
/// whose borrow is never held across a call to the work function.
pub struct Worklist<L, T> {
    pending: RefCell<BTreeMap<L, T>>,
    empty_todos: T,
    combine: Box<dyn Fn(T, T) -> T>,
    work: Box<dyn Fn(&L, T)>,
}

impl<L: Ord, T: Clone> Worklist<L, T> {
    /// Create a worklist from its work function and todo monoid.
    ///
    /// `combine` receives the incoming batch first and the pending batch
    /// second.
    pub fn new(
        work: impl Fn(&L, T) + 'static,
        empty_todos: T,
        combine: impl Fn(T, T) -> T + 'static,
    ) -> Self {
        Self {
            pending: RefCell::new(BTreeMap::new()),
            empty_todos,
            combine: Box::new(combine),
            work: Box::new(work),
        }
    }

    /// Merge `todos` into the pending batch for `locus`, inserting the
    /// locus if it was not pending.
    pub fn add_todos(&self, locus: L, todos: T) {
        let mut pending = self.pending.borrow_mut();
        let merged = match pending.remove(&locus) {
            Some(existing) => (self.combine)(todos, existing),
            None => (self.combine)(todos, self.empty_todos.clone()),
        };
        pending.insert(locus, merged);
    }

    /// Drain the worklist: repeatedly pop the minimum locus with its
    /// batch and run the work function, until nothing is pending.
    ///
    /// Work performed for one locus may enqueue others — or the same
    /// locus again; the loop runs to quiescence.
    pub fn work_until_empty(&self) {
        loop {
            let next = self.pending.borrow_mut().pop_first();
            match next {
                Some((locus, todos)) => (self.work)(&locus, todos),
                None => break,
            }
        }
    }

    /// Whether nothing is pending.
    pub fn is_idle(&self) -> bool {
        self.pending.borrow().is_empty()
    }
}
