//! Derived combinators over [`Cell`]s.
//!
//! Everything here is library-level: thin compositions of `map`/`zip`
//! plus two direct n-ary formal combinators (`sequence`, and through it
//! `traverse`) that avoid quadratic re-pairing over long input lists.
//! Function-valued cells use `Rc<dyn Fn…>` so the function can be cloned
//! out of the cell on every read.

use std::rc::Rc;

use crate::cell::Cell;
use crate::node::{merge_upstream, DerivedNode, UpstreamList};

/// Combine two cells with a binary function.
pub fn map2<A, B, C>(a: &Cell<A>, b: &Cell<B>, f: impl Fn(A, B) -> C + 'static) -> Cell<C>
where
    A: Clone + 'static,
    B: Clone + 'static,
    C: 'static,
{
    a.zip(b).map(move |(x, y)| f(x, y))
}

/// Apply a function-valued cell to an argument cell.
pub fn ap<A, B>(func: &Cell<Rc<dyn Fn(A) -> B>>, arg: &Cell<A>) -> Cell<B>
where
    A: Clone + 'static,
    B: 'static,
{
    map2(func, arg, |f, a| f(a))
}

/// Apply a binary function-valued cell to two argument cells.
pub fn ap2<A, B, C>(func: &Cell<Rc<dyn Fn(A, B) -> C>>, a: &Cell<A>, b: &Cell<B>) -> Cell<C>
where
    A: Clone + 'static,
    B: Clone + 'static,
    C: 'static,
{
    let paired = a.zip(b);
    map2(func, &paired, |f, (x, y)| f(x, y))
}

/// Turn a list of cells into a cell of the list of their values.
///
/// `sequence(cs).get()` equals collecting `c.get()` for each `c`, in
/// order; an empty list yields an always-empty vector.
pub fn sequence<A: Clone + 'static>(cells: impl IntoIterator<Item = Cell<A>>) -> Cell<Vec<A>> {
    let cells: Vec<Cell<A>> = cells.into_iter().collect();
    let eval_cells = cells.clone();
    let upstream_cells = cells;
    Cell::from_derived(DerivedNode::new(
        move || eval_cells.iter().map(|cell| cell.current_value()).collect(),
        move || {
            let mut merged = UpstreamList::new();
            for cell in &upstream_cells {
                merged = merge_upstream(merged, cell.upstream_accumulators());
            }
            merged
        },
    ))
}

/// Map each item to a cell, then [`sequence`] the results.
pub fn traverse<I, A, B>(items: I, f: impl Fn(A) -> Cell<B>) -> Cell<Vec<B>>
where
    I: IntoIterator<Item = A>,
    B: Clone + 'static,
{
    sequence(items.into_iter().map(f).collect::<Vec<_>>())
}
