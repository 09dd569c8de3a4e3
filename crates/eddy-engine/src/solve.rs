//! The two-phase solve: depth-first discovery, then worklist drain.
//!
//! Discovery walks *against* information flow (child = upstream
//! producer), so producers deep in the graph get low finish times and
//! consumers get high ones. The worklist pops lowest-finish-time first,
//! which lets each consumer tend to see settled inputs before it fires —
//! where acyclicity allows — and merely groups strongly connected
//! components where it does not.

use std::cmp::Ordering;
use std::rc::Rc;

use eddy_core::InputSet;
use eddy_graph::{depth_first, finish_time_ordering, DfsNode};

use crate::node::AccRef;
use crate::trace::TraceEvent;

// ── Locus ──────────────────────────────────────────────────────────

/// A worklist work site: an accumulator, ordered by ascending finish time.
///
/// Loci are only constructed for finished nodes (seeding happens in
/// `on_finish`, notification happens during the drain, after DFS
/// returned), so the ordering contract of
/// [`finish_time_ordering`] always holds.
pub(crate) struct Locus(AccRef);

impl Locus {
    pub(crate) fn new(node: AccRef) -> Self {
        Self(node)
    }

    pub(crate) fn node(&self) -> &AccRef {
        &self.0
    }
}

impl Ord for Locus {
    fn cmp(&self, other: &Self) -> Ordering {
        finish_time_ordering(&self.0, &other.0)
    }
}

impl PartialOrd for Locus {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Locus {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Locus {}

// ── Solve ──────────────────────────────────────────────────────────

/// Discover the subgraph reachable from `root` and drive it to
/// quiescence.
///
/// The caller guarantees `root` is undiscovered. Per discovered node:
/// register, on each upstream accumulator, an observer that enqueues the
/// node with exactly the inputs routed through that upstream. Per
/// finished node with a non-empty input list: seed the worklist with the
/// full input set, so every accumulator processes each input at least
/// once. Then drain.
pub(crate) fn discover_and_solve(root: &AccRef) {
    let state = root.0.state().clone();
    state.metrics.borrow_mut().traversals += 1;

    let discovery_state = state.clone();
    let mut on_discovery = |node: &AccRef| {
        discovery_state.metrics.borrow_mut().discovered += 1;
        if let Some(time) = node.discovery_time() {
            discovery_state.emit(|| TraceEvent::Discovered {
                name: node.0.label(),
                time,
            });
        }

        for (upstream, routed) in node.0.links() {
            let enqueue_state = discovery_state.clone();
            let target = node.clone();
            upstream.0.register_on_update(Rc::new(move || {
                enqueue_state.metrics.borrow_mut().notifications += 1;
                enqueue_state
                    .worklist
                    .add_todos(Locus::new(target.clone()), routed.clone());
            }));
        }
    };

    let finish_state = state.clone();
    let mut on_finish = |node: &AccRef| {
        if let Some(time) = node.finish_time() {
            finish_state.emit(|| TraceEvent::Finished {
                name: node.0.label(),
                time,
            });
        }

        let input_count = node.0.input_count();
        if input_count > 0 {
            finish_state
                .worklist
                .add_todos(Locus::new(node.clone()), InputSet::full(input_count));
        }
    };

    depth_first(root, &mut on_discovery, &mut on_finish, &state.time);
    state.worklist.work_until_empty();
}
