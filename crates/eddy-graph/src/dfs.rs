//! Depth-first search with discovery and finish timestamps.
//!
//! [`depth_first`] is the discovery half of the solver's two-phase `get`:
//! it walks the reversed dependency graph (child = upstream producer) and
//! stamps every reachable node with discovery and finish times drawn from
//! a caller-supplied [`TimeSource`]. Finish times approximate a reverse
//! topological order, which is exactly the order the worklist wants to
//! consume loci in.
//!
//! The time source is an argument rather than a local so that several
//! launches — one per `get` root — share one monotonic timeline. Times
//! are then globally unique across launches and [`finish_time_ordering`]
//! stays coherent when loci from different roots meet in one worklist.

use std::cell::Cell;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use eddy_core::invariant;

// ── Timestamps ─────────────────────────────────────────────────────

/// A discovery or finish time assigned during depth-first traversal.
///
/// Timestamps start at 1; "not yet assigned" is `Option::None`, not a
/// sentinel value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp(pub u64);

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Shared monotonic clock for traversal timestamps.
///
/// Cloning a `TimeSource` shares the underlying counter: every tick,
/// through any clone, advances the same timeline. One source per solver
/// context, passed to every [`depth_first`] launch.
#[derive(Clone, Debug, Default)]
pub struct TimeSource {
    counter: Rc<Cell<u64>>,
}

impl TimeSource {
    /// Create a fresh time source starting at zero.
    ///
    /// The first [`tick`](Self::tick) returns `Timestamp(1)`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock and return the new timestamp.
    pub fn tick(&self) -> Timestamp {
        let next = self.counter.get() + 1;
        self.counter.set(next);
        Timestamp(next)
    }

    /// The most recently issued timestamp value, or 0 if none was issued.
    pub fn last(&self) -> u64 {
        self.counter.get()
    }
}

// ── Node capability ────────────────────────────────────────────────

/// Capability set a node must expose to participate in depth-first
/// traversal.
///
/// Implementors are expected to be cheap handles (`Rc`-backed or similar):
/// traversal clones them freely and `child_nodes` returns handles by
/// value. Time setters use interior mutability; [`depth_first`] is their
/// only caller.
pub trait DfsNode: Clone {
    /// Discovery timestamp, if this node has been discovered.
    fn discovery_time(&self) -> Option<Timestamp>;

    /// Stamp the discovery time. Called exactly once per node.
    fn set_discovery_time(&self, time: Timestamp);

    /// Finish timestamp, if traversal has left this node's subtree.
    fn finish_time(&self) -> Option<Timestamp>;

    /// Stamp the finish time. Called exactly once per node.
    fn set_finish_time(&self, time: Timestamp);

    /// Nodes reachable one hop away, in a stable order.
    ///
    /// Order matters: it determines the traversal, and through it every
    /// finish time.
    fn child_nodes(&self) -> Vec<Self>;

    /// Whether this node has a discovery time.
    fn is_discovered(&self) -> bool {
        self.discovery_time().is_some()
    }

    /// Whether this node has a finish time.
    fn is_finished(&self) -> bool {
        self.finish_time().is_some()
    }
}

// ── Traversal ──────────────────────────────────────────────────────

/// Recursive depth-first traversal from `start`.
///
/// Ticks the clock and stamps discovery, invokes `on_discovery`, recurses
/// into each not-yet-discovered child in `child_nodes` order, then ticks,
/// stamps finish, and invokes `on_finish`. Children discovered earlier —
/// by this launch or a previous one sharing the same `time` — are skipped
/// silently.
///
/// The caller must not launch on a discovered node; `get` checks before
/// launching, and the precondition is debug-asserted here.
pub fn depth_first<N, D, F>(start: &N, on_discovery: &mut D, on_finish: &mut F, time: &TimeSource)
where
    N: DfsNode,
    D: FnMut(&N),
    F: FnMut(&N),
{
    debug_assert!(
        !start.is_discovered(),
        "{}: depth_first launched on a discovered node",
        invariant::REDISCOVERED_NODE,
    );

    start.set_discovery_time(time.tick());
    on_discovery(start);

    for child in start.child_nodes() {
        if !child.is_discovered() {
            depth_first(&child, on_discovery, on_finish, time);
        }
    }

    start.set_finish_time(time.tick());
    on_finish(start);
}

/// Total order on finished nodes by ascending finish time.
///
/// Ties cannot occur when both nodes were stamped by the same
/// [`TimeSource`]. Comparing a node that has no finish time is a
/// usage-contract violation and panics with a stable identifier.
pub fn finish_time_ordering<N: DfsNode>(a: &N, b: &N) -> Ordering {
    let fa = a
        .finish_time()
        .unwrap_or_else(|| panic!("{}: left node has no finish time", invariant::UNFINISHED_ORDERING));
    let fb = b
        .finish_time()
        .unwrap_or_else(|| panic!("{}: right node has no finish time", invariant::UNFINISHED_ORDERING));
    fa.cmp(&fb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    // ── Test graph ─────────────────────────────────────────────

    #[derive(Clone)]
    struct TestNode(Rc<TestNodeInner>);

    struct TestNodeInner {
        label: char,
        discovery: Cell<Option<Timestamp>>,
        finish: Cell<Option<Timestamp>>,
        children: RefCell<Vec<TestNode>>,
    }

    impl TestNode {
        fn new(label: char) -> Self {
            Self(Rc::new(TestNodeInner {
                label,
                discovery: Cell::new(None),
                finish: Cell::new(None),
                children: RefCell::new(Vec::new()),
            }))
        }

        fn set_children(&self, children: &[&TestNode]) {
            *self.0.children.borrow_mut() = children.iter().map(|&c| c.clone()).collect();
        }
    }

    impl DfsNode for TestNode {
        fn discovery_time(&self) -> Option<Timestamp> {
            self.0.discovery.get()
        }
        fn set_discovery_time(&self, time: Timestamp) {
            self.0.discovery.set(Some(time));
        }
        fn finish_time(&self) -> Option<Timestamp> {
            self.0.finish.get()
        }
        fn set_finish_time(&self, time: Timestamp) {
            self.0.finish.set(Some(time));
        }
        fn child_nodes(&self) -> Vec<Self> {
            self.0.children.borrow().clone()
        }
    }

    fn record_traversal(roots: &[&TestNode], time: &TimeSource) -> Vec<String> {
        let events = Rc::new(RefCell::new(Vec::new()));
        for root in roots {
            let discovery_log = events.clone();
            let finish_log = events.clone();
            depth_first(
                *root,
                &mut |n: &TestNode| {
                    discovery_log.borrow_mut().push(format!(
                        "discover {} @{}",
                        n.0.label,
                        n.discovery_time().unwrap()
                    ));
                },
                &mut |n: &TestNode| {
                    finish_log.borrow_mut().push(format!(
                        "finish {} [{},{}]",
                        n.0.label,
                        n.discovery_time().unwrap(),
                        n.finish_time().unwrap()
                    ));
                },
                time,
            );
        }
        Rc::try_unwrap(events).unwrap().into_inner()
    }

    // ── Timeline across two roots ──────────────────────────────

    #[test]
    fn two_root_timeline() {
        // u→{v,x}  v→{y}  w→{y,z}  x→{v}  y→{x}  z→{z}
        let u = TestNode::new('u');
        let v = TestNode::new('v');
        let w = TestNode::new('w');
        let x = TestNode::new('x');
        let y = TestNode::new('y');
        let z = TestNode::new('z');
        u.set_children(&[&v, &x]);
        v.set_children(&[&y]);
        w.set_children(&[&y, &z]);
        x.set_children(&[&v]);
        y.set_children(&[&x]);
        z.set_children(&[&z]);

        let time = TimeSource::new();
        let events = record_traversal(&[&u, &w], &time);

        assert_eq!(
            events,
            vec![
                "discover u @1",
                "discover v @2",
                "discover y @3",
                "discover x @4",
                "finish x [4,5]",
                "finish y [3,6]",
                "finish v [2,7]",
                "finish u [1,8]",
                "discover w @9",
                "discover z @10",
                "finish z [10,11]",
                "finish w [9,12]",
            ],
        );
        assert_eq!(time.last(), 12);
    }

    #[test]
    fn discovery_precedes_finish() {
        let a = TestNode::new('a');
        let b = TestNode::new('b');
        a.set_children(&[&b]);

        let time = TimeSource::new();
        depth_first(&a, &mut |_: &TestNode| {}, &mut |_: &TestNode| {}, &time);

        for node in [&a, &b] {
            let d = node.discovery_time().unwrap();
            let f = node.finish_time().unwrap();
            assert!(d < f, "{}: discovery {} not before finish {}", node.0.label, d, f);
        }
    }

    #[test]
    fn self_loop_is_skipped() {
        let a = TestNode::new('a');
        a.set_children(&[&a]);

        let time = TimeSource::new();
        let events = record_traversal(&[&a], &time);
        assert_eq!(events, vec!["discover a @1", "finish a [1,2]"]);
    }

    // ── Shared clock ───────────────────────────────────────────

    #[test]
    fn cloned_time_source_shares_the_counter() {
        let time = TimeSource::new();
        let alias = time.clone();
        assert_eq!(time.tick(), Timestamp(1));
        assert_eq!(alias.tick(), Timestamp(2));
        assert_eq!(time.last(), 2);
    }

    // ── Ordering ───────────────────────────────────────────────

    #[test]
    fn finish_time_ordering_is_ascending() {
        let a = TestNode::new('a');
        let b = TestNode::new('b');
        a.set_children(&[&b]);

        let time = TimeSource::new();
        depth_first(&a, &mut |_: &TestNode| {}, &mut |_: &TestNode| {}, &time);

        // b finishes inside a's subtree, so it orders first.
        assert_eq!(finish_time_ordering(&b, &a), std::cmp::Ordering::Less);
        assert_eq!(finish_time_ordering(&a, &b), std::cmp::Ordering::Greater);
        assert_eq!(finish_time_ordering(&a, &a), std::cmp::Ordering::Equal);
    }

    #[test]
    #[should_panic(expected = "EDDY_INVARIANT_UNFINISHED_ORDERING")]
    fn comparing_unfinished_nodes_panics() {
        let a = TestNode::new('a');
        let b = TestNode::new('b');
        let _ = finish_time_ordering(&a, &b);
    }
}
