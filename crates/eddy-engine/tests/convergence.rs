//! Integration tests: cyclic equation networks converging to fixpoints.
//!
//! Exercises the full two-phase solve — discovery, seeding, and the
//! worklist drain — on self-referential and mutually recursive
//! accumulators, and pins down the no-rework guarantees through
//! [`SolveMetrics`].

use std::cell::OnceCell;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use eddy_engine::{map2, Cell, Context, ContextConfig, SolveMetrics, TraceEvent};

// ── Self-reference ───────────────────────────────────────────────────

#[test]
fn heron_converges_on_sqrt_of_1764() {
    let ctx = Context::new();
    let a = ctx.recursive(|a| {
        ctx.accumulator_single(a, 1.0_f64, |x, y| (x + 1764.0 / y) / 2.0)
    });

    assert_eq!(a.get(), 42.0);
    assert_eq!(a.get(), 42.0);
}

#[test]
fn self_loop_counts_up_and_then_quiesces() {
    let ctx = Context::new();
    let a = ctx.recursive(|a| {
        ctx.accumulator_single(a, 0u32, |x, _| (x + 1).min(3))
    });
    // b processes one batch per observed change of a — but batches
    // coalesce, so however many times a changes before b runs, b runs
    // exactly once.
    let b = ctx.accumulator_single(a.clone(), 0u32, |n, _| n + 1);

    assert_eq!(b.get(), 1);
    assert_eq!(a.get(), 3);

    let m = ctx.metrics();
    assert_eq!(m.traversals, 1);
    assert_eq!(m.discovered, 2);
    // a: one seed batch plus three self-notified rounds; b: one batch.
    assert_eq!(m.updates, 5);
    // a changed three times (1, 2, 3), b once.
    assert_eq!(m.value_changes, 4);
    // a has two observers (itself and b); each of a's three changes
    // notified both. b changed once with nobody listening.
    assert_eq!(m.notifications, 6);
}

// ── Simple accumulators ──────────────────────────────────────────────

#[test]
fn zero_input_accumulator_keeps_its_initial_set() {
    let ctx = Context::new();
    let inputs: Vec<Cell<BTreeSet<i32>>> = Vec::new();
    let acc = ctx.accumulator(
        inputs,
        BTreeSet::from([1, 2, 3]),
        |state: &BTreeSet<i32>, changed: &[BTreeSet<i32>]| {
            changed.iter().fold(state.clone(), |acc, s| &acc | s)
        },
    );

    assert_eq!(acc.get(), BTreeSet::from([1, 2, 3]));
}

#[test]
fn constants_reach_an_accumulator_through_map2() {
    let ctx = Context::new();
    let both = map2(&ctx.pure(true), &ctx.pure(true), |a, b| a && b);
    let c = ctx.accumulator_single(both, false, |state, &input| *state || input);

    assert!(c.get());
}

// ── Mutual recursion ─────────────────────────────────────────────────

/// Wire `n1 ⇄ n2` where each side unions in the other's elements.
/// Returns the two accumulators.
fn two_node_closure(ctx: &Context) -> (Cell<BTreeSet<i32>>, Cell<BTreeSet<i32>>) {
    let n1_slot: Rc<OnceCell<Cell<BTreeSet<i32>>>> = Rc::new(OnceCell::new());
    let n1_forward = ctx.delay({
        let slot = n1_slot.clone();
        move || slot.get().expect("n1 wired before solving").clone()
    });

    let n2 = ctx.accumulator_single(n1_forward, BTreeSet::from([2]), |seen, got| seen | got);
    let n1 = ctx.accumulator_single(n2.clone(), BTreeSet::from([1]), |seen, got| seen | got);
    n1_slot.set(n1.clone()).expect("slot set once");
    (n1, n2)
}

#[test]
fn mutual_cycle_reaches_transitive_closure() {
    let ctx = Context::new();
    let (n1, n2) = two_node_closure(&ctx);

    assert_eq!(n1.get(), BTreeSet::from([1, 2]));
    assert_eq!(n2.get(), BTreeSet::from([1, 2]));
}

#[test]
fn solved_accumulators_satisfy_their_own_equations() {
    let ctx = Context::new();
    let (n1, n2) = two_node_closure(&ctx);
    n1.get();

    // Re-applying each combiner to the solved values must reproduce them.
    let combine = |state: &BTreeSet<i32>, input: &BTreeSet<i32>| state | input;
    assert_eq!(combine(&n1.get(), &n2.get()), n1.get());
    assert_eq!(combine(&n2.get(), &n1.get()), n2.get());
}

// ── Idempotence and sharing ──────────────────────────────────────────

#[test]
fn second_get_performs_no_work() {
    let ctx = Context::new();
    let (n1, n2) = two_node_closure(&ctx);

    let first = n1.get();
    let settled = ctx.metrics();

    assert_eq!(n1.get(), first);
    assert_eq!(n2.get(), BTreeSet::from([1, 2]));
    assert_eq!(ctx.metrics(), settled);
}

#[test]
fn later_roots_share_the_discovery_timeline() {
    let ctx = Context::new();
    // Two disjoint chains in one context, solved one after the other.
    let left = ctx.accumulator_single(ctx.pure(10u32), 0u32, |s, v| s + v);
    let right = ctx.accumulator_single(left.clone(), 0u32, |s, v| s + v);
    let lone = ctx.accumulator_single(ctx.pure(5u32), 0u32, |s, v| s + v);

    assert_eq!(right.get(), 10);
    assert_eq!(ctx.metrics().traversals, 1);

    // `lone` was not reachable from `right`; its own get launches a
    // second traversal against the same clock.
    assert_eq!(lone.get(), 5);
    let m = ctx.metrics();
    assert_eq!(m.traversals, 2);
    assert_eq!(m.discovered, 3);
}

#[test]
fn get_order_does_not_change_values() {
    let solve_forward = {
        let ctx = Context::new();
        let (n1, n2) = two_node_closure(&ctx);
        (n1.get(), n2.get())
    };
    let solve_backward = {
        let ctx = Context::new();
        let (n1, n2) = two_node_closure(&ctx);
        (n2.get(), n1.get())
    };

    assert_eq!(solve_forward.0, solve_backward.1);
    assert_eq!(solve_forward.1, solve_backward.0);
}

// ── Derived roots ────────────────────────────────────────────────────

#[test]
fn derived_get_forces_every_upstream() {
    let ctx = Context::new();
    let (n1, n2) = two_node_closure(&ctx);
    let sizes = n1.zip(&n2).map(|(a, b)| (a.len(), b.len()));

    assert_eq!(sizes.get(), (2, 2));
    // Both accumulators were solved by the single derived get.
    assert_eq!(ctx.metrics().discovered, 2);
}

// ── Tracing ──────────────────────────────────────────────────────────

#[test]
fn trace_sink_sees_the_solve_unfold() {
    let events: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    let ctx = Context::with_config(ContextConfig {
        trace: Some(Rc::new(move |event: &TraceEvent| {
            sink.borrow_mut().push(event.to_string());
        })),
    });

    let a = ctx
        .recursive(|a| ctx.accumulator_single(a, 0u32, |x, _| (x + 1).min(2)))
        .named("a");
    assert_eq!(a.get(), 2);

    assert_eq!(
        *events.borrow(),
        vec![
            "discover a @1",
            "finish a @2",
            "update a (changed)",
            "update a (changed)",
            "update a (unchanged)",
        ],
    );
}

#[test]
fn metrics_snapshot_is_plain_data() {
    let ctx = Context::new();
    let snapshot: SolveMetrics = ctx.metrics();
    assert_eq!(snapshot, SolveMetrics::default());
}
