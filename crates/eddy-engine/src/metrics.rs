//! Cumulative solve counters for a context.
//!
//! [`SolveMetrics`] makes the solver's work observable without a debugger:
//! in particular, an idempotent second `get` leaves every counter
//! untouched, which is how the no-rework guarantee is tested.

/// Cumulative counters collected by one solver context.
///
/// Read a snapshot with [`Context::metrics`](crate::Context::metrics);
/// counters never reset for the lifetime of the context.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SolveMetrics {
    /// Depth-first discovery launches (one per `get` on an undiscovered
    /// accumulator, at most).
    pub traversals: u64,
    /// Accumulators stamped with a discovery time.
    pub discovered: u64,
    /// Change batches applied to accumulators by the worklist.
    pub updates: u64,
    /// Updates whose recomputed value differed from the stored one.
    pub value_changes: u64,
    /// Observer callbacks fired by value changes.
    pub notifications: u64,
}
