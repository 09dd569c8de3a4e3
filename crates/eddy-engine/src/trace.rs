//! Diagnostic trace events emitted during a solve.
//!
//! A context configured with a [`TraceSink`] receives one event per
//! accumulator discovery, finish, and update. Tracing is purely
//! observational: enabling it changes no value and no ordering. Cells can
//! carry a human-readable label via [`Cell::named`](crate::Cell::named);
//! unlabeled cells report `None`.

use std::fmt;
use std::rc::Rc;

use eddy_graph::Timestamp;

/// Consumer for [`TraceEvent`]s, installed through
/// [`ContextConfig`](crate::ContextConfig).
pub type TraceSink = Rc<dyn Fn(&TraceEvent)>;

/// A single diagnostic event from the solver.
#[derive(Clone, Debug)]
pub enum TraceEvent {
    /// Depth-first search entered an accumulator.
    Discovered {
        /// The cell's diagnostic label, if one was attached.
        name: Option<String>,
        /// The discovery timestamp.
        time: Timestamp,
    },
    /// Depth-first search left an accumulator's subtree.
    Finished {
        /// The cell's diagnostic label, if one was attached.
        name: Option<String>,
        /// The finish timestamp.
        time: Timestamp,
    },
    /// The worklist applied a change batch to an accumulator.
    Updated {
        /// The cell's diagnostic label, if one was attached.
        name: Option<String>,
        /// Whether the recomputed value differed from the stored one.
        changed: bool,
    },
}

impl TraceEvent {
    fn label(name: &Option<String>) -> &str {
        name.as_deref().unwrap_or("<unnamed>")
    }
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discovered { name, time } => {
                write!(f, "discover {} @{time}", Self::label(name))
            }
            Self::Finished { name, time } => {
                write!(f, "finish {} @{time}", Self::label(name))
            }
            Self::Updated { name, changed } => {
                let verdict = if *changed { "changed" } else { "unchanged" };
                write!(f, "update {} ({verdict})", Self::label(name))
            }
        }
    }
}
