//! Trace validation against a [`Policy`].
//!
//! Validation is a pure function of the trace and the policy. It never stops
//! at the first problem: a bad start state, every illegal transition and a
//! bad final state are all collected in one pass, so a single run shows
//! every independent defect. The only early exit is the empty trace, where
//! there is nothing else to check.

use crate::policy::Policy;
use crate::trace::Trace;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

/// One way in which a trace breaks its policy.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum Violation {
    /// The trace contains no tags at all.
    #[error("No tags were observed in the trace.")]
    EmptyTrace,

    /// The first tag is not the policy's start state.
    #[error("First tag '{observed}' does not match required start state '{required}'.")]
    BadStart { observed: String, required: String },

    /// An adjacent pair of tags is not an allowed transition.
    #[error("Illegal transition {from} -> {to}. Allowed next states: {allowed:?}.")]
    IllegalTransition {
        /// Index of `from` in the trace.
        index: usize,
        from: String,
        to: String,
        allowed: Vec<String>,
    },

    /// The last tag is not in the accept set.
    #[error("Final tag '{observed}' is not in accept set {accept:?}.")]
    BadFinal {
        observed: String,
        /// Accept states, sorted.
        accept: Vec<String>,
    },
}

/// Outcome of validating one trace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[must_use = "trace validation result should be checked"]
pub struct Verdict {
    violations: Vec<Violation>,
}

impl Verdict {
    /// A trace passes iff it has no violations.
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    /// Violations in the order they were found.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Rendered violation messages.
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }
}

/// Check `trace` against `policy`.
pub fn validate(trace: &Trace, policy: &Policy) -> Verdict {
    let (Some(first), Some(last)) = (trace.first(), trace.last()) else {
        return Verdict {
            violations: vec![Violation::EmptyTrace],
        };
    };

    let mut violations = Vec::new();

    if let Some(start) = policy.start() {
        if first != start {
            violations.push(Violation::BadStart {
                observed: first.to_string(),
                required: start.to_string(),
            });
        }
    }

    for (index, (from, to)) in trace.transitions().enumerate() {
        let allowed = policy.successors(from);
        if !allowed.iter().any(|s| s == to) {
            violations.push(Violation::IllegalTransition {
                index,
                from: from.to_string(),
                to: to.to_string(),
                allowed: allowed.to_vec(),
            });
        }
    }

    let accept = policy.accept();
    if !accept.is_empty() && !accept.contains(last) {
        violations.push(Violation::BadFinal {
            observed: last.to_string(),
            accept: accept.iter().cloned().collect(),
        });
    }

    if violations.is_empty() {
        info!(tags = trace.len(), "Trace conforms to policy");
    } else {
        debug!(
            tags = trace.len(),
            violations = violations.len(),
            "Trace violates policy"
        );
    }

    Verdict { violations }
}
