//! fsm-check: finite-state-machine trace validation for tagged generated code.
//!
//! Generated code announces the states it passes through, either as
//! `TAG:<STATE>` markers in its text (usually assembly comments) or as
//! 32-bit state IDs recorded to a binary sideband stream. This crate checks
//! such a trace against an independently declared [`Policy`]:
//!
//! 1. The first tag must be the policy's start state (if one is declared).
//! 2. Every adjacent pair of tags must be an allowed transition.
//! 3. The last tag must be in the accept set (if one is declared).
//!
//! All violations are collected in one pass; see [`validate`].
//!
//! # Quick Start
//!
//! ```
//! use fsm_check::{extract_text, validate, Policy};
//!
//! let policy = Policy::from_json_str(r#"{
//!     "start": "INIT",
//!     "accept": ["DONE"],
//!     "transitions": {"INIT": ["RUN"], "RUN": ["DONE"]}
//! }"#)?;
//!
//! let trace = extract_text("# TAG:INIT\n# TAG:RUN\n# TAG:DONE\n");
//! let verdict = validate(&trace, &policy);
//!
//! assert!(verdict.passed());
//! assert_eq!(trace.to_string(), "INIT -> RUN -> DONE");
//! # Ok::<(), fsm_check::PolicyError>(())
//! ```
//!
//! File-based checks go through [`CheckConfig`] and [`check`], which is what
//! the `fsm-check` binary runs.

pub mod check;
pub mod error;
pub mod extract;
pub mod policy;
pub mod report;
pub mod trace;
pub mod validator;

pub use check::{check, CheckConfig, CheckConfigBuilder, CheckOutcome, TraceSource};
pub use error::{CheckResult, Error, PolicyError, TraceError, UsageError};
pub use extract::{
    decode_ids, decode_sideband, extract_text, read_sideband, read_text, unknown_tag,
    SidebandWriter,
};
pub use policy::{Policy, PolicyBuilder};
pub use report::{ExitStatus, Report};
pub use trace::Trace;
pub use validator::{validate, Verdict, Violation};
