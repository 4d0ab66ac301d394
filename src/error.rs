//! Typed errors for fsm-check.
//!
//! Load and format failures are errors. Policy violations found in a trace
//! are not: they are data, carried by [`Verdict`](crate::Verdict).

use crate::report::ExitStatus;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for fsm-check operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The invocation contract was violated.
    #[error("Usage error: {0}")]
    Usage(#[from] UsageError),

    /// The policy document could not be loaded.
    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),

    /// The trace source could not be read or decoded.
    #[error("Trace error: {0}")]
    Trace(#[from] TraceError),
}

impl Error {
    /// Every error belongs to the usage/environment status class.
    pub fn exit_status(&self) -> ExitStatus {
        ExitStatus::Environment
    }
}

/// Invalid combination of inputs, detected before any file is opened.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum UsageError {
    /// No policy path was supplied.
    #[error("a policy path is required")]
    MissingPolicy,

    /// Neither an asm nor a sideband trace was supplied.
    #[error("exactly one trace source is required (--asm or --sideband), got none")]
    NoTraceSource,

    /// Both an asm and a sideband trace were supplied.
    #[error("exactly one trace source is required (--asm or --sideband), got both")]
    ConflictingTraceSources,
}

/// Error while loading a policy document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PolicyError {
    /// Policy file not found.
    #[error("policy file not found: {0}")]
    NotFound(PathBuf),

    /// Policy file exists but could not be read.
    #[error("failed to read policy {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    /// Policy is not valid JSON.
    #[error("policy is not valid JSON: {0}")]
    Malformed(String),

    /// Policy root must be a JSON object.
    #[error("policy must be a JSON object, got: {found}")]
    NotAnObject { found: String },

    /// A known field has the wrong shape.
    #[error("invalid policy field: {0}")]
    InvalidField(String),

    /// An `ids` entry is neither an integer nor an integer string.
    #[error("state '{state}': ID {value} is not an integer or integer string")]
    InvalidId { state: String, value: String },

    /// An `ids` entry does not fit in an unsigned 32-bit sideband record.
    #[error("state '{state}': ID {value} does not fit in 32 bits")]
    IdOutOfRange { state: String, value: String },

    /// Two states map to the same numeric ID.
    #[error("states '{first}' and '{second}' share ID {id}")]
    DuplicateId { id: u32, first: String, second: String },
}

/// Error while reading, decoding or recording a trace.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TraceError {
    /// Trace source file not found.
    #[error("trace file not found: {0}")]
    NotFound(PathBuf),

    /// Trace source exists but could not be read.
    #[error("failed to read trace {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    /// Sideband stream length is not a whole number of 32-bit records.
    #[error("sideband length {len} is not a multiple of 4 bytes")]
    Truncated { len: usize },

    /// A state name has no entry in the policy's `ids` table.
    #[error("state '{0}' has no numeric ID in the policy")]
    UnmappedState(String),

    /// IO error while writing a sideband trace.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using fsm-check's Error.
pub type CheckResult<T> = std::result::Result<T, Error>;
