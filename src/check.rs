//! End-to-end check: load the policy, extract one trace, validate it.

use crate::error::{CheckResult, UsageError};
use crate::extract::{read_sideband, read_text};
use crate::policy::Policy;
use crate::trace::Trace;
use crate::validator::{validate, Verdict};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Where the observed trace comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceSource {
    /// Text artifact carrying `TAG:<STATE>` markers.
    Asm(PathBuf),
    /// Binary sideband stream of little-endian `u32` state IDs.
    Sideband(PathBuf),
}

impl TraceSource {
    pub fn path(&self) -> &Path {
        match self {
            Self::Asm(path) | Self::Sideband(path) => path,
        }
    }

    /// Read and decode the trace. Sideband IDs resolve through `policy`.
    pub fn extract(&self, policy: &Policy) -> CheckResult<Trace> {
        let trace = match self {
            Self::Asm(path) => read_text(path)?,
            Self::Sideband(path) => read_sideband(path, policy)?,
        };
        Ok(trace)
    }
}

/// Inputs for one check.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct CheckConfig {
    /// Path to the JSON policy document.
    pub policy: PathBuf,

    /// The single trace source.
    pub source: TraceSource,
}

impl CheckConfig {
    pub fn builder() -> CheckConfigBuilder {
        CheckConfigBuilder::default()
    }
}

#[derive(Debug, Default)]
pub struct CheckConfigBuilder {
    policy: Option<PathBuf>,
    asm: Option<PathBuf>,
    sideband: Option<PathBuf>,
}

impl CheckConfigBuilder {
    pub fn policy(mut self, path: impl Into<PathBuf>) -> Self {
        self.policy = Some(path.into());
        self
    }

    pub fn asm(mut self, path: impl Into<PathBuf>) -> Self {
        self.asm = Some(path.into());
        self
    }

    pub fn sideband(mut self, path: impl Into<PathBuf>) -> Self {
        self.sideband = Some(path.into());
        self
    }

    /// Check the invocation contract. Never touches the filesystem.
    pub fn build(self) -> Result<CheckConfig, UsageError> {
        let source = match (self.asm, self.sideband) {
            (Some(asm), None) => TraceSource::Asm(asm),
            (None, Some(sideband)) => TraceSource::Sideband(sideband),
            (None, None) => return Err(UsageError::NoTraceSource),
            (Some(_), Some(_)) => return Err(UsageError::ConflictingTraceSources),
        };
        let policy = self.policy.ok_or(UsageError::MissingPolicy)?;
        Ok(CheckConfig { policy, source })
    }
}

/// A validated trace.
#[derive(Debug, Clone)]
#[must_use = "check outcome should be reported"]
pub struct CheckOutcome {
    pub trace: Trace,
    pub verdict: Verdict,
}

/// Run load → extract → validate for one configuration.
///
/// Errors cover only the inputs (missing files, malformed policy or
/// sideband). Policy violations are reported through the returned verdict.
pub fn check(config: &CheckConfig) -> CheckResult<CheckOutcome> {
    info!(
        policy = %config.policy.display(),
        source = %config.source.path().display(),
        "Checking FSM trace"
    );

    let policy = Policy::load(&config.policy)?;
    let trace = config.source.extract(&policy)?;
    debug!(tags = trace.len(), "Extracted trace");

    let verdict = validate(&trace, &policy);
    Ok(CheckOutcome { trace, verdict })
}
