//! Human and machine-readable rendering of a check, plus exit status mapping.

use crate::trace::Trace;
use crate::validator::{Verdict, Violation};
use serde::Serialize;
use std::io::{self, Write};

/// Process exit status classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// The trace conforms to the policy.
    Success,
    /// The trace has at least one violation.
    Failure,
    /// Usage error, missing file, malformed policy or sideband.
    Environment,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
            Self::Environment => 2,
        }
    }
}

impl From<ExitStatus> for std::process::ExitCode {
    fn from(status: ExitStatus) -> Self {
        std::process::ExitCode::from(status.code())
    }
}

/// A validated trace ready to be rendered.
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    trace: &'a Trace,
    verdict: &'a Verdict,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    passed: bool,
    violations: Vec<JsonViolation<'a>>,
    trace: &'a Trace,
}

#[derive(Serialize)]
struct JsonViolation<'a> {
    message: String,
    #[serde(flatten)]
    detail: &'a Violation,
}

impl<'a> Report<'a> {
    pub fn new(trace: &'a Trace, verdict: &'a Verdict) -> Self {
        Self { trace, verdict }
    }

    pub fn exit_status(&self) -> ExitStatus {
        if self.verdict.passed() {
            ExitStatus::Success
        } else {
            ExitStatus::Failure
        }
    }

    /// Write the text report: a pass goes to `out`, a failure to `err`.
    pub fn write_text(&self, out: &mut impl Write, err: &mut impl Write) -> io::Result<()> {
        if self.verdict.passed() {
            writeln!(out, "FSM CHECK PASS")?;
            writeln!(out, "Tag trace: {}", self.trace)?;
            return Ok(());
        }

        writeln!(err, "FSM CHECK FAIL")?;
        for violation in self.verdict.violations() {
            writeln!(err, "  - {violation}")?;
        }
        writeln!(err, "Tag trace: {}", self.trace)?;
        Ok(())
    }

    /// Write the report as one pretty-printed JSON object.
    pub fn write_json(&self, out: &mut impl Write) -> io::Result<()> {
        let report = JsonReport {
            passed: self.verdict.passed(),
            violations: self
                .verdict
                .violations()
                .iter()
                .map(|detail| JsonViolation {
                    message: detail.to_string(),
                    detail,
                })
                .collect(),
            trace: self.trace,
        };
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)
    }
}
