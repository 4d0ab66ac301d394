//! Sideband recorder.
//!
//! Writes the same stream the instrumented runtime produces: one
//! little-endian `u32` per tag, no framing. The output decodes unchanged
//! with [`read_sideband`](super::read_sideband).

use crate::error::{CheckResult, TraceError};
use crate::policy::Policy;
use std::io::Write;
use std::path::Path;

/// Records state IDs as a binary sideband trace.
///
/// ```no_run
/// use fsm_check::{Policy, SidebandWriter};
/// use std::path::Path;
///
/// let policy = Policy::load(Path::new("fsm_policy.json"))?;
/// let mut writer = SidebandWriter::create(Path::new("trace.bin"))?;
/// writer.emit_state(&policy, "BOOT")?;
/// writer.emit_state(&policy, "RUN")?;
/// writer.finish()?;
/// # Ok::<(), fsm_check::Error>(())
/// ```
pub struct SidebandWriter<W: Write = std::io::BufWriter<std::fs::File>> {
    writer: W,
    count: usize,
}

impl SidebandWriter {
    /// Create a new writer targeting the given file path.
    pub fn create(path: &Path) -> CheckResult<Self> {
        let file = std::fs::File::create(path).map_err(TraceError::Io)?;
        Ok(Self::new(std::io::BufWriter::new(file)))
    }
}

impl<W: Write> SidebandWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, count: 0 }
    }

    /// Record one raw state ID.
    pub fn emit_id(&mut self, id: u32) -> CheckResult<()> {
        self.writer
            .write_all(&id.to_le_bytes())
            .map_err(TraceError::Io)?;
        self.count += 1;
        Ok(())
    }

    /// Record a state by name, resolving it through the policy's `ids` table.
    pub fn emit_state(&mut self, policy: &Policy, state: &str) -> CheckResult<()> {
        let id = policy
            .id_of(state)
            .ok_or_else(|| TraceError::UnmappedState(state.to_string()))?;
        self.emit_id(id)
    }

    /// Flush buffered output and return the number of records written.
    pub fn finish(mut self) -> CheckResult<usize> {
        self.writer.flush().map_err(TraceError::Io)?;
        Ok(self.count)
    }

    /// Get the number of records written so far.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Recover the underlying writer without flushing.
    ///
    /// For in-memory sinks (`Vec<u8>`), this is how the recorded bytes are
    /// read back without going through a file.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
