//! Binary sideband decoding.
//!
//! The stream is header-less: a tightly packed run of unsigned 32-bit
//! little-endian state IDs, one per observed tag.

use crate::error::TraceError;
use crate::policy::Policy;
use crate::trace::Trace;
use std::path::Path;
use tracing::{debug, warn};

/// Size in bytes of one sideband record.
pub const RECORD_SIZE: usize = 4;

/// Placeholder tag for an ID missing from the policy's `ids` table.
///
/// Distinct IDs give distinct placeholders. The parentheses keep them from
/// matching any tag extracted from text, but a policy may still declare a
/// state with this exact name, in which case it validates like any other.
pub fn unknown_tag(id: u32) -> String {
    format!("UNKNOWN({id})")
}

/// Split a sideband stream into raw state IDs.
pub fn decode_ids(bytes: &[u8]) -> Result<Vec<u32>, TraceError> {
    if bytes.len() % RECORD_SIZE != 0 {
        return Err(TraceError::Truncated { len: bytes.len() });
    }

    Ok(bytes
        .chunks_exact(RECORD_SIZE)
        .map(|record| u32::from_le_bytes([record[0], record[1], record[2], record[3]]))
        .collect())
}

/// Decode a sideband stream into a trace, resolving IDs through `policy`.
///
/// Unknown IDs do not abort decoding; they become [`unknown_tag`]
/// placeholders, which the validator then reports as illegal unless the
/// policy happens to declare that name.
pub fn decode_sideband(bytes: &[u8], policy: &Policy) -> Result<Trace, TraceError> {
    let ids = decode_ids(bytes)?;

    let mut trace = Trace::new();
    let mut unknown = 0usize;
    for id in ids {
        match policy.state_for_id(id) {
            Some(state) => trace.push(state),
            None => {
                unknown += 1;
                trace.push(unknown_tag(id));
            }
        }
    }

    if unknown > 0 {
        warn!(unknown, "Sideband contains IDs missing from the policy");
    }
    Ok(trace)
}

/// Read a sideband file and decode it against `policy`.
pub fn read_sideband(path: &Path, policy: &Policy) -> Result<Trace, TraceError> {
    if !path.is_file() {
        return Err(TraceError::NotFound(path.to_path_buf()));
    }

    let bytes = std::fs::read(path).map_err(|e| TraceError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    if !policy.has_ids() {
        warn!("Policy has no `ids` table; every sideband record will be unknown");
    }

    let trace = decode_sideband(&bytes, policy)?;
    debug!(
        path = %path.display(),
        bytes = bytes.len(),
        tags = trace.len(),
        "Decoded sideband trace"
    );
    Ok(trace)
}
