//! Tag extraction: turn a trace artifact into a [`Trace`](crate::Trace).
//!
//! Two independent sources describe the same logical run:
//!
//! - **Text**: generated assembly carrying `TAG:<STATE>` comment markers,
//!   read line by line ([`extract_text`], [`read_text`]).
//! - **Sideband**: a flat stream of little-endian `u32` state IDs recorded
//!   alongside the artifact, resolved through the policy's `ids` table
//!   ([`decode_sideband`], [`read_sideband`]).
//!
//! [`SidebandWriter`] records the sideband format from Rust code.
//!
//! # Example
//!
//! ```
//! use fsm_check::{extract_text, Policy, decode_sideband};
//!
//! let trace = extract_text("  # TAG:BOOT\n  addi a0, a0, 1\n  # TAG:RUN\n");
//! assert_eq!(trace.to_string(), "BOOT -> RUN");
//!
//! let policy = Policy::builder().id("BOOT", 1).id("RUN", 3).build()?;
//! let bytes = [1u32, 3].iter().flat_map(|id| id.to_le_bytes()).collect::<Vec<_>>();
//! assert_eq!(decode_sideband(&bytes, &policy)?, trace);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod sideband;
pub mod text;
pub mod writer;

pub use sideband::{decode_ids, decode_sideband, read_sideband, unknown_tag, RECORD_SIZE};
pub use text::{extract_text, read_text};
pub use writer::SidebandWriter;
