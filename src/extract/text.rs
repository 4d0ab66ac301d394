//! `TAG:<STATE>` marker extraction from line-oriented text.

use crate::error::TraceError;
use crate::trace::Trace;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

static TAG_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"TAG:([A-Za-z0-9_]+)").expect("Invalid regex pattern for TAG marker")
});

/// Extract one tag per line from `text`, in line order.
///
/// Lines end at `\n`, `\r\n` or a bare `\r`. Only the first marker on a
/// line counts. Lines without a marker are skipped, so marker-free input
/// yields an empty trace.
pub fn extract_text(text: &str) -> Trace {
    text.split(['\n', '\r'])
        .filter_map(|line| TAG_MARKER.captures(line))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect()
}

/// Read a text artifact (typically generated assembly) and extract its tags.
pub fn read_text(path: &Path) -> Result<Trace, TraceError> {
    if !path.is_file() {
        return Err(TraceError::NotFound(path.to_path_buf()));
    }

    let bytes = std::fs::read(path).map_err(|e| TraceError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let trace = extract_text(&String::from_utf8_lossy(&bytes));

    debug!(path = %path.display(), tags = trace.len(), "Extracted text tags");
    Ok(trace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_marker_per_line_wins() {
        let trace = extract_text("# TAG:A then TAG:B\n# TAG:C\n");
        assert_eq!(trace.tags(), ["A", "C"]);
    }

    #[test]
    fn bare_carriage_return_ends_a_line() {
        let trace = extract_text("# TAG:A\r# TAG:B\r");
        assert_eq!(trace.tags(), ["A", "B"]);

        let mixed = extract_text("# TAG:A TAG:X\r\n# TAG:B\r# TAG:C\n");
        assert_eq!(mixed.tags(), ["A", "B", "C"]);
    }

    #[test]
    fn unknown_placeholder_cannot_come_from_text() {
        let trace = extract_text("# TAG:UNKNOWN(99)\n");
        assert_eq!(trace.tags(), ["UNKNOWN"]);
    }

    #[test]
    fn lines_without_markers_are_skipped() {
        let asm = "\
main:
    addi sp, sp, -16
    # TAG:BOOT
    li a0, 41
    # TAG:INIT
    ret
";
        assert_eq!(extract_text(asm).to_string(), "BOOT -> INIT");
    }

    #[test]
    fn identifier_stops_at_first_non_word_char() {
        let trace = extract_text("TAG:run_2-extra\nxTAG:Z9;\n");
        assert_eq!(trace.tags(), ["run_2", "Z9"]);
    }

    #[test]
    fn marker_without_identifier_is_ignored() {
        assert!(extract_text("TAG:\nTAG: SPACE\ntag:lower\n").is_empty());
    }

    #[test]
    fn empty_input_gives_empty_trace() {
        assert!(extract_text("").is_empty());
    }

    #[test]
    fn read_text_missing_file() {
        let err = read_text(Path::new("/nonexistent/out.s")).unwrap_err();
        assert!(matches!(err, TraceError::NotFound(_)));
    }
}
