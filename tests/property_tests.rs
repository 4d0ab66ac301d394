//! Property tests for sideband decoding and validation.

use fsm_check::*;
use proptest::prelude::*;

const STATES: [&str; 4] = ["INIT", "RUN", "WAIT", "DONE"];

fn policy() -> Policy {
    Policy::builder()
        .start("INIT")
        .accept(["DONE"])
        .transition("INIT", ["RUN"])
        .transition("RUN", ["WAIT", "DONE"])
        .transition("WAIT", ["RUN"])
        .id("INIT", 0)
        .id("RUN", 1)
        .id("WAIT", 2)
        .id("DONE", 3)
        .build()
        .unwrap()
}

fn encode(ids: &[u32]) -> Vec<u8> {
    ids.iter().flat_map(|id| id.to_le_bytes()).collect()
}

proptest! {
    #[test]
    fn decoding_is_deterministic(ids in prop::collection::vec(0u32..8, 0..32)) {
        let policy = policy();
        let bytes = encode(&ids);
        prop_assert_eq!(
            decode_sideband(&bytes, &policy).unwrap(),
            decode_sideband(&bytes, &policy).unwrap()
        );
    }

    #[test]
    fn decoded_length_matches_records(ids in prop::collection::vec(any::<u32>(), 0..32)) {
        let trace = decode_sideband(&encode(&ids), &policy()).unwrap();
        prop_assert_eq!(trace.len(), ids.len());
    }

    #[test]
    fn unknown_placeholders_never_alias(a in 4u32.., b in 4u32..) {
        prop_assume!(a != b);
        prop_assert_ne!(unknown_tag(a), unknown_tag(b));
    }

    #[test]
    fn partial_records_rejected(len in 0usize..64) {
        prop_assume!(len % 4 != 0);
        let result = decode_ids(&vec![0u8; len]);
        prop_assert!(
            matches!(result, Err(TraceError::Truncated { len: l }) if l == len),
            "expected Truncated {{ len: {} }}, got {:?}", len, result
        );
    }

    #[test]
    fn validation_is_idempotent(picks in prop::collection::vec(0usize..4, 0..16)) {
        let policy = policy();
        let trace: Trace = picks.iter().map(|&i| STATES[i]).collect();
        prop_assert_eq!(validate(&trace, &policy), validate(&trace, &policy));
    }

    #[test]
    fn text_and_sideband_agree(picks in prop::collection::vec(0usize..4, 0..16)) {
        let policy = policy();
        let asm: String = picks.iter().map(|&i| format!("  # TAG:{}\n", STATES[i])).collect();
        let ids: Vec<u32> = picks.iter().map(|&i| i as u32).collect();

        let from_text = extract_text(&asm);
        let from_bin = decode_sideband(&encode(&ids), &policy).unwrap();

        prop_assert_eq!(&from_text, &from_bin);
        prop_assert_eq!(validate(&from_text, &policy), validate(&from_bin, &policy));
    }

    #[test]
    fn violations_never_exceed_checks(picks in prop::collection::vec(0usize..4, 1..16)) {
        let trace: Trace = picks.iter().map(|&i| STATES[i]).collect();
        let verdict = validate(&trace, &policy());
        // start + each transition + final
        prop_assert!(verdict.violations().len() <= trace.len() + 1);
        prop_assert_eq!(verdict.passed(), verdict.violations().is_empty());
    }
}
