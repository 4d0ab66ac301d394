//! Declarative FSM policy: start state, accept set, transition table and the
//! optional numeric ID table used by sideband traces.
//!
//! A policy is loaded once and never mutated. Loading checks the document's
//! shape only; a policy whose start state is unreachable, or whose accept
//! states never appear in `transitions`, is legal and simply produces
//! violations when a trace is validated against it.
//!
//! ```json
//! {
//!   "start": "INIT",
//!   "accept": ["DONE"],
//!   "transitions": { "INIT": ["RUN"], "RUN": ["DONE"] },
//!   "ids": { "INIT": 0, "RUN": "1", "DONE": "0x2" }
//! }
//! ```

use crate::error::PolicyError;
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::num::IntErrorKind;
use std::path::Path;
use tracing::debug;

/// An immutable FSM transition policy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Policy {
    start: Option<String>,
    accept: BTreeSet<String>,
    transitions: BTreeMap<String, Vec<String>>,
    ids: BTreeMap<String, u32>,
    names_by_id: BTreeMap<u32, String>,
}

/// On-disk shape of a policy document. Every field is optional.
#[derive(Deserialize)]
struct PolicyDocument {
    #[serde(default)]
    start: Option<String>,
    #[serde(default)]
    accept: Vec<String>,
    #[serde(default)]
    transitions: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    ids: BTreeMap<String, Value>,
}

impl Policy {
    pub fn builder() -> PolicyBuilder {
        PolicyBuilder::default()
    }

    /// Load a policy from a JSON file.
    pub fn load(path: &Path) -> Result<Self, PolicyError> {
        if !path.is_file() {
            return Err(PolicyError::NotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path).map_err(|e| PolicyError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let policy = Self::from_json_str(&content)?;
        debug!(
            policy = %path.display(),
            states = policy.transitions.len(),
            ids = policy.ids.len(),
            "Loaded FSM policy"
        );
        Ok(policy)
    }

    /// Parse a policy from JSON text.
    pub fn from_json_str(content: &str) -> Result<Self, PolicyError> {
        let value: Value =
            serde_json::from_str(content).map_err(|e| PolicyError::Malformed(e.to_string()))?;

        if !value.is_object() {
            return Err(PolicyError::NotAnObject {
                found: json_kind(&value).to_string(),
            });
        }

        let document: PolicyDocument =
            serde_json::from_value(value).map_err(|e| PolicyError::InvalidField(e.to_string()))?;

        let mut builder = Self::builder()
            .accept(document.accept)
            .transitions(document.transitions);
        if let Some(start) = document.start {
            builder = builder.start(start);
        }
        for (state, raw) in &document.ids {
            builder = builder.id(state.clone(), parse_state_id(state, raw)?);
        }
        builder.build()
    }

    /// Required first state, if any.
    pub fn start(&self) -> Option<&str> {
        self.start.as_deref()
    }

    /// Accepting final states. Empty means any final state is accepted.
    pub fn accept(&self) -> &BTreeSet<String> {
        &self.accept
    }

    /// Allowed successors of `state`. A state without an entry has none.
    pub fn successors(&self, state: &str) -> &[String] {
        self.transitions.get(state).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Numeric sideband ID of `state`.
    pub fn id_of(&self, state: &str) -> Option<u32> {
        self.ids.get(state).copied()
    }

    /// State name mapped to a numeric sideband ID.
    pub fn state_for_id(&self, id: u32) -> Option<&str> {
        self.names_by_id.get(&id).map(String::as_str)
    }

    /// Whether the policy carries an ID table at all.
    pub fn has_ids(&self) -> bool {
        !self.ids.is_empty()
    }
}

/// Programmatic construction of a [`Policy`].
#[derive(Default)]
pub struct PolicyBuilder {
    start: Option<String>,
    accept: BTreeSet<String>,
    transitions: BTreeMap<String, Vec<String>>,
    ids: Vec<(String, u32)>,
}

impl PolicyBuilder {
    /// Set the required start state. An empty name means no constraint.
    pub fn start(mut self, state: impl Into<String>) -> Self {
        let state = state.into();
        self.start = (!state.is_empty()).then_some(state);
        self
    }

    pub fn accept<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accept.extend(states.into_iter().map(Into::into));
        self
    }

    /// Append allowed successors of `from`.
    pub fn transition<I, S>(mut self, from: impl Into<String>, to: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.transitions
            .entry(from.into())
            .or_default()
            .extend(to.into_iter().map(Into::into));
        self
    }

    fn transitions(mut self, table: BTreeMap<String, Vec<String>>) -> Self {
        for (from, to) in table {
            self = self.transition(from, to);
        }
        self
    }

    pub fn id(mut self, state: impl Into<String>, id: u32) -> Self {
        self.ids.push((state.into(), id));
        self
    }

    /// Finish the policy, rejecting two states that share one ID.
    pub fn build(self) -> Result<Policy, PolicyError> {
        let mut ids = BTreeMap::new();
        let mut names_by_id: BTreeMap<u32, String> = BTreeMap::new();

        for (state, id) in self.ids {
            if let Some(first) = names_by_id.get(&id) {
                if *first != state {
                    return Err(PolicyError::DuplicateId {
                        id,
                        first: first.clone(),
                        second: state,
                    });
                }
            }
            // Re-assigning a state drops its previous reverse entry.
            if let Some(previous) = ids.insert(state.clone(), id) {
                names_by_id.remove(&previous);
            }
            names_by_id.insert(id, state);
        }

        Ok(Policy {
            start: self.start,
            accept: self.accept,
            transitions: self.transitions,
            ids,
            names_by_id,
        })
    }
}

/// Parse one `ids` entry: a native integer, or a decimal / `0x` hex string.
fn parse_state_id(state: &str, raw: &Value) -> Result<u32, PolicyError> {
    let invalid = || PolicyError::InvalidId {
        state: state.to_string(),
        value: raw.to_string(),
    };
    let out_of_range = || PolicyError::IdOutOfRange {
        state: state.to_string(),
        value: raw.to_string(),
    };

    let wide = match raw {
        Value::Number(n) => match n.as_u64() {
            Some(v) => v,
            None if n.is_i64() => return Err(out_of_range()),
            None => return Err(invalid()),
        },
        Value::String(text) => {
            let text = text.trim();
            let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
                Some(hex) => u64::from_str_radix(hex, 16),
                None => text.parse::<u64>(),
            };
            match parsed {
                Ok(v) => v,
                Err(e) if *e.kind() == IntErrorKind::PosOverflow => return Err(out_of_range()),
                Err(_) => return Err(invalid()),
            }
        }
        _ => return Err(invalid()),
    };

    u32::try_from(wide).map_err(|_| out_of_range())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_state_id_native_int() {
        assert_eq!(parse_state_id("A", &json!(7)).unwrap(), 7);
        assert_eq!(parse_state_id("A", &json!(0)).unwrap(), 0);
    }

    #[test]
    fn parse_state_id_strings() {
        assert_eq!(parse_state_id("A", &json!("42")).unwrap(), 42);
        assert_eq!(parse_state_id("A", &json!("0x2A")).unwrap(), 42);
        assert_eq!(parse_state_id("A", &json!("0Xff")).unwrap(), 255);
        assert_eq!(parse_state_id("A", &json!(" 3 ")).unwrap(), 3);
    }

    #[test]
    fn parse_state_id_rejects_other_shapes() {
        for raw in [json!("abc"), json!("0x"), json!(1.5), json!(true), json!(null), json!([1])] {
            let err = parse_state_id("A", &raw).unwrap_err();
            assert!(
                matches!(err, PolicyError::InvalidId { .. }),
                "{raw} gave {err:?}"
            );
        }
    }

    #[test]
    fn parse_state_id_range() {
        assert_eq!(parse_state_id("A", &json!(u32::MAX)).unwrap(), u32::MAX);
        assert!(matches!(
            parse_state_id("A", &json!(u64::from(u32::MAX) + 1)),
            Err(PolicyError::IdOutOfRange { .. })
        ));
        assert!(matches!(
            parse_state_id("A", &json!(-1)),
            Err(PolicyError::IdOutOfRange { .. })
        ));
        assert!(matches!(
            parse_state_id("A", &json!("99999999999999999999999")),
            Err(PolicyError::IdOutOfRange { .. })
        ));
    }

    #[test]
    fn from_json_str_full_document() {
        let policy = Policy::from_json_str(
            r#"{
                "start": "INIT",
                "accept": ["DONE", "DONE"],
                "transitions": {"INIT": ["RUN"], "RUN": ["DONE"]},
                "ids": {"INIT": 0, "RUN": "1", "DONE": "0x2"}
            }"#,
        )
        .unwrap();

        assert_eq!(policy.start(), Some("INIT"));
        assert_eq!(policy.accept().len(), 1);
        assert_eq!(policy.successors("INIT"), ["RUN".to_string()]);
        assert!(policy.successors("DONE").is_empty());
        assert_eq!(policy.id_of("DONE"), Some(2));
        assert_eq!(policy.state_for_id(1), Some("RUN"));
        assert_eq!(policy.state_for_id(3), None);
    }

    #[test]
    fn from_json_str_empty_object_is_unconstrained() {
        let policy = Policy::from_json_str("{}").unwrap();
        assert_eq!(policy.start(), None);
        assert!(policy.accept().is_empty());
        assert!(!policy.has_ids());
    }

    #[test]
    fn from_json_str_rejects_non_object() {
        let err = Policy::from_json_str("[1, 2]").unwrap_err();
        assert!(matches!(err, PolicyError::NotAnObject { ref found } if found == "array"));
    }

    #[test]
    fn from_json_str_rejects_bad_json() {
        assert!(matches!(
            Policy::from_json_str("{ not json"),
            Err(PolicyError::Malformed(_))
        ));
    }

    #[test]
    fn from_json_str_rejects_wrong_field_shape() {
        assert!(matches!(
            Policy::from_json_str(r#"{"transitions": ["INIT"]}"#),
            Err(PolicyError::InvalidField(_))
        ));
        assert!(matches!(
            Policy::from_json_str(r#"{"accept": "DONE"}"#),
            Err(PolicyError::InvalidField(_))
        ));
    }

    #[test]
    fn empty_start_means_unconstrained() {
        let policy = Policy::from_json_str(r#"{"start": ""}"#).unwrap();
        assert_eq!(policy.start(), None);
    }

    #[test]
    fn duplicate_ids_rejected() {
        let err = Policy::from_json_str(r#"{"ids": {"A": 1, "B": "1"}}"#).unwrap_err();
        match err {
            PolicyError::DuplicateId { id, first, second } => {
                assert_eq!(id, 1);
                assert_eq!(first, "A");
                assert_eq!(second, "B");
            }
            other => panic!("expected DuplicateId, got {other:?}"),
        }
    }

    #[test]
    fn builder_reassigning_state_id() {
        let policy = Policy::builder().id("A", 1).id("A", 2).build().unwrap();
        assert_eq!(policy.id_of("A"), Some(2));
        assert_eq!(policy.state_for_id(1), None);
        assert_eq!(policy.state_for_id(2), Some("A"));
    }

    #[test]
    fn load_missing_file() {
        let err = Policy::load(Path::new("/nonexistent/policy.json")).unwrap_err();
        assert!(matches!(err, PolicyError::NotFound(_)));
    }
}
