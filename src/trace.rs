//! The observed tag sequence shared by both extractors and the validator.

use serde::Serialize;
use std::fmt;

/// Separator used when a trace is rendered for humans.
pub const ARROW: &str = " -> ";

/// Ordered state names observed in a trace artifact.
///
/// The validator only ever sees this type, never the source it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Trace {
    tags: Vec<String>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tag: impl Into<String>) {
        self.tags.push(tag.into());
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn first(&self) -> Option<&str> {
        self.tags.first().map(String::as_str)
    }

    pub fn last(&self) -> Option<&str> {
        self.tags.last().map(String::as_str)
    }

    /// Adjacent `(prev, curr)` pairs in trace order.
    pub fn transitions(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tags
            .windows(2)
            .map(|pair| (pair[0].as_str(), pair[1].as_str()))
    }
}

impl<S: Into<String>> FromIterator<S> for Trace {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            tags: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Renders `A -> B -> C`.
impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tags.join(ARROW))
    }
}
