//! Matcher normalization
//!
//!     Everything that selects nodes (the scanner's rules, cursor searches, pruning) takes a
//!     [`Matcher`]. Callers describe what they want with a [`MatchSpec`]:
//!
//!     - a type tag: `"heading"` matches nodes whose `type` is `heading`
//!     - a partial node: `{ "type": "heading", "depth": 1 }` matches when every listed key is
//!       equal on the probe. Keys the probe has but the partial does not are ignored, keys the
//!       partial has but the probe lacks fail the match.
//!     - a predicate: any `Fn(&Node) -> bool`, used as is
//!
//!     [`normalize`] turns any of these into a `Matcher` once, at configuration time. Bad shapes
//!     are rejected there with a [`ConfigurationError`], so traversal code never has to look at
//!     what kind of spec it was given.

use crate::ast::Node;
use crate::error::ConfigurationError;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

type Predicate = dyn Fn(&Node) -> bool + Send + Sync;

/// A normalized node predicate. Cheap to clone.
#[derive(Clone)]
pub struct Matcher {
    predicate: Arc<Predicate>,
    label: Arc<str>,
}

impl Matcher {
    pub fn from_fn<F>(predicate: F) -> Self
    where
        F: Fn(&Node) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
            label: Arc::from("<predicate>"),
        }
    }

    /// Matches nodes of the given type.
    pub fn kind(kind: impl Into<String>) -> Self {
        let kind = kind.into();
        let label = format!("type = {}", kind);
        Self::from_fn(move |node| node.kind == kind).labelled(label)
    }

    /// Matches headings whose depth is at most `max_depth`.
    pub fn heading_up_to(max_depth: u64) -> Self {
        Self::from_fn(move |node| {
            node.is("heading") && node.depth().is_some_and(|depth| depth <= max_depth)
        })
        .labelled(format!("heading depth <= {}", max_depth))
    }

    /// Matches when any of the given matchers does.
    pub fn any_of(matchers: impl IntoIterator<Item = Matcher>) -> Self {
        let matchers: Vec<Matcher> = matchers.into_iter().collect();
        let label = matchers
            .iter()
            .map(|m| m.label.as_ref())
            .collect::<Vec<_>>()
            .join(" | ");
        Self::from_fn(move |node| matchers.iter().any(|m| m.matches(node))).labelled(label)
    }

    pub fn matches(&self, node: &Node) -> bool {
        (self.predicate)(node)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    fn labelled(mut self, label: impl Into<String>) -> Self {
        self.label = Arc::from(label.into());
        self
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Matcher").field(&self.label).finish()
    }
}

/// The three accepted ways of describing a match.
#[derive(Debug, Clone)]
pub enum MatchSpec {
    Type(String),
    Partial(Map<String, Value>),
    Predicate(Matcher),
}

impl From<&str> for MatchSpec {
    fn from(kind: &str) -> Self {
        MatchSpec::Type(kind.to_string())
    }
}

impl From<String> for MatchSpec {
    fn from(kind: String) -> Self {
        MatchSpec::Type(kind)
    }
}

impl From<Map<String, Value>> for MatchSpec {
    fn from(partial: Map<String, Value>) -> Self {
        MatchSpec::Partial(partial)
    }
}

impl From<Matcher> for MatchSpec {
    fn from(matcher: Matcher) -> Self {
        MatchSpec::Predicate(matcher)
    }
}

impl TryFrom<Value> for MatchSpec {
    type Error = ConfigurationError;

    /// Accepts the shapes a configuration file can express: a string or an object.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(kind) => Ok(MatchSpec::Type(kind)),
            Value::Object(partial) => Ok(MatchSpec::Partial(partial)),
            other => Err(ConfigurationError::new(format!(
                "a matcher must be a node type or a partial node, got {}",
                other
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for MatchSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        MatchSpec::try_from(value).map_err(serde::de::Error::custom)
    }
}

/// Normalize a match specification into a single predicate.
pub fn normalize(spec: impl Into<MatchSpec>) -> Result<Matcher, ConfigurationError> {
    match spec.into() {
        MatchSpec::Type(kind) => {
            if kind.trim().is_empty() {
                return Err(ConfigurationError::new("a node type matcher cannot be empty"));
            }
            Ok(Matcher::kind(kind))
        }
        MatchSpec::Partial(partial) => normalize_partial(partial),
        MatchSpec::Predicate(matcher) => Ok(matcher),
    }
}

fn normalize_partial(partial: Map<String, Value>) -> Result<Matcher, ConfigurationError> {
    if partial.is_empty() {
        return Err(ConfigurationError::new(
            "a partial node matcher needs at least one key",
        ));
    }
    if let Some(kind) = partial.get("type") {
        if !kind.is_string() {
            return Err(ConfigurationError::new(format!(
                "the `type` of a partial node matcher must be a string, got {}",
                kind
            )));
        }
    }
    let label = Value::Object(partial.clone()).to_string();
    let matcher = Matcher::from_fn(move |node| {
        partial
            .iter()
            .all(|(key, expected)| node.field(key).is_some_and(|actual| *actual == *expected))
    });
    Ok(matcher.labelled(label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builder::*;
    use serde_json::json;

    fn partial(value: Value) -> MatchSpec {
        MatchSpec::try_from(value).unwrap()
    }

    #[test]
    fn test_type_tag() {
        let matcher = normalize("heading").unwrap();
        assert!(matcher.matches(&heading(1, vec![])));
        assert!(!matcher.matches(&paragraph(vec![])));
    }

    #[test]
    fn test_partial_node() {
        let matcher = normalize(partial(json!({ "type": "heading", "depth": 1 }))).unwrap();
        assert!(matcher.matches(&heading(1, vec![text("x")])));
        assert!(!matcher.matches(&heading(2, vec![])));
        assert!(!matcher.matches(&paragraph(vec![])));
    }

    #[test]
    fn test_partial_node_missing_key_fails() {
        let matcher = normalize(partial(json!({ "name": "title" }))).unwrap();
        assert!(matcher.matches(&leaf_directive("title", vec![])));
        assert!(!matcher.matches(&heading(1, vec![])));
    }

    #[test]
    fn test_partial_node_on_children() {
        let matcher = normalize(partial(json!({
            "type": "paragraph",
            "children": [{ "type": "text", "value": "Hi" }]
        })))
        .unwrap();
        assert!(matcher.matches(&paragraph(vec![text("Hi")])));
        assert!(!matcher.matches(&paragraph(vec![text("Ho")])));
    }

    #[test]
    fn test_predicate_is_returned_unchanged() {
        let matcher =
            normalize(Matcher::from_fn(|node| node.text_content() == "magic")).unwrap();
        assert!(matcher.matches(&paragraph(vec![text("magic")])));
        assert!(!matcher.matches(&paragraph(vec![text("mundane")])));
    }

    #[test]
    fn test_heading_up_to() {
        let matcher = Matcher::heading_up_to(2);
        assert!(matcher.matches(&heading(1, vec![])));
        assert!(matcher.matches(&heading(2, vec![])));
        assert!(!matcher.matches(&heading(3, vec![])));
        assert!(!matcher.matches(&Node::parent("heading", vec![])));
    }

    #[test]
    fn test_any_of() {
        let matcher = Matcher::any_of([Matcher::kind("yaml"), Matcher::kind("leafDirective")]);
        assert!(matcher.matches(&yaml("a: 1")));
        assert!(matcher.matches(&leaf_directive("a", vec![])));
        assert!(!matcher.matches(&text("a")));
        assert_eq!(matcher.label(), "type = yaml | type = leafDirective");
    }

    #[test]
    fn test_invalid_shapes_are_configuration_errors() {
        assert!(MatchSpec::try_from(json!(42)).is_err());
        assert!(MatchSpec::try_from(json!(["heading"])).is_err());
        assert!(MatchSpec::try_from(Value::Null).is_err());
        assert!(normalize("").is_err());
        assert!(normalize(partial(json!({}))).is_err());
        assert!(normalize(partial(json!({ "type": 3 }))).is_err());
    }

    #[test]
    fn test_deserialize_match_spec() {
        let spec: MatchSpec = serde_json::from_value(json!("heading")).unwrap();
        assert!(matches!(spec, MatchSpec::Type(ref kind) if kind == "heading"));

        let spec: Result<MatchSpec, _> = serde_json::from_value(json!(true));
        assert!(spec.is_err());
    }
}
