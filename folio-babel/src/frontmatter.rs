//! YAML front-matter
//!
//!     Front-matter must be a mapping (or empty). Page metadata is a flat string map, so each
//!     value is flattened as it is read:
//!
//!         title: Hello          -> "Hello"
//!         draft: true           -> "true"
//!         weight: 3             -> "3"
//!         tags: [a, b]          -> "[\"a\",\"b\"]"     (JSON text)
//!         empty:                -> ""
//!
//!     Tagged values (`!env FOO`) lose their tag.
//!
//!     Syntax error locations are lines of the payload; `paginate` moves them into the document.

use folio_core::{FrontmatterError, FrontmatterParser, Metadata};
use serde_yaml::Value;

/// [`FrontmatterParser`] for YAML payloads
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlFrontmatter;

impl FrontmatterParser for YamlFrontmatter {
    fn parse(&self, raw: &str) -> Result<Metadata, FrontmatterError> {
        if raw.trim().is_empty() {
            return Ok(Metadata::new());
        }

        let document: Value = serde_yaml::from_str(raw).map_err(|err| {
            let location = err.location();
            FrontmatterError::Syntax {
                message: err.to_string(),
                text: raw.to_string(),
                line: location.as_ref().map(|l| l.line()),
                column: location.as_ref().map(|l| l.column()),
            }
        })?;

        match untagged(document) {
            Value::Null => Ok(Metadata::new()),
            Value::Mapping(mapping) => Ok(mapping
                .into_iter()
                .map(|(key, value)| (flatten(untagged(key)), flatten(untagged(value))))
                .collect()),
            other => Err(FrontmatterError::Syntax {
                message: format!("expected a mapping, found {}", kind_of(&other)),
                text: raw.to_string(),
                line: None,
                column: None,
            }),
        }
    }
}

fn untagged(value: Value) -> Value {
    match value {
        Value::Tagged(tagged) => untagged(tagged.value),
        other => other,
    }
}

fn flatten(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s,
        composite => serde_json::to_string(&composite).unwrap_or_else(|_| {
            serde_yaml::to_string(&composite)
                .map(|s| s.trim_end().to_string())
                .unwrap_or_default()
        }),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(raw: &str) -> Result<Metadata, FrontmatterError> {
        YamlFrontmatter.parse(raw)
    }

    #[test]
    fn test_scalars_become_strings() {
        let metadata = parse("title: Hello\ndraft: true\nweight: 3\nempty:").unwrap();
        assert_eq!(metadata.get("title").map(String::as_str), Some("Hello"));
        assert_eq!(metadata.get("draft").map(String::as_str), Some("true"));
        assert_eq!(metadata.get("weight").map(String::as_str), Some("3"));
        assert_eq!(metadata.get("empty").map(String::as_str), Some(""));
    }

    #[test]
    fn test_composites_become_json() {
        let metadata = parse("tags: [a, b]\nauthor:\n  name: Ada").unwrap();
        assert_eq!(metadata["tags"], r#"["a","b"]"#);
        assert_eq!(metadata["author"], r#"{"name":"Ada"}"#);
    }

    #[test]
    fn test_empty_payload() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("  \n").unwrap().is_empty());
        assert!(parse("~").unwrap().is_empty());
    }

    #[test]
    fn test_tags_are_dropped() {
        let metadata = parse("home: !env HOME").unwrap();
        assert_eq!(metadata["home"], "HOME");
    }

    #[test]
    fn test_syntax_error_has_location() {
        let err = parse("title: [unclosed").unwrap_err();
        let FrontmatterError::Syntax { text, line, .. } = err;
        assert_eq!(text, "title: [unclosed");
        assert!(line.is_some());
    }

    #[test]
    fn test_non_mapping_is_rejected() {
        let err = parse("- a\n- b").unwrap_err();
        assert!(err.to_string().contains("expected a mapping, found a sequence"));
    }
}
