//! Front matter extraction and parsing.

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

/// Delimiter line that opens and closes a front matter block.
pub const DELIMITER: &str = "---";

/// Parsed front matter of a source document.
///
/// Keys are arbitrary; nested YAML values are preserved as-is so templates can
/// reach into custom fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrontMatter(Mapping);

impl FrontMatter {
    /// Look up a top-level key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Look up a top-level key holding a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Set a top-level key, replacing any previous value.
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(Value::from(key), value.into());
    }

    /// Template name selected by the reserved `template` key.
    pub fn template(&self) -> Option<&str> {
        self.get_str("template")
    }

    /// Page title.
    pub fn title(&self) -> Option<&str> {
        self.get_str("title")
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Extract front matter from a document.
///
/// Returns the parsed front matter and the body that follows the closing
/// delimiter. A document without an opening delimiter has empty front matter
/// and the whole text as its body.
pub fn extract_frontmatter(source: &str) -> Result<(FrontMatter, &str), FrontmatterError> {
    let trimmed = source.trim_start();

    if !trimmed.starts_with(DELIMITER) {
        return Ok((FrontMatter::default(), source));
    }

    let after_open = &trimmed[DELIMITER.len()..];
    let Some(close_pos) = after_open.find("\n---") else {
        return Err(FrontmatterError::Unclosed);
    };

    let yaml_content = after_open[..close_pos].trim();
    let remaining = &after_open[close_pos + 1 + DELIMITER.len()..];

    let front_matter = if yaml_content.is_empty() {
        FrontMatter::default()
    } else {
        serde_yaml::from_str::<Mapping>(yaml_content)
            .map(FrontMatter)
            .map_err(|e| FrontmatterError::InvalidYaml(e.to_string()))?
    };

    Ok((front_matter, remaining.trim_start_matches(['\r', '\n'])))
}

/// Errors that can occur when parsing front matter.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("Unclosed front matter block - missing closing ---")]
    Unclosed,

    #[error("Invalid YAML in front matter: {0}")]
    InvalidYaml(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extracts_valid_frontmatter() {
        let source = r#"---
title: Home
template: main
tags:
  - intro
  - welcome
---

# Hi
"#;

        let (fm, body) = extract_frontmatter(source).unwrap();

        assert_eq!(fm.title(), Some("Home"));
        assert_eq!(fm.template(), Some("main"));
        let tags = fm.get("tags").and_then(Value::as_sequence).unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(body, "# Hi\n");
    }

    #[test]
    fn handles_no_frontmatter() {
        let source = "# Just Markdown\n\nNo front matter here.";

        let (fm, body) = extract_frontmatter(source).unwrap();

        assert!(fm.is_empty());
        assert_eq!(body, source);
    }

    #[test]
    fn empty_block_is_empty_mapping() {
        let (fm, body) = extract_frontmatter("---\n---\nbody").unwrap();

        assert!(fm.is_empty());
        assert_eq!(body, "body");
    }

    #[test]
    fn errors_on_unclosed_frontmatter() {
        let source = "---\ntitle: Test\n# No closing";

        let result = extract_frontmatter(source);

        assert!(matches!(result, Err(FrontmatterError::Unclosed)));
    }

    #[test]
    fn errors_on_invalid_yaml() {
        let source = "---\ntitle: [invalid yaml\n---\n";

        let result = extract_frontmatter(source);

        assert!(matches!(result, Err(FrontmatterError::InvalidYaml(_))));
    }

    #[test]
    fn errors_on_non_mapping_yaml() {
        let result = extract_frontmatter("---\n- a\n- b\n---\n");

        assert!(matches!(result, Err(FrontmatterError::InvalidYaml(_))));
    }

    #[test]
    fn insert_overrides_existing_key() {
        let mut fm = FrontMatter::default();
        fm.insert("title", "Site Map");
        fm.insert("title", "Index");

        assert_eq!(fm.title(), Some("Index"));
    }
}
