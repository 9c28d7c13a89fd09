//! YAML Frontmatter Handling
//!
//! Strips the optional metadata header from a quiz document:
//! - BOM (Byte Order Mark) stripping
//! - Line ending normalization (CRLF → LF)
//! - Frontmatter delimited by `---` lines at the top of the file
//!
//! A document without frontmatter is returned unchanged with an empty
//! mapping; a present but malformed frontmatter block is a fatal error.

use anyhow::{bail, Context, Result};
use regex::Regex;

/// Normalize content: strip BOM, normalize line endings
pub fn normalize_content(content: &str) -> String {
    let mut s = content.to_string();

    if let Some(stripped) = s.strip_prefix('\u{FEFF}') {
        s = stripped.to_string();
    }

    s = s.replace("\r\n", "\n").replace('\r', "\n");

    s
}

/// Extract YAML frontmatter from a quiz document
///
/// # Arguments
/// * `content` - Normalized document content
///
/// # Returns
/// * `(frontmatter_mapping, body)` - the parsed frontmatter (empty if the
///   document does not start with `---`) and the remaining markdown
///
/// # Errors
/// * If a frontmatter block is present but is not valid YAML
/// * If the frontmatter YAML is not a mapping
pub fn extract_frontmatter(
    content: &str,
) -> Result<(serde_json::Map<String, serde_json::Value>, String)> {
    let re = Regex::new(r"^---[ \t]*\n((?s).*?)\n---[ \t]*\n")
        .context("Failed to compile frontmatter regex")?;

    let m = match re.captures(content) {
        Some(caps) if caps.get(0).map(|m| m.start()) == Some(0) => caps,
        _ => return Ok((serde_json::Map::new(), content.to_string())),
    };

    let frontmatter_str = m.get(1).map(|g| g.as_str()).unwrap_or("");
    let body = content[m.get(0).map(|g| g.end()).unwrap_or(0)..].to_string();

    let yaml: serde_yaml::Value =
        serde_yaml::from_str(frontmatter_str).context("Invalid YAML frontmatter")?;

    if yaml.is_null() {
        return Ok((serde_json::Map::new(), body));
    }

    let value =
        serde_json::to_value(&yaml).context("Frontmatter contains non-string mapping keys")?;

    match value {
        serde_json::Value::Object(map) => Ok((map, body)),
        _ => bail!("Frontmatter must be a YAML mapping"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_bom() {
        let with_bom = "\u{FEFF}---\ntitle: test\n---\nbody";
        let normalized = normalize_content(with_bom);
        assert!(normalized.starts_with("---"));
    }

    #[test]
    fn test_normalize_crlf() {
        let crlf = "---\r\ntitle: test\r\n---\r\nbody";
        let normalized = normalize_content(crlf);
        assert!(!normalized.contains('\r'));
    }

    #[test]
    fn test_extract_basic_frontmatter() {
        let content = "---\ntitle: My Quiz\npoints: 10\n---\n# Body\n";
        let (fm, body) = extract_frontmatter(content).unwrap();
        assert_eq!(fm.get("title").unwrap(), "My Quiz");
        assert_eq!(fm.get("points").unwrap(), 10);
        assert_eq!(body, "# Body\n");
    }

    #[test]
    fn test_no_frontmatter_passes_through() {
        let content = "# Section A\n\n## Question 1\n";
        let (fm, body) = extract_frontmatter(content).unwrap();
        assert!(fm.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_dashes_later_in_document_are_not_frontmatter() {
        let content = "# Heading\n---\ntitle: nope\n---\n";
        let (fm, body) = extract_frontmatter(content).unwrap();
        assert!(fm.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_empty_frontmatter_block() {
        let content = "---\n\n---\nbody";
        let (fm, body) = extract_frontmatter(content).unwrap();
        assert!(fm.is_empty());
        assert_eq!(body, "body");
    }

    #[test]
    fn test_invalid_yaml_is_fatal() {
        let content = "---\ntitle: [unclosed\n---\nbody";
        assert!(extract_frontmatter(content).is_err());
    }

    #[test]
    fn test_non_mapping_frontmatter_is_fatal() {
        let content = "---\n- just\n- a list\n---\nbody";
        assert!(extract_frontmatter(content).is_err());
    }
}
