//! Configuration Loading
//!
//! Merges quiz configuration from, lowest to highest precedence:
//! built-in defaults, an external YAML file, the document's frontmatter,
//! and caller overrides. Top-level shorthand keys are lifted into their
//! sections before merging, so `title: X` in frontmatter ends up as
//! `quiz.title`.

use chrono::Local;
use serde_json::{json, Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::parser::frontmatter::{extract_frontmatter, normalize_content};

/// Configuration errors a caller can match on
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid YAML in {path}: {source}")]
    InvalidYaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("configuration in {path} must be a YAML mapping")]
    NotAMapping { path: PathBuf },

    #[error("invalid frontmatter: {0}")]
    Frontmatter(String),
}

/// Shorthand key -> (section, key) destinations
const SHORTCUTS: &[(&str, &str, &str)] = &[
    ("title", "quiz", "title"),
    ("subject", "quiz", "subject"),
    ("chapter", "quiz", "chapter"),
    ("class", "quiz", "class"),
    ("author", "quiz", "author"),
    ("date", "quiz", "date"),
    ("time_limit", "quiz", "time_limit"),
    ("shuffle_questions", "behavior", "shuffle_questions"),
    ("shuffle_answers", "behavior", "shuffle_answers"),
    ("passing_score", "behavior", "passing_score"),
    ("show_explanations", "behavior", "show_explanations"),
    ("ide_url", "services", "ide_url"),
    ("email", "services", "email"),
    ("share_folder", "services", "share_folder"),
    ("google_docs", "services", "google_docs"),
    ("book_pdf", "book", "pdf_path"),
    ("default_language", "code", "default_language"),
    ("highlight_theme", "code", "highlight_theme"),
];

/// Loads and merges configuration from multiple sources
pub struct ConfigLoader {
    defaults: Map<String, Value>,
}

impl ConfigLoader {
    /// Loader with the built-in defaults
    pub fn new() -> Self {
        Self {
            defaults: builtin_defaults(),
        }
    }

    /// Loader whose defaults come from a YAML file instead
    pub fn with_defaults_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(Self {
            defaults: load_yaml_file(path.as_ref())?,
        })
    }

    /// Load and merge configuration from all sources
    ///
    /// # Arguments
    /// * `markdown` - Optional document content; its frontmatter is merged
    ///   and the body returned with the frontmatter stripped
    /// * `external` - Optional path to an external YAML config file
    /// * `overrides` - Optional highest-priority overrides
    ///
    /// # Returns
    /// * `(merged_config, body)` - body is empty when no markdown was given
    pub fn load(
        &self,
        markdown: Option<&str>,
        external: Option<&Path>,
        overrides: Option<&Map<String, Value>>,
    ) -> Result<(Map<String, Value>, String), ConfigError> {
        let mut config = self.defaults.clone();

        if let Some(path) = external {
            let external_config = normalize(load_yaml_file(path)?);
            deep_merge(&mut config, external_config);
        }

        let mut body = String::new();
        if let Some(markdown) = markdown {
            let normalized = normalize_content(markdown);
            let (frontmatter, remaining) = extract_frontmatter(&normalized)
                .map_err(|e| ConfigError::Frontmatter(format!("{:#}", e)))?;
            deep_merge(&mut config, normalize(frontmatter));
            body = remaining;
        }

        if let Some(overrides) = overrides {
            deep_merge(&mut config, normalize(overrides.clone()));
        }

        Ok((config, body))
    }

    /// Safely get a nested value from a merged config
    pub fn get_value<'a>(config: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
        let (first, rest) = keys.split_first()?;
        let mut current = config.get(*first)?;
        for key in rest {
            current = current.as_object()?.get(*key)?;
        }
        Some(current)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn builtin_defaults() -> Map<String, Value> {
    let defaults = json!({
        "quiz": {
            "title": "Quiz",
            "language": "el",
        },
        "behavior": {
            "shuffle_questions": false,
            "shuffle_answers": false,
            "passing_score": 50,
            "show_explanations": true,
        },
        "code": {
            "default_language": "text",
        },
    });

    match defaults {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Load a YAML file as a mapping; a missing file is an empty mapping
fn load_yaml_file(path: &Path) -> Result<Map<String, Value>, ConfigError> {
    if !path.exists() {
        return Ok(Map::new());
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let yaml: serde_yaml::Value =
        serde_yaml::from_str(&content).map_err(|source| ConfigError::InvalidYaml {
            path: path.to_path_buf(),
            source,
        })?;

    if yaml.is_null() {
        return Ok(Map::new());
    }

    let value = serde_json::to_value(&yaml).map_err(|_| ConfigError::NotAMapping {
        path: path.to_path_buf(),
    })?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ConfigError::NotAMapping {
            path: path.to_path_buf(),
        }),
    }
}

/// Deep merge: override values win, nested mappings merge recursively
fn deep_merge(base: &mut Map<String, Value>, overlay: Map<String, Value>) {
    for (key, value) in overlay {
        match value {
            Value::Object(incoming) => match base.get_mut(&key) {
                Some(Value::Object(existing)) => deep_merge(existing, incoming),
                _ => {
                    base.insert(key, Value::Object(incoming));
                }
            },
            other => {
                base.insert(key, other);
            }
        }
    }
}

/// Lift shorthand keys into their sections and resolve `date: auto`
fn normalize(config: Map<String, Value>) -> Map<String, Value> {
    let mut normalized = config;

    for (shortcut, section, key) in SHORTCUTS {
        if let Some(value) = normalized.remove(*shortcut) {
            let entry = normalized
                .entry(section.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(section_map) = entry {
                section_map.insert(key.to_string(), value);
            }
        }
    }

    let auto_date = ConfigLoader::get_value(&normalized, &["quiz", "date"])
        .map(|v| v == "auto")
        .unwrap_or(false);
    if auto_date {
        if let Some(Value::Object(quiz)) = normalized.get_mut("quiz") {
            quiz.insert(
                "date".to_string(),
                Local::now().format("%Y-%m-%d").to_string().into(),
            );
        }
    }

    normalized
}
