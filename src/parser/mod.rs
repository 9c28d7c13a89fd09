//! Markdown Quiz Parser
//!
//! Converts the quiz markdown dialect into a [`ParsedQuiz`] graph. The
//! parser holds only the registry of custom panel decoders as instance
//! state; diagnostics go into the sink passed to each parse call, so one
//! parser can be reused across many documents.

pub mod document;
pub mod frontmatter;
pub mod hints;
pub mod panels;
pub mod question;

pub use frontmatter::{extract_frontmatter, normalize_content};
pub use hints::detect_type_from_hint;
pub use panels::TagDecoder;

use anyhow::{bail, Result};
use std::collections::HashMap;

use crate::diagnostics::{DiagnosticsSink, LogEntry};
use crate::models::ParsedQuiz;

/// Extensible parser for quiz markdown
///
/// Custom decoders registered with [`register_decoder`](Self::register_decoder)
/// take precedence over the built-in ones for their exact tag name; the last
/// registration for a name wins.
pub struct MarkdownParser {
    decoders: HashMap<String, Box<dyn TagDecoder>>,
}

impl MarkdownParser {
    pub fn new() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// Register a custom panel decoder for a tag name
    pub fn register_decoder(
        &mut self,
        tag: impl Into<String>,
        decoder: impl TagDecoder + 'static,
    ) {
        self.decoders
            .insert(tag.into().to_lowercase(), Box::new(decoder));
    }

    /// Parse a document body with no quiz metadata
    pub fn parse(&self, markdown: &str, sink: &mut dyn DiagnosticsSink) -> Result<ParsedQuiz> {
        self.parse_with_metadata(markdown, serde_json::Map::new(), sink)
    }

    /// Parse a document body into a [`ParsedQuiz`]
    ///
    /// # Arguments
    /// * `markdown` - Document body with any frontmatter already stripped
    /// * `metadata` - The `quiz` section of the merged configuration
    /// * `sink` - Diagnostics receiver
    ///
    /// # Errors
    /// Only a document with no content at all fails; every recoverable
    /// condition degrades to a diagnostic or an empty default.
    pub fn parse_with_metadata(
        &self,
        markdown: &str,
        metadata: serde_json::Map<String, serde_json::Value>,
        sink: &mut dyn DiagnosticsSink,
    ) -> Result<ParsedQuiz> {
        if markdown.trim().is_empty() {
            bail!("No content to parse: the document body is empty");
        }

        sink.emit(LogEntry::info("Starting markdown parsing").with_source("parser"));

        let (sections, questions) = document::split_document(&self.decoders, markdown, sink)?;

        let total_points: f64 = questions.iter().map(|q| q.points).sum();

        sink.emit(
            LogEntry::info(format!(
                "Parsing complete: {} questions, {} total points",
                questions.len(),
                total_points
            ))
            .with_source("parser")
            .with_detail("questions", questions.len())
            .with_detail("total_points", total_points),
        );

        Ok(ParsedQuiz {
            sections,
            questions,
            total_points,
            metadata,
        })
    }
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new()
    }
}
