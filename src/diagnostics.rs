//! Diagnostics Sink
//!
//! Leveled messages produced during parsing and generation, tagged with a
//! source component and an optional line number. The parser only writes into
//! a sink, it never reads state back. [`QuizLogger`] is the provided sink:
//! it collects every entry, optionally mirrors them to the console, and can
//! save a formatted report to a file.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Log level for diagnostic entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// Get display name for the level
    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

/// A single diagnostic entry
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,

    /// Source component (e.g. "parser", "config")
    pub source: String,

    /// 1-based line number in the source document, if applicable
    pub line_number: Option<usize>,

    pub timestamp: DateTime<Local>,

    /// Free-form detail pairs
    pub details: serde_json::Map<String, serde_json::Value>,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            source: String::new(),
            line_number: None,
            timestamp: Local::now(),
            details: serde_json::Map::new(),
        }
    }

    pub fn debug(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Debug, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Error, message)
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line_number = Some(line);
        self
    }

    pub fn with_detail(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Entry for an unrecognized `::: tag` panel
    pub fn unknown_tag(tag: &str, line: usize, content: &str) -> Self {
        Self::warning(format!(
            "Unknown tag '::: {}' - passing raw content through",
            tag
        ))
        .with_source("parser")
        .with_line(line)
        .with_detail("tag", tag)
        .with_detail("content_preview", preview(content))
    }

    /// Entry for an internal parse error
    pub fn parse_error(message: &str, line: usize, content: &str) -> Self {
        Self::error(format!("Parse error: {}", message))
            .with_source("parser")
            .with_line(line)
            .with_detail("content_preview", preview(content))
    }

    /// Format entry for display: `[LEVEL] [source] (line N) message`
    pub fn format(&self) -> String {
        let mut parts = vec![format!("[{}]", self.level.name())];

        if !self.source.is_empty() {
            parts.push(format!("[{}]", self.source));
        }
        if let Some(line) = self.line_number {
            parts.push(format!("(line {})", line));
        }
        parts.push(self.message.clone());

        parts.join(" ")
    }
}

/// Truncate content to a 100-character preview
fn preview(content: &str) -> String {
    content.chars().take(100).collect()
}

/// Receiver of diagnostic entries
pub trait DiagnosticsSink {
    fn emit(&mut self, entry: LogEntry);
}

/// Summary counts over all collected entries
#[derive(Debug, Clone, Serialize)]
pub struct LogSummary {
    pub total_entries: usize,
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
    pub has_errors: bool,
}

/// Collecting diagnostics sink with optional console mirroring
pub struct QuizLogger {
    min_level: LogLevel,
    console_output: bool,
    entries: Vec<LogEntry>,
}

impl QuizLogger {
    pub fn new() -> Self {
        Self {
            min_level: LogLevel::Info,
            console_output: true,
            entries: Vec::new(),
        }
    }

    /// Set the minimum level mirrored to the console
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Disable console mirroring; entries are still collected
    pub fn quiet(mut self) -> Self {
        self.console_output = false;
        self
    }

    pub fn debug(&mut self, message: impl Into<String>) {
        self.emit(LogEntry::debug(message));
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.emit(LogEntry::info(message));
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.emit(LogEntry::warning(message));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.emit(LogEntry::error(message));
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn error_count(&self) -> usize {
        self.count(LogLevel::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(LogLevel::Warning)
    }

    pub fn get_errors(&self) -> Vec<&LogEntry> {
        self.entries
            .iter()
            .filter(|e| e.level == LogLevel::Error)
            .collect()
    }

    pub fn get_warnings(&self) -> Vec<&LogEntry> {
        self.entries
            .iter()
            .filter(|e| e.level == LogLevel::Warning)
            .collect()
    }

    pub fn summary(&self) -> LogSummary {
        let errors = self.error_count();
        LogSummary {
            total_entries: self.entries.len(),
            errors,
            warnings: self.warning_count(),
            infos: self.count(LogLevel::Info),
            has_errors: errors > 0,
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Save a formatted report of all entries
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut out = String::new();

        out.push_str("Quiz Generator Log\n");
        out.push_str(&format!("Generated: {}\n", Local::now().to_rfc3339()));
        out.push_str(&format!("{}\n\n", "=".repeat(60)));

        let summary = self.summary();
        out.push_str(&format!(
            "Summary: {} errors, {} warnings\n\n",
            summary.errors, summary.warnings
        ));

        if self.entries.is_empty() {
            out.push_str("No log entries.\n");
        } else {
            out.push_str("Entries:\n");
            out.push_str(&format!("{}\n", "-".repeat(40)));
            for entry in &self.entries {
                out.push_str(&format!(
                    "{} {}\n",
                    entry.timestamp.format("%H:%M:%S"),
                    entry.format()
                ));
                for (key, value) in &entry.details {
                    out.push_str(&format!("    {}: {}\n", key, value));
                }
            }
        }

        fs::write(path, out).with_context(|| format!("Failed to write log file {}", path.display()))
    }

    fn count(&self, level: LogLevel) -> usize {
        self.entries.iter().filter(|e| e.level == level).count()
    }

    fn print(&self, entry: &LogEntry) {
        let line = entry.format();
        match entry.level {
            LogLevel::Debug => println!("{}", line.dimmed()),
            LogLevel::Info => println!("{}", line),
            LogLevel::Warning => println!("{}", line.yellow()),
            LogLevel::Error => println!("{}", line.red()),
        }
    }
}

impl Default for QuizLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticsSink for QuizLogger {
    fn emit(&mut self, entry: LogEntry) {
        if self.console_output && entry.level >= self.min_level {
            self.print(&entry);
        }
        self.entries.push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_format() {
        let entry = LogEntry::warning("something odd")
            .with_source("parser")
            .with_line(5);
        assert_eq!(entry.format(), "[WARNING] [parser] (line 5) something odd");
    }

    #[test]
    fn test_entry_format_without_source_or_line() {
        let entry = LogEntry::info("plain message");
        assert_eq!(entry.format(), "[INFO] plain message");
    }

    #[test]
    fn test_unknown_tag_entry() {
        let entry = LogEntry::unknown_tag("foo", 12, "some panel content");
        assert_eq!(entry.level, LogLevel::Warning);
        assert_eq!(entry.source, "parser");
        assert_eq!(entry.line_number, Some(12));
        assert_eq!(
            entry.details.get("tag"),
            Some(&serde_json::Value::String("foo".to_string()))
        );
        assert!(entry.message.contains("::: foo"));
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let long = "α".repeat(200);
        let entry = LogEntry::unknown_tag("foo", 1, &long);
        let preview = entry.details.get("content_preview").unwrap();
        assert_eq!(preview.as_str().unwrap().chars().count(), 100);
    }

    #[test]
    fn test_logger_counts_and_summary() {
        let mut logger = QuizLogger::new().quiet();
        logger.info("start");
        logger.warning("warn one");
        logger.warning("warn two");
        logger.error("boom");

        assert_eq!(logger.warning_count(), 2);
        assert_eq!(logger.error_count(), 1);

        let summary = logger.summary();
        assert_eq!(summary.total_entries, 4);
        assert_eq!(summary.infos, 1);
        assert!(summary.has_errors);
    }

    #[test]
    fn test_level_ordering_and_parse() {
        assert!(LogLevel::Error > LogLevel::Warning);
        assert!(LogLevel::Warning > LogLevel::Info);
        assert_eq!("WARNING".parse::<LogLevel>().unwrap(), LogLevel::Warning);
        assert!("verbose".parse::<LogLevel>().is_err());
    }
}
