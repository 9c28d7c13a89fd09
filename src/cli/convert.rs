use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::ConfigLoader;
use crate::diagnostics::{LogLevel, QuizLogger};
use crate::parser::MarkdownParser;
use crate::{Context, Result};

/// Options for the convert run
pub struct ConvertOptions {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub log_level: LogLevel,
    pub log_file: Option<PathBuf>,
    pub no_console_log: bool,
}

/// Parse a quiz markdown file and write the quiz graph as JSON
///
/// Returns the process exit code: 0 when no errors were recorded.
pub fn run_convert(options: &ConvertOptions) -> Result<i32> {
    let content = fs::read_to_string(&options.input)
        .with_context(|| format!("Failed to read input file {}", options.input.display()))?;

    let output_path = resolve_output_path(&options.input, options.output.as_deref());
    let log_path = options
        .log_file
        .clone()
        .unwrap_or_else(|| output_path.with_extension("log"));

    let mut logger = QuizLogger::new().with_level(options.log_level);
    if options.no_console_log {
        logger = logger.quiet();
    }

    let loader = ConfigLoader::new();
    let (config, body) = loader.load(Some(&content), options.config.as_deref(), None)?;

    let metadata = config
        .get("quiz")
        .and_then(|v| v.as_object())
        .cloned()
        .unwrap_or_default();

    let parser = MarkdownParser::new();
    let quiz = parser.parse_with_metadata(&body, metadata, &mut logger)?;

    let json = serde_json::to_string_pretty(&quiz).context("Failed to serialize quiz")?;
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    fs::write(&output_path, json)
        .with_context(|| format!("Failed to write output file {}", output_path.display()))?;

    logger.save_to_file(&log_path)?;

    let summary = logger.summary();
    println!("\n{}", "=".repeat(50));
    println!("{}", "✓ Generation complete!".green().bold());
    println!("  Output: {}", output_path.display());
    println!("  Log: {}", log_path.display());
    println!(
        "  Questions: {}, Total points: {}",
        quiz.questions.len(),
        quiz.total_points
    );
    println!(
        "  Errors: {}, Warnings: {}",
        summary.errors, summary.warnings
    );
    println!("{}\n", "=".repeat(50));

    Ok(if summary.has_errors { 1 } else { 0 })
}

/// Default the output next to the input; a directory output gets the
/// input's file stem
fn resolve_output_path(input: &Path, output: Option<&Path>) -> PathBuf {
    match output {
        Some(path) if path.is_dir() => {
            let stem = input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "quiz".to_string());
            path.join(format!("{}.json", stem))
        }
        Some(path) => path.to_path_buf(),
        None => input.with_extension("json"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_defaults_next_to_input() {
        let path = resolve_output_path(Path::new("quizzes/physics.md"), None);
        assert_eq!(path, Path::new("quizzes/physics.json"));
    }

    #[test]
    fn test_explicit_output_is_kept() {
        let path = resolve_output_path(Path::new("a.md"), Some(Path::new("out/b.json")));
        assert_eq!(path, Path::new("out/b.json"));
    }
}
