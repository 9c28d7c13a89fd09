// Quizmd - Markdown Quiz Parser
// Converts a constrained markdown quiz dialect into a structured quiz graph

pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod models;
pub mod parser;

pub use anyhow::{Context, Result};
pub use colored::Colorize;

// Re-export commonly used types
pub use diagnostics::{DiagnosticsSink, LogEntry, LogLevel, QuizLogger};
pub use models::{ParsedQuiz, Question, QuestionBody, QuestionType, Section};
pub use parser::{MarkdownParser, TagDecoder};
