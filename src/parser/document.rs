//! Document Splitter
//!
//! Scans the document line by line, recognizing section headers
//! (`# Section` / `# Ενότητα`) and question headers
//! (`## Question` / `## Ερώτηση`), both case-insensitive. Lines accumulate
//! into the current block; each boundary closes the previous block through
//! the question block parser. The accumulator is an explicit state machine:
//! outside any block, inside section preamble, or inside a question.

use anyhow::{Context, Result};
use regex::Regex;
use std::collections::HashMap;

use crate::diagnostics::DiagnosticsSink;
use crate::models::{Question, Section};
use crate::parser::panels::TagDecoder;
use crate::parser::question::parse_question_block;

/// What the accumulation buffer currently holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    None,
    Section,
    Question,
}

/// Split a document body into sections and the flat question list
///
/// Ordinals are assigned strictly by discovery order, starting at 1. Every
/// question is appended to the flat list and, when a section is open, to
/// that section as well. Non-header lines before the first question are
/// section chrome and are discarded.
pub(crate) fn split_document(
    decoders: &HashMap<String, Box<dyn TagDecoder>>,
    markdown: &str,
    sink: &mut dyn DiagnosticsSink,
) -> Result<(Vec<Section>, Vec<Question>)> {
    let section_re = Regex::new(r"(?i)^#\s+(?:Ενότητα|Section|ΕΝΟΤΗΤΑ)")
        .context("Failed to compile section header regex")?;
    let question_re = Regex::new(r"(?i)^##\s+(?:Ερώτηση|Question|ΕΡΩΤΗΣΗ)")
        .context("Failed to compile question header regex")?;

    let mut sections: Vec<Section> = Vec::new();
    let mut all_questions: Vec<Question> = Vec::new();
    let mut current_section: Option<usize> = None;

    let mut buffer: Vec<&str> = Vec::new();
    let mut kind = BlockKind::None;
    let mut question_number: u32 = 0;
    let mut line_start: usize = 0;

    for (i, line) in markdown.lines().enumerate() {
        if section_re.is_match(line) {
            close_question(
                decoders,
                &mut buffer,
                kind,
                &mut question_number,
                line_start,
                &mut sections,
                current_section,
                &mut all_questions,
                sink,
            )?;

            let title_re =
                Regex::new(r"^#\s+").context("Failed to compile title strip regex")?;
            let title = title_re.replace(line, "").trim().to_string();
            sections.push(Section::new(sections.len() + 1, title));
            current_section = Some(sections.len() - 1);

            buffer.clear();
            kind = BlockKind::Section;
            line_start = i + 1;
        } else if question_re.is_match(line) {
            close_question(
                decoders,
                &mut buffer,
                kind,
                &mut question_number,
                line_start,
                &mut sections,
                current_section,
                &mut all_questions,
                sink,
            )?;

            buffer.clear();
            buffer.push(line);
            kind = BlockKind::Question;
            line_start = i + 1;
        } else if kind == BlockKind::Question {
            buffer.push(line);
        }
    }

    // The last question has no boundary after it
    close_question(
        decoders,
        &mut buffer,
        kind,
        &mut question_number,
        line_start,
        &mut sections,
        current_section,
        &mut all_questions,
        sink,
    )?;

    Ok((sections, all_questions))
}

/// Close an open question buffer, appending the parsed question to the flat
/// list and to the open section, if any
#[allow(clippy::too_many_arguments)]
fn close_question(
    decoders: &HashMap<String, Box<dyn TagDecoder>>,
    buffer: &mut Vec<&str>,
    kind: BlockKind,
    question_number: &mut u32,
    line_start: usize,
    sections: &mut [Section],
    current_section: Option<usize>,
    all_questions: &mut Vec<Question>,
    sink: &mut dyn DiagnosticsSink,
) -> Result<()> {
    if kind != BlockKind::Question || buffer.is_empty() {
        return Ok(());
    }

    *question_number += 1;
    let block = buffer.join("\n");
    let question = parse_question_block(decoders, &block, *question_number, line_start, sink)?;

    if let Some(index) = current_section {
        sections[index].questions.push(question.clone());
    }
    all_questions.push(question);
    buffer.clear();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::QuizLogger;

    fn split(markdown: &str) -> (Vec<Section>, Vec<Question>) {
        let mut logger = QuizLogger::new().quiet();
        split_document(&HashMap::new(), markdown, &mut logger).unwrap()
    }

    #[test]
    fn test_sections_and_questions() {
        let doc = "\
# Section Basics

Intro chrome that is discarded.

## Question 1
- [x] yes
- [ ] no

## Question 2
- [ ] yes
- [x] no

# Ενότητα Προχωρημένα

## Ερώτηση 3
- [x] ναι
";
        let (sections, questions) = split(doc);

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].id, "section_1");
        assert_eq!(sections[0].title, "Section Basics");
        assert_eq!(sections[1].id, "section_2");
        assert_eq!(sections[1].title, "Ενότητα Προχωρημένα");

        assert_eq!(questions.len(), 3);
        assert_eq!(sections[0].questions.len(), 2);
        assert_eq!(sections[1].questions.len(), 1);

        // Ordinals follow discovery order
        assert_eq!(questions[0].id, "q1");
        assert_eq!(questions[0].number, 1);
        assert_eq!(questions[2].id, "q3");
    }

    #[test]
    fn test_flat_list_matches_section_sum() {
        let doc = "# Section A\n## Question\n- [x] a\n## Question\n- [x] b\n";
        let (sections, questions) = split(doc);
        let section_total: usize = sections.iter().map(|s| s.questions.len()).sum();
        assert_eq!(questions.len(), section_total);
    }

    #[test]
    fn test_document_without_sections() {
        let doc = "## Question\n- [x] a\n\n## Question\n- [ ] b\n- [x] c\n";
        let (sections, questions) = split(doc);
        assert!(sections.is_empty());
        assert_eq!(questions.len(), 2);
    }

    #[test]
    fn test_preamble_lines_are_discarded() {
        let doc = "Stray intro text\n\n## Question\nReal question\n- [x] a\n";
        let (_, questions) = split(doc);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].text, "Real question");
    }

    #[test]
    fn test_question_header_is_not_a_section_header() {
        // "## Question" must not match the single-# section pattern
        let doc = "## Question\n- [x] a\n";
        let (sections, questions) = split(doc);
        assert!(sections.is_empty());
        assert_eq!(questions.len(), 1);
    }

    #[test]
    fn test_plain_headings_are_not_boundaries() {
        let doc = "# Overview\n## Question\nQ text\n- [x] a\n# Notes\nmore\n";
        let (sections, questions) = split(doc);
        // "# Overview" and "# Notes" carry no section keyword
        assert!(sections.is_empty());
        assert_eq!(questions.len(), 1);
    }

    #[test]
    fn test_provenance_line_numbers() {
        let doc = "# Section A\n\n## Question\n::: mystery\nx\n:::\n";
        let mut logger = QuizLogger::new().quiet();
        split_document(&HashMap::new(), doc, &mut logger).unwrap();

        assert_eq!(logger.warning_count(), 1);
        // The question header is on line 3
        assert_eq!(logger.get_warnings()[0].line_number, Some(3));
    }

    #[test]
    fn test_case_insensitive_headers() {
        let doc = "# SECTION loud\n## QUESTION\n- [x] a\n";
        let (sections, questions) = split(doc);
        assert_eq!(sections.len(), 1);
        assert_eq!(questions.len(), 1);
    }
}
