//! Question Block Parser
//!
//! Turns one raw question block (header line included) into a populated
//! [`Question`]. Each step consumes its matched text out of the working
//! block before the next step runs, so later steps never re-match spans
//! that were already extracted:
//!
//! 1. header line and parenthesized type hint
//! 2. `points:` metadata line
//! 3. `type:` declaration (wins over the header hint)
//! 4. `::: tag :::` panels
//! 5. fenced code blocks, replaced by `[[CODE_BLOCK_<n>]]` sentinels
//! 6. type-specific answer extraction
//! 7. residual prose text

use anyhow::{Context, Result};
use regex::Regex;
use std::collections::HashMap;

use crate::diagnostics::DiagnosticsSink;
use crate::models::{
    Answer, CodeBlock, FillBlank, HelperPanel, MatchingPair, OrderingItem, PanelContent,
    Question, QuestionBody, QuestionType,
};
use crate::parser::hints::detect_type_from_hint;
use crate::parser::panels::{decode_panel, find_panels, TagDecoder};

/// Parse one question block into a [`Question`]
///
/// # Arguments
/// * `decoders` - Caller-registered panel decoders
/// * `block` - The raw block, starting with its `## Question` header line
/// * `number` - 1-based question ordinal
/// * `line_start` - 1-based line number of the block in the source document
/// * `sink` - Diagnostics receiver
pub(crate) fn parse_question_block(
    decoders: &HashMap<String, Box<dyn TagDecoder>>,
    block: &str,
    number: u32,
    line_start: usize,
    sink: &mut dyn DiagnosticsSink,
) -> Result<Question> {
    let mut question = Question::new(number);
    let mut block = block.to_string();

    // Step 1: header and parenthesized type hint
    let header_re = Regex::new(r"(?i)^##\s+(?:Ερώτηση|Question|ΕΡΩΤΗΣΗ)[^\n]*")
        .context("Failed to compile question header regex")?;
    if let Some(m) = header_re.find(&block) {
        let header = m.as_str().to_string();
        let hint_re = Regex::new(r"\(([^)]+)\)").context("Failed to compile hint regex")?;
        if let Some(caps) = hint_re.captures(&header) {
            question.question_type = detect_type_from_hint(&caps[1]);
        }
        block = block[m.end()..].trim().to_string();
    }

    // Step 2: points value; a line that does not parse is left alone
    let points_re = Regex::new(r"(?mi)^points:\s*(\d+(?:\.\d+)?)")
        .context("Failed to compile points regex")?;
    let mut points_span = None;
    if let Some(caps) = points_re.captures(&block) {
        if let (Some(m), Ok(points)) = (caps.get(0), caps[1].parse::<f64>()) {
            points_span = Some((points, m.start(), m.end()));
        }
    }
    if let Some((points, start, end)) = points_span {
        question.points = points;
        block.replace_range(start..end, "");
    }

    // Step 3: explicit type declaration overrides the header hint
    let type_re =
        Regex::new(r"(?mi)^type:\s*(\w+)").context("Failed to compile type regex")?;
    let mut type_span = None;
    if let Some(caps) = type_re.captures(&block) {
        if let Some(m) = caps.get(0) {
            type_span = Some((detect_type_from_hint(&caps[1]), m.start(), m.end()));
        }
    }
    if let Some((question_type, start, end)) = type_span {
        question.question_type = question_type;
        block.replace_range(start..end, "");
    }

    // Step 4: panels, removed back-to-front so earlier spans stay valid
    let spans = find_panels(&block)?;
    for span in &spans {
        let panel = decode_panel(decoders, &span.tag, &span.content, line_start, sink)?;
        mirror_panel(&mut question, &panel);
        question.panels.push(panel);
    }
    for span in spans.iter().rev() {
        block.replace_range(span.start..span.end, "");
    }

    // Step 5: code fences out, sentinels in
    block = extract_code_blocks(&block, &mut question.code_blocks)?;

    // Step 6: type-specific payload
    question.body = match question.question_type {
        QuestionType::Single | QuestionType::Multiple | QuestionType::TrueFalse => {
            let (answers, correct_answer, checked) = extract_choice_answers(&block)?;
            if checked > 1 {
                // Two or more checked answers: this is multiple choice no
                // matter what the document declared
                question.question_type = QuestionType::Multiple;
            }
            QuestionBody::Choice {
                answers,
                correct_answer,
            }
        }
        QuestionType::Matching => extract_matching(&question.panels),
        QuestionType::Ordering => extract_ordering(&question.panels),
        QuestionType::FillBlank => extract_fillblank(&question.panels, &question.code_blocks),
        QuestionType::ShortAnswer => extract_short_answer(&question.panels),
    };

    // Step 7: whatever is left is the prose text
    question.text = extract_question_text(&block)?;

    Ok(question)
}

/// Mirror media payloads and feedback text onto the question's
/// dedicated fields
fn mirror_panel(question: &mut Question, panel: &HelperPanel) {
    match &panel.content {
        PanelContent::Image(image) => question.images.push(image.clone()),
        PanelContent::Video(video) => question.videos.push(video.clone()),
        PanelContent::Embed(embed) => question.embeds.push(embed.clone()),
        PanelContent::Text { text } => match panel.panel_type.as_str() {
            "explanation" if question.explanation.is_empty() => {
                question.explanation = text.clone();
            }
            "feedback_positive" if question.feedback_positive.is_empty() => {
                question.feedback_positive = text.clone();
            }
            "feedback_negative" if question.feedback_negative.is_empty() => {
                question.feedback_negative = text.clone();
            }
            _ => {}
        },
        _ => {}
    }
}

/// Extract fenced code blocks, replacing each with a numbered sentinel
fn extract_code_blocks(block: &str, code_blocks: &mut Vec<CodeBlock>) -> Result<String> {
    let fence_re =
        Regex::new(r"(?s)```(\w*)\n(.*?)\n```").context("Failed to compile fence regex")?;

    let mut rebuilt = String::with_capacity(block.len());
    let mut last = 0;

    for caps in fence_re.captures_iter(block) {
        let Some(full) = caps.get(0) else { continue };
        let language = match caps.get(1) {
            Some(g) if !g.as_str().is_empty() => g.as_str().to_string(),
            _ => "text".to_string(),
        };
        let code = caps.get(2).map(|g| g.as_str()).unwrap_or("").to_string();

        rebuilt.push_str(&block[last..full.start()]);
        rebuilt.push_str(&format!("[[CODE_BLOCK_{}]]", code_blocks.len()));
        code_blocks.push(CodeBlock { language, code });
        last = full.end();
    }

    rebuilt.push_str(&block[last..]);
    Ok(rebuilt)
}

/// Extract `- [ ]` / `- [x]` answer options in appearance order
///
/// Each option's text runs until the next option marker, a blank line, a
/// panel marker, or the end of the block. Returns the answers, the
/// comma-joined ids of the checked ones, and the checked count.
fn extract_choice_answers(block: &str) -> Result<(Vec<Answer>, String, usize)> {
    let marker_re =
        Regex::new(r"-\s*\[([xX ])\]\s*").context("Failed to compile answer marker regex")?;
    let next_marker_re =
        Regex::new(r"\n-\s*\[").context("Failed to compile answer terminator regex")?;

    let mut answers: Vec<Answer> = Vec::new();
    let mut correct: Vec<String> = Vec::new();
    let mut pos = 0;

    while let Some(caps) = marker_re.captures(&block[pos..]) {
        let (marker_end, checked) = match (caps.get(0), caps.get(1)) {
            (Some(m), Some(c)) => (m.end(), c.as_str().eq_ignore_ascii_case("x")),
            _ => break,
        };

        let text_start = pos + marker_end;
        let rest = &block[text_start..];

        let mut end = rest.len();
        if let Some(m) = next_marker_re.find(rest) {
            end = end.min(m.start());
        }
        if let Some(i) = rest.find("\n\n") {
            end = end.min(i);
        }
        if let Some(i) = rest.find("\n:::") {
            end = end.min(i);
        }

        if end == 0 {
            // Marker with no text; keep scanning past it
            pos = text_start;
            continue;
        }

        let text = rest[..end].trim();
        let id = char::from_u32('A' as u32 + answers.len() as u32)
            .unwrap_or('?')
            .to_string();
        if checked {
            correct.push(id.clone());
        }
        answers.push(Answer::new(id, text, checked));
        pos = text_start + end;
    }

    let checked_count = correct.len();
    Ok((answers, correct.join(","), checked_count))
}

fn extract_matching(panels: &[HelperPanel]) -> QuestionBody {
    let mut result = Vec::new();

    let pairs = panels.iter().find_map(|p| match &p.content {
        PanelContent::Matches { pairs } => Some(pairs),
        _ => None,
    });

    if let Some(pairs) = pairs {
        for (i, pair) in pairs.iter().enumerate() {
            result.push(MatchingPair {
                item_id: format!("item{}", i + 1),
                item_text: pair.item.clone(),
                match_value: pair.value.clone(),
            });
        }
    }

    QuestionBody::Matching { pairs: result }
}

fn extract_ordering(panels: &[HelperPanel]) -> QuestionBody {
    let mut items = Vec::new();

    let entries = panels.iter().find_map(|p| match &p.content {
        PanelContent::Items { items } => Some(items),
        _ => None,
    });

    if let Some(entries) = entries {
        for entry in entries {
            items.push(OrderingItem {
                id: format!("step{}", entry.position),
                text: entry.text.clone(),
                correct_position: entry.position,
            });
        }
    }

    let mut correct_order = panels
        .iter()
        .find_map(|p| match &p.content {
            PanelContent::CorrectOrder { order } => Some(order.clone()),
            _ => None,
        })
        .unwrap_or_default();

    // No explicit answer key: the declared order is the correct one
    if correct_order.is_empty() && !items.is_empty() {
        correct_order = (1..=items.len()).map(|i| format!("step{}", i)).collect();
    }

    QuestionBody::Ordering {
        items,
        correct_order,
    }
}

fn extract_fillblank(panels: &[HelperPanel], code_blocks: &[CodeBlock]) -> QuestionBody {
    let mut blanks = Vec::new();

    let entries = panels.iter().find_map(|p| match &p.content {
        PanelContent::Blanks { blanks } => Some(blanks),
        _ => None,
    });

    if let Some(entries) = entries {
        for entry in entries {
            blanks.push(FillBlank {
                blank_id: format!("blank{}", entry.id),
                correct_answers: entry.answers.split('|').map(|s| s.to_string()).collect(),
            });
        }
    }

    // The first fence's raw text keeps its [___N___] markers available to
    // the renderer; the sentinel in the prose is dropped like any other
    let text = code_blocks
        .first()
        .map(|c| c.code.clone())
        .unwrap_or_default();

    QuestionBody::FillBlank { blanks, text }
}

fn extract_short_answer(panels: &[HelperPanel]) -> QuestionBody {
    let sample_answer = panels
        .iter()
        .find_map(|p| {
            if p.panel_type == "sample_answer" {
                if let PanelContent::Text { text } = &p.content {
                    return Some(text.clone());
                }
            }
            None
        })
        .unwrap_or_default();

    QuestionBody::ShortAnswer { sample_answer }
}

/// Derive the prose text from the block after all extractions
fn extract_question_text(block: &str) -> Result<String> {
    let answer_re =
        Regex::new(r"-\s*\[[xX ]\].*").context("Failed to compile answer cleanup regex")?;
    let text = answer_re.replace_all(block, "").into_owned();

    let sentinel_re =
        Regex::new(r"\[\[CODE_BLOCK_\d+\]\]").context("Failed to compile sentinel regex")?;
    let text = sentinel_re.replace_all(&text, "").into_owned();

    let meta_re = Regex::new(r"(?mi)^(?:points|type):\s*\S+\s*$")
        .context("Failed to compile metadata cleanup regex")?;
    let text = meta_re.replace_all(&text, "").into_owned();

    let blank_re = Regex::new(r"\n{3,}").context("Failed to compile blank line regex")?;
    let text = blank_re.replace_all(&text, "\n\n").into_owned();

    let text = text.trim();

    // A header that survived (e.g. a second ## line) is not prose
    let header_re = Regex::new(r"^##\s+.*\n").context("Failed to compile header regex")?;
    let text = header_re.replace(text, "").into_owned();

    Ok(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::QuizLogger;

    fn parse(block: &str) -> Question {
        let mut logger = QuizLogger::new().quiet();
        parse_question_block(&HashMap::new(), block, 1, 1, &mut logger).unwrap()
    }

    #[test]
    fn test_single_choice_round_trip() {
        let q = parse("## Question (single)\npoints: 2\n- [ ] wrong\n- [x] right\n");

        assert_eq!(q.question_type, QuestionType::Single);
        assert_eq!(q.points, 2.0);
        assert_eq!(q.answers().len(), 2);
        assert_eq!(q.answers()[0].id, "A");
        assert_eq!(q.answers()[0].text, "wrong");
        assert!(!q.answers()[0].is_correct);
        assert_eq!(q.answers()[1].id, "B");
        assert_eq!(q.answers()[1].text, "right");
        assert!(q.answers()[1].is_correct);
        assert_eq!(q.correct_answer(), "B");
    }

    #[test]
    fn test_ids_follow_appearance_not_correctness() {
        let q = parse("## Question\n- [x] first\n- [ ] second\n- [x] third\n");
        let ids: Vec<&str> = q.answers().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
        assert_eq!(q.correct_answer(), "A,C");
    }

    #[test]
    fn test_multiple_checked_upgrades_declared_single() {
        let q = parse("## Question\ntype: single\n- [x] one\n- [x] two\n");
        assert_eq!(q.question_type, QuestionType::Multiple);
    }

    #[test]
    fn test_type_declaration_wins_over_header_hint() {
        let q = parse("## Question (matching)\ntype: ordering\n");
        assert_eq!(q.question_type, QuestionType::Ordering);
    }

    #[test]
    fn test_default_points_and_type() {
        let q = parse("## Question\nWhat is Rust?\n- [x] a language\n");
        assert_eq!(q.points, 1.0);
        assert_eq!(q.question_type, QuestionType::Single);
        assert_eq!(q.text, "What is Rust?");
    }

    #[test]
    fn test_unparsable_points_line_is_not_points() {
        let q = parse("## Question\npoints: about two\n- [x] yes\n");
        assert_eq!(q.points, 1.0);
        // Two-token value survives into the prose
        assert!(q.text.contains("points: about two"));
    }

    #[test]
    fn test_decimal_points() {
        let q = parse("## Question\npoints: 2.5\n- [x] yes\n");
        assert_eq!(q.points, 2.5);
    }

    #[test]
    fn test_code_fence_extraction_and_sentinel_cleanup() {
        let q = parse("## Question\nRead the code:\n```python\nprint('hi')\n```\n- [x] ok\n");
        assert_eq!(q.code_blocks.len(), 1);
        assert_eq!(q.code_blocks[0].language, "python");
        assert_eq!(q.code_blocks[0].code, "print('hi')");
        assert!(!q.text.contains("CODE_BLOCK"));
        assert!(!q.text.contains("print"));
        assert_eq!(q.text, "Read the code:");
    }

    #[test]
    fn test_fence_without_language_defaults_to_text() {
        let q = parse("## Question\n```\nplain\n```\n- [x] ok\n");
        assert_eq!(q.code_blocks[0].language, "text");
    }

    #[test]
    fn test_matching_from_panel() {
        let q = parse(
            "## Question (matching)\nMatch them.\n::: matches\ncat: mammal\nsnake: reptile\n:::\n",
        );
        let pairs = q.matching_pairs();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].item_id, "item1");
        assert_eq!(pairs[0].item_text, "cat");
        assert_eq!(pairs[0].match_value, "mammal");
        assert_eq!(pairs[1].item_id, "item2");
        assert_eq!(q.text, "Match them.");
    }

    #[test]
    fn test_matching_without_panel_is_empty() {
        let q = parse("## Question (matching)\nNothing to match yet.\n");
        assert!(q.matching_pairs().is_empty());
    }

    #[test]
    fn test_ordering_with_default_order() {
        let q = parse("## Question (ordering)\n::: items\n- boil water\n- add pasta\n- drain\n:::\n");
        assert_eq!(q.ordering_items().len(), 3);
        assert_eq!(q.ordering_items()[0].id, "step1");
        assert_eq!(q.ordering_items()[2].correct_position, 3);
        assert_eq!(q.correct_order(), &["step1", "step2", "step3"]);
    }

    #[test]
    fn test_ordering_with_explicit_order() {
        let q = parse(
            "## Question (ordering)\n::: items\n- a\n- b\n:::\n::: correct_order\nstep2, step1\n:::\n",
        );
        assert_eq!(q.correct_order(), &["step2", "step1"]);
    }

    #[test]
    fn test_fillblank_alternatives_and_code_text() {
        let q = parse(
            "## Question (fillblank)\nComplete:\n```python\nx = [___1___]\n```\n::: blanks\n1: cat|dog\n:::\n",
        );
        let blanks = q.fill_blanks();
        assert_eq!(blanks.len(), 1);
        assert_eq!(blanks[0].blank_id, "blank1");
        assert_eq!(blanks[0].correct_answers, vec!["cat", "dog"]);
        assert_eq!(q.fillblank_text(), "x = [___1___]");
        assert_eq!(q.code_blocks[0].code, "x = [___1___]");
    }

    #[test]
    fn test_short_answer_sample() {
        let q = parse(
            "## Question (short-answer)\nExplain ownership.\n::: sample_answer\nEach value has one owner.\n:::\n",
        );
        assert_eq!(q.sample_answer(), "Each value has one owner.");
    }

    #[test]
    fn test_panels_removed_from_text_and_media_mirrored() {
        let q = parse(
            "## Question\nLook at this.\n::: image\nurl: /a.png\nalt: diagram\n:::\n- [x] fine\n",
        );
        assert_eq!(q.panels.len(), 1);
        assert_eq!(q.images.len(), 1);
        assert_eq!(q.images[0].url, "/a.png");
        assert_eq!(q.text, "Look at this.");
    }

    #[test]
    fn test_feedback_panels_mirrored() {
        let q = parse(
            "## Question\nPick.\n::: explanation\nBecause physics.\n:::\n::: feedback_positive\nWell done\n:::\n- [x] ok\n",
        );
        assert_eq!(q.explanation, "Because physics.");
        assert_eq!(q.feedback_positive, "Well done");
        assert_eq!(q.feedback_negative, "");
        assert_eq!(q.panels.len(), 2);
    }

    #[test]
    fn test_unknown_panel_warns_and_passes_through() {
        let mut logger = QuizLogger::new().quiet();
        let q = parse_question_block(
            &HashMap::new(),
            "## Question\n::: fancy\n<marquee>hi</marquee>\n:::\n- [x] ok\n",
            1,
            4,
            &mut logger,
        )
        .unwrap();

        assert_eq!(logger.warning_count(), 1);
        let warning = &logger.get_warnings()[0];
        assert!(warning.message.contains("fancy"));
        assert_eq!(warning.line_number, Some(4));

        assert_eq!(q.panels.len(), 1);
        assert_eq!(q.panels[0].panel_type, "raw");
        assert_eq!(
            q.panels[0].content,
            PanelContent::Raw {
                original_tag: "fancy".to_string(),
                html: "<marquee>hi</marquee>".to_string()
            }
        );
    }

    #[test]
    fn test_multiline_answer_text() {
        let q = parse("## Question\n- [x] first line\ncontinues here\n- [ ] other\n");
        assert_eq!(q.answers()[0].text, "first line\ncontinues here");
        assert_eq!(q.answers()[1].text, "other");
    }

    #[test]
    fn test_blank_line_collapse_in_text() {
        let q = parse("## Question\nIntro.\n\n\n\n\nStill the question.\n- [x] ok\n");
        assert_eq!(q.text, "Intro.\n\nStill the question.");
    }

    #[test]
    fn test_greek_header() {
        let q = parse("## Ερώτηση (πολλαπλής)\n- [x] α\n- [x] β\n");
        assert_eq!(q.question_type, QuestionType::Multiple);
    }
}
