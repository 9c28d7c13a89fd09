//! Panel Content Decoder
//!
//! Turns the raw text inside a `::: tag ::: ... :::` block into a typed
//! content record. Caller-registered decoders take precedence over the
//! built-ins for their exact tag name; a tag nobody recognizes is logged as
//! a warning and preserved as an opaque raw panel so downstream rendering
//! can still display something.

use anyhow::{Context, Result};
use regex::Regex;
use std::collections::HashMap;

use crate::diagnostics::{DiagnosticsSink, LogEntry};
use crate::models::{
    BlankEntry, BookPanel, EmbedPanel, ExploreLink, HelperPanel, ImagePanel, ItemEntry,
    MatchEntry, PanelContent, VideoPanel,
};

/// Decoder for one panel tag
///
/// Implemented by the built-in decoders and by caller-supplied variants;
/// any `Fn(&str) -> PanelContent` closure qualifies.
pub trait TagDecoder {
    fn decode(&self, content: &str) -> PanelContent;
}

impl<F> TagDecoder for F
where
    F: Fn(&str) -> PanelContent,
{
    fn decode(&self, content: &str) -> PanelContent {
        self(content)
    }
}

/// A located `::: tag ::: ... :::` occurrence inside a question block
#[derive(Debug, Clone)]
pub(crate) struct PanelSpan {
    pub tag: String,
    pub content: String,
    pub start: usize,
    pub end: usize,
}

/// Locate every panel block, in appearance order
pub(crate) fn find_panels(block: &str) -> Result<Vec<PanelSpan>> {
    let re = Regex::new(r":::\s*(\w+)\s*\n((?s).*?)\n:::")
        .context("Failed to compile panel regex")?;

    let mut spans = Vec::new();
    for caps in re.captures_iter(block) {
        let full = caps.get(0).context("panel match without span")?;
        let tag = caps
            .get(1)
            .map(|g| g.as_str().to_lowercase())
            .unwrap_or_default();
        let content = caps
            .get(2)
            .map(|g| g.as_str().trim().to_string())
            .unwrap_or_default();

        spans.push(PanelSpan {
            tag,
            content,
            start: full.start(),
            end: full.end(),
        });
    }

    Ok(spans)
}

/// Decode one panel, resolving custom decoders before built-ins
pub(crate) fn decode_panel(
    decoders: &HashMap<String, Box<dyn TagDecoder>>,
    tag: &str,
    content: &str,
    line: usize,
    sink: &mut dyn DiagnosticsSink,
) -> Result<HelperPanel> {
    if let Some(decoder) = decoders.get(tag) {
        return Ok(HelperPanel::new(tag, decoder.decode(content)));
    }

    if let Some(decoded) = builtin_decode(tag, content)? {
        return Ok(HelperPanel::new(tag, decoded));
    }

    sink.emit(LogEntry::unknown_tag(tag, line, content));
    Ok(HelperPanel::new(
        "raw",
        PanelContent::Raw {
            original_tag: tag.to_string(),
            html: content.to_string(),
        },
    ))
}

fn builtin_decode(tag: &str, content: &str) -> Result<Option<PanelContent>> {
    let decoded = match tag {
        "theory" | "hint" | "explanation" | "feedback_positive" | "feedback_negative"
        | "sample_answer" => Some(PanelContent::Text {
            text: content.trim().to_string(),
        }),
        "image" => Some(PanelContent::Image(decode_image(content))),
        "video" => Some(PanelContent::Video(decode_video(content))),
        "embed" => Some(PanelContent::Embed(decode_embed(content))),
        "explore" => Some(PanelContent::Explore {
            links: decode_explore(content)?,
        }),
        "book" => Some(PanelContent::Book(decode_book(content))),
        "matches" => Some(PanelContent::Matches {
            pairs: decode_matches(content),
        }),
        "items" => Some(PanelContent::Items {
            items: decode_items(content)?,
        }),
        "blanks" => Some(PanelContent::Blanks {
            blanks: decode_blanks(content),
        }),
        "correct_order" => Some(PanelContent::CorrectOrder {
            order: decode_correct_order(content),
        }),
        _ => None,
    };

    Ok(decoded)
}

/// Split a line into a lowercased key and a trimmed value
fn key_value(line: &str) -> Option<(String, &str)> {
    let (key, value) = line.split_once(':')?;
    Some((key.trim().to_lowercase(), value.trim()))
}

fn decode_image(content: &str) -> ImagePanel {
    let mut panel = ImagePanel::default();
    for line in content.lines() {
        if let Some((key, value)) = key_value(line) {
            match key.as_str() {
                "url" => panel.url = value.to_string(),
                "alt" => panel.alt = value.to_string(),
                "caption" => panel.caption = value.to_string(),
                "width" => panel.width = value.to_string(),
                _ => {}
            }
        }
    }
    panel
}

fn decode_video(content: &str) -> VideoPanel {
    let mut panel = VideoPanel::default();
    for line in content.lines() {
        if let Some((key, value)) = key_value(line) {
            match key.as_str() {
                "url" => panel.url = value.to_string(),
                "title" => panel.title = value.to_string(),
                "width" => panel.width = value.to_string(),
                "height" => panel.height = value.to_string(),
                _ => {}
            }
        }
    }
    panel
}

fn decode_embed(content: &str) -> EmbedPanel {
    let mut panel = EmbedPanel::default();
    for line in content.lines() {
        if let Some((key, value)) = key_value(line) {
            match key.as_str() {
                "url" => panel.url = value.to_string(),
                "title" => panel.title = value.to_string(),
                "width" => panel.width = value.to_string(),
                "height" => panel.height = value.to_string(),
                _ => {}
            }
        }
    }
    panel
}

/// Parse explore links: `- [text](url)` or `- label: http...`
fn decode_explore(content: &str) -> Result<Vec<ExploreLink>> {
    let md_link = Regex::new(r"^\[([^\]]+)\]\(([^)]+)\)")
        .context("Failed to compile markdown link regex")?;
    let mut links = Vec::new();

    for line in content.lines() {
        let line = line.trim();
        let Some(rest) = line.strip_prefix('-') else {
            continue;
        };
        let rest = rest.trim();

        if let Some(caps) = md_link.captures(rest) {
            links.push(ExploreLink {
                text: caps[1].to_string(),
                url: caps[2].to_string(),
            });
            continue;
        }

        if let Some((label, value)) = rest.split_once(':') {
            let value = value.trim();
            if value.starts_with("http") {
                links.push(ExploreLink {
                    text: label.trim().to_string(),
                    url: value.to_string(),
                });
            }
        }
    }

    Ok(links)
}

fn decode_book(content: &str) -> BookPanel {
    let mut panel = BookPanel::default();
    for line in content.lines() {
        if let Some((key, value)) = key_value(line) {
            match key.as_str() {
                "title" => panel.title = value.to_string(),
                "chapter" => panel.chapter = value.to_string(),
                "section" => panel.section = value.to_string(),
                "pages" => panel.pages = value.to_string(),
                _ => {}
            }
        }
    }

    // Leading integer run of the pages field, e.g. "142-150" -> 142
    let digits: String = panel.pages.chars().take_while(|c| c.is_ascii_digit()).collect();
    panel.start_page = digits.parse().unwrap_or(0);

    panel
}

fn decode_matches(content: &str) -> Vec<MatchEntry> {
    let mut pairs = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.starts_with('#') {
            continue;
        }
        if let Some((item, value)) = line.split_once(':') {
            pairs.push(MatchEntry {
                item: item.trim().to_string(),
                value: value.trim().to_string(),
            });
        }
    }
    pairs
}

/// Parse ordering items: `<n>. text` keeps the explicit number, `- text`
/// takes the next sequential position
fn decode_items(content: &str) -> Result<Vec<ItemEntry>> {
    let re = Regex::new(r"^(?:(\d+)\.\s*|-\s*)(.+)$")
        .context("Failed to compile item regex")?;

    let mut items = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if let Some(caps) = re.captures(line) {
            let position = caps
                .get(1)
                .and_then(|g| g.as_str().parse::<u32>().ok())
                .unwrap_or(items.len() as u32 + 1);
            items.push(ItemEntry {
                position,
                text: caps[2].trim().to_string(),
            });
        }
    }

    Ok(items)
}

fn decode_blanks(content: &str) -> Vec<BlankEntry> {
    let mut blanks = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if let Some((id, answers)) = line.split_once(':') {
            blanks.push(BlankEntry {
                id: id.trim().to_string(),
                answers: answers.trim().to_string(),
            });
        }
    }
    blanks
}

/// Comma-separated when a comma is present, otherwise one entry per line
fn decode_correct_order(content: &str) -> Vec<String> {
    let parts: Vec<&str> = if content.contains(',') {
        content.split(',').collect()
    } else {
        content.lines().collect()
    };

    parts
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}
