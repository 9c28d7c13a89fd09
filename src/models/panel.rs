use serde::{Deserialize, Serialize};

/// A helper panel attached to a question (`::: tag ::: ... :::`)
///
/// `panel_type` is the tag name for every recognized tag; unrecognized tags
/// are recorded with `panel_type` "raw" and a [`PanelContent::Raw`] payload
/// that preserves the original tag and inner text for passthrough rendering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HelperPanel {
    pub panel_type: String,
    pub content: PanelContent,
}

impl HelperPanel {
    pub fn new(panel_type: impl Into<String>, content: PanelContent) -> Self {
        Self {
            panel_type: panel_type.into(),
            content,
        }
    }
}

/// Decoded payload of a helper panel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PanelContent {
    /// theory / hint / explanation / feedback / sample_answer
    Text { text: String },
    Image(ImagePanel),
    Video(VideoPanel),
    Embed(EmbedPanel),
    Explore { links: Vec<ExploreLink> },
    Book(BookPanel),
    /// Raw pairs of a `matches` panel, before item ids are assigned
    Matches { pairs: Vec<MatchEntry> },
    /// Raw entries of an `items` panel
    Items { items: Vec<ItemEntry> },
    /// Raw entries of a `blanks` panel, answers still pipe-delimited
    Blanks { blanks: Vec<BlankEntry> },
    CorrectOrder { order: Vec<String> },
    /// Unknown tag: opaque passthrough of the inner text
    Raw { original_tag: String, html: String },
    /// Output of a caller-registered decoder
    Custom(serde_json::Map<String, serde_json::Value>),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ImagePanel {
    pub url: String,
    pub alt: String,
    pub caption: String,
    pub width: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoPanel {
    pub url: String,
    pub title: String,
    pub width: String,
    pub height: String,
}

impl Default for VideoPanel {
    fn default() -> Self {
        Self {
            url: String::new(),
            title: String::new(),
            width: "560".to_string(),
            height: "315".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbedPanel {
    pub url: String,
    pub title: String,
    pub width: String,
    pub height: String,
}

impl Default for EmbedPanel {
    fn default() -> Self {
        Self {
            url: String::new(),
            title: String::new(),
            width: "100%".to_string(),
            height: "400".to_string(),
        }
    }
}

/// One link of an `explore` panel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExploreLink {
    pub text: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BookPanel {
    pub title: String,
    pub chapter: String,
    pub section: String,
    pub pages: String,
    /// Leading integer run of `pages`, 0 if none
    pub start_page: u32,
}

/// One `item: value` pair of a `matches` panel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchEntry {
    pub item: String,
    pub value: String,
}

/// One entry of an `items` panel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemEntry {
    pub position: u32,
    pub text: String,
}

/// One `id: answers` entry of a `blanks` panel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BlankEntry {
    pub id: String,
    pub answers: String,
}
