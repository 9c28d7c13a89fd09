use serde::{Deserialize, Serialize};

use super::answer::{Answer, FillBlank, MatchingPair, OrderingItem};
use super::panel::{EmbedPanel, HelperPanel, ImagePanel, VideoPanel};

/// Supported question types
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionType {
    #[default]
    #[serde(rename = "single")]
    Single,
    #[serde(rename = "multiple")]
    Multiple,
    #[serde(rename = "truefalse")]
    TrueFalse,
    #[serde(rename = "matching")]
    Matching,
    #[serde(rename = "ordering")]
    Ordering,
    #[serde(rename = "fillblank")]
    FillBlank,
    #[serde(rename = "shortanswer")]
    ShortAnswer,
}

impl QuestionType {
    /// Get display name for the type
    pub fn name(&self) -> &'static str {
        match self {
            QuestionType::Single => "single",
            QuestionType::Multiple => "multiple",
            QuestionType::TrueFalse => "truefalse",
            QuestionType::Matching => "matching",
            QuestionType::Ordering => "ordering",
            QuestionType::FillBlank => "fillblank",
            QuestionType::ShortAnswer => "shortanswer",
        }
    }

    /// Whether the type uses checkbox answer options
    pub fn is_choice(&self) -> bool {
        matches!(
            self,
            QuestionType::Single | QuestionType::Multiple | QuestionType::TrueFalse
        )
    }
}

/// Type-specific payload of a question, keyed by [`QuestionType`]
///
/// Single, multiple and true/false questions all use the `Choice` shape.
/// Cross-type fields (panels, media, code, feedback) live on [`Question`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuestionBody {
    Choice {
        answers: Vec<Answer>,
        /// Comma-joined ids of the checked answers, in appearance order
        correct_answer: String,
    },
    Matching {
        pairs: Vec<MatchingPair>,
    },
    Ordering {
        items: Vec<OrderingItem>,
        correct_order: Vec<String>,
    },
    FillBlank {
        blanks: Vec<FillBlank>,
        /// Raw text of the first code fence, with `[___N___]` markers intact
        text: String,
    },
    ShortAnswer {
        sample_answer: String,
    },
}

impl Default for QuestionBody {
    fn default() -> Self {
        QuestionBody::Choice {
            answers: Vec::new(),
            correct_answer: String::new(),
        }
    }
}

/// An extracted fenced code block
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CodeBlock {
    /// Language tag, "text" when the fence carried none
    pub language: String,
    pub code: String,
}

/// A parsed question
///
/// The type-specific payload is carried in `body`; the accessor methods
/// return empty collections for questions whose type does not use them, so
/// renderers can read every field unconditionally.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Question {
    /// Stable identifier ("q1", "q2", ...)
    pub id: String,

    /// 1-based ordinal in document order
    pub number: u32,

    pub question_type: QuestionType,

    /// Prose text left after all structured parts are extracted
    pub text: String,

    /// Point value, 1.0 unless a `points:` line says otherwise
    pub points: f64,

    pub body: QuestionBody,

    /// Helper panels in appearance order
    pub panels: Vec<HelperPanel>,

    // Media payloads mirrored out of the corresponding panels
    pub images: Vec<ImagePanel>,
    pub videos: Vec<VideoPanel>,
    pub embeds: Vec<EmbedPanel>,

    /// Fenced code blocks in appearance order
    pub code_blocks: Vec<CodeBlock>,

    // Feedback text mirrored out of the corresponding text panels
    pub explanation: String,
    pub feedback_positive: String,
    pub feedback_negative: String,
}

impl Question {
    /// Create an empty question with the default type and point value
    pub fn new(number: u32) -> Self {
        Self {
            id: format!("q{}", number),
            number,
            question_type: QuestionType::default(),
            text: String::new(),
            points: 1.0,
            body: QuestionBody::default(),
            panels: Vec::new(),
            images: Vec::new(),
            videos: Vec::new(),
            embeds: Vec::new(),
            code_blocks: Vec::new(),
            explanation: String::new(),
            feedback_positive: String::new(),
            feedback_negative: String::new(),
        }
    }

    pub fn answers(&self) -> &[Answer] {
        match &self.body {
            QuestionBody::Choice { answers, .. } => answers,
            _ => &[],
        }
    }

    pub fn correct_answer(&self) -> &str {
        match &self.body {
            QuestionBody::Choice { correct_answer, .. } => correct_answer,
            _ => "",
        }
    }

    pub fn matching_pairs(&self) -> &[MatchingPair] {
        match &self.body {
            QuestionBody::Matching { pairs } => pairs,
            _ => &[],
        }
    }

    pub fn ordering_items(&self) -> &[OrderingItem] {
        match &self.body {
            QuestionBody::Ordering { items, .. } => items,
            _ => &[],
        }
    }

    pub fn correct_order(&self) -> &[String] {
        match &self.body {
            QuestionBody::Ordering { correct_order, .. } => correct_order,
            _ => &[],
        }
    }

    pub fn fill_blanks(&self) -> &[FillBlank] {
        match &self.body {
            QuestionBody::FillBlank { blanks, .. } => blanks,
            _ => &[],
        }
    }

    pub fn fillblank_text(&self) -> &str {
        match &self.body {
            QuestionBody::FillBlank { text, .. } => text,
            _ => "",
        }
    }

    pub fn sample_answer(&self) -> &str {
        match &self.body {
            QuestionBody::ShortAnswer { sample_answer } => sample_answer,
            _ => "",
        }
    }
}
