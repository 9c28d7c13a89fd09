use serde::{Deserialize, Serialize};

/// A single answer option of a choice question
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Answer {
    /// Positional identifier ("A", "B", "C", ...)
    pub id: String,

    /// Answer text as written in the document
    pub text: String,

    /// Whether this option is marked correct
    pub is_correct: bool,

    /// Optional per-answer feedback
    pub feedback: String,
}

impl Answer {
    pub fn new(id: impl Into<String>, text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            is_correct,
            feedback: String::new(),
        }
    }
}

/// One pair of a matching question
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchingPair {
    /// Identifier assigned by appearance order ("item1", "item2", ...)
    pub item_id: String,

    /// Prompt side of the pair
    pub item_text: String,

    /// Target value the item must be matched to
    pub match_value: String,
}

/// One element of an ordering question
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderingItem {
    /// Identifier derived from the correct position ("step1", "step2", ...)
    pub id: String,

    /// Prompt text of the element
    pub text: String,

    /// 1-based correct position
    pub correct_position: u32,
}

/// One blank of a fill-in-the-blank question
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FillBlank {
    /// Identifier ("blank" + the raw id declared in the blanks panel)
    pub blank_id: String,

    /// Acceptable answers; matching any one suffices
    pub correct_answers: Vec<String>,
}
