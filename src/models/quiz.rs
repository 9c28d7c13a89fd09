use serde::{Deserialize, Serialize};

use super::question::Question;

/// A titled group of questions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Section {
    /// Stable identifier ("section_1", "section_2", ...)
    pub id: String,

    /// Header text with the leading markers stripped
    pub title: String,

    /// Questions of this section, in document order
    pub questions: Vec<Question>,
}

impl Section {
    pub fn new(ordinal: usize, title: impl Into<String>) -> Self {
        Self {
            id: format!("section_{}", ordinal),
            title: title.into(),
            questions: Vec::new(),
        }
    }
}

/// A fully parsed quiz
///
/// `questions` is the flat list of every question in document order; each
/// question also appears in the section that was open when it was parsed.
/// Questions preceding the first section header appear only in the flat list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ParsedQuiz {
    pub sections: Vec<Section>,
    pub questions: Vec<Question>,

    /// Sum of all question point values, in appearance order
    pub total_points: f64,

    /// The `quiz` section of the merged configuration
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl ParsedQuiz {
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}
