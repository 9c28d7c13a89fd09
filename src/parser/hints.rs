//! Question type inference from hint strings
//!
//! The same bilingual table serves parenthesized header hints
//! (`## Question (multiple)`) and explicit `type:` declarations. Keys are
//! matched by substring containment against the lowercased hint; the first
//! matching key wins and an unmatched hint defaults to single choice.

use crate::models::QuestionType;

const TYPE_HINTS: &[(&str, QuestionType)] = &[
    ("single", QuestionType::Single),
    ("μίας επιλογής", QuestionType::Single),
    ("μιας επιλογης", QuestionType::Single),
    ("multiple", QuestionType::Multiple),
    ("πολλαπλής", QuestionType::Multiple),
    ("πολλαπλης", QuestionType::Multiple),
    ("truefalse", QuestionType::TrueFalse),
    ("true/false", QuestionType::TrueFalse),
    ("σωστό/λάθος", QuestionType::TrueFalse),
    ("σωστο/λαθος", QuestionType::TrueFalse),
    ("matching", QuestionType::Matching),
    ("αντιστοίχιση", QuestionType::Matching),
    ("αντιστοιχιση", QuestionType::Matching),
    ("ordering", QuestionType::Ordering),
    ("ταξινόμηση", QuestionType::Ordering),
    ("ταξινομηση", QuestionType::Ordering),
    ("fillblank", QuestionType::FillBlank),
    ("fill-blank", QuestionType::FillBlank),
    ("συμπλήρωση", QuestionType::FillBlank),
    ("συμπληρωση", QuestionType::FillBlank),
    ("shortanswer", QuestionType::ShortAnswer),
    ("short-answer", QuestionType::ShortAnswer),
    ("σύντομη", QuestionType::ShortAnswer),
    ("συντομη", QuestionType::ShortAnswer),
    ("ανοικτή", QuestionType::ShortAnswer),
    ("ανοικτη", QuestionType::ShortAnswer),
];

/// Resolve a hint string to a question type
pub fn detect_type_from_hint(hint: &str) -> QuestionType {
    let hint = hint.to_lowercase();
    let hint = hint.trim();

    for (key, question_type) in TYPE_HINTS {
        if hint.contains(key) {
            return *question_type;
        }
    }

    QuestionType::Single
}
