pub mod answer;
pub mod panel;
pub mod question;
pub mod quiz;

pub use answer::{Answer, FillBlank, MatchingPair, OrderingItem};
pub use panel::{
    BlankEntry, BookPanel, EmbedPanel, ExploreLink, HelperPanel, ImagePanel, ItemEntry,
    MatchEntry, PanelContent, VideoPanel,
};
pub use question::{CodeBlock, Question, QuestionBody, QuestionType};
pub use quiz::{ParsedQuiz, Section};
