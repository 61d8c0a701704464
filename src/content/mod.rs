//! Static teaching content: the glossary, the playground wallets and the
//! guided tour with its quiz

pub mod glossary;
pub mod scenarios;
pub mod tour;

pub use glossary::{auto_link, glossary, glossary_entry, search_glossary, GlossaryEntry, Segment};
pub use scenarios::{find_scenario, scenarios, Scenario};
pub use tour::{
    chapters, find_chapter, grade_quiz, parse_answers, quiz_questions, Chapter, QuizQuestion,
    QuizResult, Tour,
};
