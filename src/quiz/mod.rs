// 🎓 Quiz - multiple-choice tests read from a plain text file
//
// File layout, one item per line:
//
//   1. Which instrument has 88 keys?
//   1. Guitar
//   2. Piano
//   3. Violin
//   Answer: 2
//
// `Ответ: N` is accepted in place of `Answer: N`.

pub mod answers;
pub mod parser;
pub mod session;

pub use answers::resolve_answer;
pub use parser::{load_questions, parse_questions, parse_str, Question};
pub use session::{QuizSession, QuizSummary};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuizError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Option or answer line seen before any question
    #[error("Line {line}: no question to attach to")]
    MissingQuestion { line: usize },

    #[error("Line {line}: answer '{value}' is not a number")]
    InvalidAnswer { line: usize, value: String },

    #[error("Line {line}: answer {answer} is outside 1..={options}")]
    AnswerOutOfRange {
        line: usize,
        answer: usize,
        options: usize,
    },

    /// Requested question count is not a number
    #[error("Invalid number of questions: '{0}'")]
    InvalidCount(String),
}
