// Question file parser

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::answers::MAX_OPTIONS;
use super::QuizError;

const ANSWER_PREFIXES: [&str; 2] = ["Ответ:", "Answer:"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub text: String,
    pub options: Vec<String>,
    /// Text of the correct option
    pub answer: String,
}

impl Question {
    pub fn is_correct(&self, option: &str) -> bool {
        self.answer == option
    }
}

/// Question being assembled while its option lines are read
struct Pending {
    text: String,
    options: Vec<String>,
}

/// Parse every complete question from `reader`
///
/// A question without an answer line at the end of input is dropped.
pub fn parse_questions<R: BufRead>(reader: R) -> Result<Vec<Question>, QuizError> {
    let mut questions = Vec::new();
    let mut pending: Option<Pending> = None;

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line?;
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        if line.ends_with('?') {
            if let Some(unfinished) = pending.take() {
                tracing::warn!(line = line_no, question = %unfinished.text, "Question has no answer line, skipped");
            }
            pending = Some(Pending {
                text: strip_number(line).to_string(),
                options: Vec::new(),
            });
        } else if let Some(option) = option_text(line) {
            let current = pending
                .as_mut()
                .ok_or(QuizError::MissingQuestion { line: line_no })?;
            current.options.push(option.to_string());
        } else if let Some(value) = answer_value(line) {
            let current = pending
                .take()
                .ok_or(QuizError::MissingQuestion { line: line_no })?;
            let answer: usize = value.parse().map_err(|_| QuizError::InvalidAnswer {
                line: line_no,
                value: value.to_string(),
            })?;

            if answer == 0 || answer > current.options.len() {
                return Err(QuizError::AnswerOutOfRange {
                    line: line_no,
                    answer,
                    options: current.options.len(),
                });
            }

            questions.push(Question {
                answer: current.options[answer - 1].clone(),
                text: current.text,
                options: current.options,
            });
        } else {
            tracing::debug!(line = line_no, "Ignoring unrecognized line");
        }
    }

    if let Some(unfinished) = pending {
        tracing::warn!(question = %unfinished.text, "Last question has no answer line, skipped");
    }

    Ok(questions)
}

pub fn parse_str(content: &str) -> Result<Vec<Question>, QuizError> {
    parse_questions(content.as_bytes())
}

/// Open and parse a question file
pub fn load_questions(path: &Path) -> Result<Vec<Question>> {
    let file = File::open(path).with_context(|| format!("File not found: {}", path.display()))?;
    let questions = parse_questions(BufReader::new(file))
        .with_context(|| format!("Failed to parse question file: {}", path.display()))?;

    tracing::info!(path = %path.display(), count = questions.len(), "Questions loaded");
    Ok(questions)
}

/// "12. Text" -> "Text"; lines without a number prefix are kept whole
fn strip_number(line: &str) -> &str {
    match line.split_once(". ") {
        Some((number, rest)) if !number.is_empty() && number.chars().all(|c| c.is_ascii_digit()) => rest.trim(),
        _ => line,
    }
}

/// "3. Text" with a leading digit 1-5
fn option_text(line: &str) -> Option<&str> {
    let (number, rest) = line.split_once(". ")?;
    let n: usize = number.parse().ok()?;
    (1..=MAX_OPTIONS).contains(&n).then(|| rest.trim())
}

fn answer_value(line: &str) -> Option<&str> {
    ANSWER_PREFIXES
        .iter()
        .find_map(|prefix| line.strip_prefix(*prefix))
        .map(str::trim)
}
