// Interactive quiz run

use chrono::{DateTime, Local};
use rand::seq::SliceRandom;
use rand::Rng;
use std::io::{BufRead, Write};

use super::answers::resolve_answer;
use super::parser::Question;
use super::QuizError;

const TIME_FORMAT: &str = "%d.%m.%Y  %H:%M:%S";

#[derive(Debug, Clone, PartialEq)]
pub struct QuizSummary {
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    pub total: usize,
    pub correct: usize,
}

impl QuizSummary {
    /// Share of correct answers; 0 when nothing was asked
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 / self.total as f64 * 100.0
    }

    pub fn render(&self) -> String {
        format!(
            "Test started: {}\n\
             Test finished: {}\n\
             Total questions: {}\n\
             Correct answers: {}\n\
             Correct percentage: {:.2}%",
            self.started_at.format(TIME_FORMAT),
            self.finished_at.format(TIME_FORMAT),
            self.total,
            self.correct,
            self.percentage()
        )
    }
}

/// One quiz run over a shuffled question set
pub struct QuizSession {
    questions: Vec<Question>,
}

impl QuizSession {
    /// Shuffle question order and each question's options
    pub fn new<R: Rng + ?Sized>(mut questions: Vec<Question>, rng: &mut R) -> Self {
        questions.shuffle(rng);
        for question in &mut questions {
            question.options.shuffle(rng);
        }
        QuizSession { questions }
    }

    /// Questions in the order they will be asked
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Ask for a question count, then ask that many questions
    ///
    /// A count above the number of questions is clamped. A non-numeric count
    /// aborts the run with `InvalidCount`.
    pub fn run<I: BufRead, O: Write>(&self, mut input: I, mut output: O) -> Result<QuizSummary, QuizError> {
        let started_at = Local::now();

        write!(output, "Enter the number of questions: ")?;
        output.flush()?;
        let raw_count = read_line(&mut input)?;
        let requested: usize = raw_count
            .trim()
            .parse()
            .map_err(|_| QuizError::InvalidCount(raw_count.trim().to_string()))?;

        let total = requested.min(self.questions.len());
        if total < requested {
            tracing::warn!(requested, available = self.questions.len(), "Question count clamped");
        }

        let mut correct = 0;
        for question in self.questions.iter().take(total) {
            writeln!(output, "{}", question.text)?;
            writeln!(output, "Options:")?;
            for (number, option) in question.options.iter().enumerate() {
                writeln!(output, "{}. {}", number + 1, option)?;
            }
            write!(output, "Your answer: ")?;
            output.flush()?;

            let reply = read_line(&mut input)?;
            let chosen = resolve_answer(&reply).and_then(|n| question.options.get(n - 1));

            let is_correct = chosen.is_some_and(|option| question.is_correct(option));
            if is_correct {
                writeln!(output, "Correct!")?;
                correct += 1;
            } else {
                writeln!(output, "Wrong!")?;
            }
            tracing::info!(question = %question.text, reply = reply.trim(), is_correct, "Question answered");
        }

        let summary = QuizSummary {
            started_at,
            finished_at: Local::now(),
            total,
            correct,
        };
        tracing::info!(
            total = summary.total,
            correct = summary.correct,
            percentage = summary.percentage(),
            "Quiz finished"
        );
        Ok(summary)
    }
}

/// One line without its terminator; empty at end of input
fn read_line<I: BufRead>(input: &mut I) -> Result<String, QuizError> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::parser::parse_str;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const QUESTIONS: &str = "\
1. Which instrument has 88 keys?
1. Guitar
2. Piano
3. Violin
Answer: 2
2. Which instrument uses a bow?
1. Violin
2. Piano
3. Drum
Answer: 1
3. How many strings does a bass guitar usually have?
1. 4
2. 6
3. 12
Answer: 1
";

    fn session(seed: u64) -> QuizSession {
        let mut rng = StdRng::seed_from_u64(seed);
        QuizSession::new(parse_str(QUESTIONS).unwrap(), &mut rng)
    }

    /// 1-based position of the correct option as shown to the user
    fn correct_number(question: &Question) -> usize {
        question
            .options
            .iter()
            .position(|o| question.is_correct(o))
            .unwrap()
            + 1
    }

    #[test]
    fn test_shuffle_is_deterministic_per_seed() {
        assert_eq!(session(42).questions(), session(42).questions());

        let shuffled = session(7);
        assert_eq!(shuffled.questions().len(), 3);
        for q in shuffled.questions() {
            assert_eq!(q.options.len(), 3);
            assert!(q.options.contains(&q.answer));
        }
    }

    #[test]
    fn test_all_correct() {
        let quiz = session(1);
        let mut input = String::from("3\n");
        for q in quiz.questions() {
            input.push_str(&format!("{}\n", correct_number(q)));
        }
        let mut output = Vec::new();

        let summary = quiz.run(input.as_bytes(), &mut output).unwrap();

        assert_eq!(summary.total, 3);
        assert_eq!(summary.correct, 3);
        assert!((summary.percentage() - 100.0).abs() < 1e-9);
        let printed = String::from_utf8(output).unwrap();
        assert_eq!(printed.matches("Correct!").count(), 3);
        assert!(printed.contains("Options:"));
    }

    #[test]
    fn test_word_answers_and_unresolvable() {
        let quiz = session(3);
        let words = ["one", "two", "three"];
        let first = words[correct_number(&quiz.questions()[0]) - 1];
        let input = format!("2\n{}\nmaybe\n", first);

        let summary = quiz.run(input.as_bytes(), Vec::new()).unwrap();

        assert_eq!(summary.total, 2);
        assert_eq!(summary.correct, 1);
        assert_eq!(format!("{:.2}", summary.percentage()), "50.00");
    }

    #[test]
    fn test_count_is_clamped() {
        let quiz = session(5);
        let summary = quiz.run("10\n".as_bytes(), Vec::new()).unwrap();

        // no answers left in the input, every reply is empty
        assert_eq!(summary.total, 3);
        assert_eq!(summary.correct, 0);
    }

    #[test]
    fn test_invalid_count() {
        let quiz = session(5);
        let err = quiz.run("many\n".as_bytes(), Vec::new()).unwrap_err();
        assert!(matches!(err, QuizError::InvalidCount(ref s) if s == "many"));
    }

    #[test]
    fn test_zero_questions_summary() {
        let quiz = session(9);
        let summary = quiz.run("0\n".as_bytes(), Vec::new()).unwrap();

        assert_eq!(summary.percentage(), 0.0);
        let rendered = summary.render();
        assert!(rendered.contains("Total questions: 0"));
        assert!(rendered.contains("Correct percentage: 0.00%"));
    }
}
