// 🎓 Rental Quiz - interactive multiple-choice test
//
// Reads questions from RENTAL_QUIZ_FILE (default: test.txt), or from the
// first argument when one is given.

use anyhow::Result;
use std::env;
use std::io;
use std::path::PathBuf;

use instrument_rental::quiz::{load_questions, QuizSession};
use instrument_rental::{init_logging, AppConfig};

fn main() -> Result<()> {
    let config = AppConfig::from_env()?;
    let _guard = init_logging(config.log_format, &config.log_dir, "quiz.log")?;

    let path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| config.quiz_file.clone());

    let questions = match load_questions(&path) {
        Ok(questions) => questions,
        Err(e) => {
            eprintln!("❌ {:#}", e);
            tracing::error!(path = %path.display(), error = %format!("{:#}", e), "Could not load questions");
            std::process::exit(1);
        }
    };

    let session = QuizSession::new(questions, &mut rand::rng());
    let summary = session.run(io::stdin().lock(), io::stdout().lock())?;

    println!("\n{}", summary.render());
    Ok(())
}
