use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Mutex;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use course_quiz::{
    Document, QuizRunner, QuizSet, RunState, Score, Selection, Session, Severity, StartMode,
    json_files_in, read_document, validate_document,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "course-quiz", version, about = "Quick checks, quizzes and mock exams in the terminal")]
struct Cli {
    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Work through a section: quick checks, then the section quiz
    Take {
        /// Section JSON file
        #[arg(short, long)]
        file: PathBuf,

        /// Skip the start screen
        #[arg(long)]
        immediate: bool,
    },

    /// Sit a mock exam drawn from a question bank
    Exam {
        /// Mock exam JSON file
        #[arg(short, long)]
        file: PathBuf,

        /// Number of questions (defaults to the exam config)
        #[arg(long)]
        count: Option<usize>,

        /// Seed for a reproducible paper
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Grade a list of answers without the terminal UI
    Grade {
        /// Section or mock exam JSON file
        #[arg(short, long)]
        file: PathBuf,

        /// Comma-separated answers, as option indices (0,2,1) or letters (A,C,B)
        #[arg(long)]
        answers: String,

        /// Seed used to draw the exam paper
        #[arg(long, default_value = "0")]
        seed: u64,
    },

    /// Check content files for authoring defects
    Validate {
        /// Content file or directory of JSON files
        #[arg(long)]
        path: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let interactive = matches!(cli.command, Commands::Take { .. } | Commands::Exam { .. });
    if let Err(e) = init_tracing(cli.log_file.as_deref(), interactive) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }

    let result = match cli.command {
        Commands::Take { file, immediate } => take(&file, immediate),
        Commands::Exam { file, count, seed } => exam(&file, count, seed),
        Commands::Grade {
            file,
            answers,
            seed,
        } => grade(&file, &answers, seed),
        Commands::Validate { path } => validate(&path),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

/// Logs go to `--log-file` when given. Otherwise they go to stderr, kept to
/// warnings while the terminal UI owns the screen.
fn init_tracing(log_file: Option<&Path>, interactive: bool) -> Result<()> {
    let default = if interactive && log_file.is_none() {
        "course_quiz=warn"
    } else {
        "course_quiz=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(io::stderr).init(),
    }
    Ok(())
}

fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn take(file: &Path, immediate: bool) -> Result<()> {
    let mode = if immediate {
        StartMode::Immediate
    } else {
        StartMode::Gated
    };
    let session = Session::from_section_file(file, mode)?;
    session.run()?;
    Ok(())
}

fn exam(file: &Path, count: Option<usize>, seed: Option<u64>) -> Result<()> {
    let mut rng = rng_from(seed);
    let session = Session::from_exam_file(file, count, &mut rng)?;
    session.run()?;
    Ok(())
}

fn grade(file: &Path, answers: &str, seed: u64) -> Result<()> {
    let document = course_quiz::load_document(file)?;
    let (quiz, threshold) = match document {
        Document::Section(section) => {
            let quiz = section
                .quiz
                .with_context(|| format!("section {} has no quiz", section.id))?;
            let title = quiz
                .title
                .clone()
                .map_or(section.title.clone(), |t| format!("{}: {}", section.title, t));
            (QuizSet::new(Some(title), quiz.questions), None)
        }
        Document::MockExam(exam) => {
            let paper = exam.assemble(&mut rng_from(Some(seed)));
            (paper, Some(exam.config.pass_threshold))
        }
    };

    let selections = parse_answers(answers)?;
    if selections.len() > quiz.len() {
        bail!(
            "{} answers given but the quiz has {} questions",
            selections.len(),
            quiz.len()
        );
    }

    println!("{}", quiz.title.as_deref().unwrap_or("Quiz"));

    let mut runner = QuizRunner::new(quiz, StartMode::Immediate).with_observer(move |score: &Score| {
        println!("Score: {}", score);
        if let Some(threshold) = threshold {
            let verdict = if score.passes(threshold) { "PASS" } else { "FAIL" };
            println!("Result: {} (pass mark {}%)", verdict, threshold);
        }
    });

    for (index, choice) in selections.into_iter().enumerate() {
        let outcome = runner.answer_at(index, Selection::Index(choice))?;
        let id = &runner.quiz().questions[index].id;
        let verdict = if outcome.is_correct { "correct" } else { "incorrect" };
        println!("  [{}] {:<9} {}", id, verdict, outcome.explanation);
    }

    if runner.state() != RunState::Completed {
        println!(
            "Incomplete: answered {} of {} questions",
            runner.answered_count(),
            runner.total_questions()
        );
    }
    info!(run = %runner.id(), "grading finished");
    Ok(())
}

/// Parse `0,2,1` or `A,C,B` into option indices.
fn parse_answers(input: &str) -> Result<Vec<usize>> {
    input
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            if let Ok(index) = token.parse::<usize>() {
                return Ok(index);
            }
            match token.as_bytes() {
                [letter] if letter.is_ascii_alphabetic() => {
                    Ok(usize::from(letter.to_ascii_uppercase() - b'A'))
                }
                _ => bail!("invalid answer {:?}: use an option index or letter", token),
            }
        })
        .collect()
}

fn validate(path: &Path) -> Result<()> {
    let files = if path.is_dir() {
        json_files_in(path)?
    } else {
        vec![path.to_path_buf()]
    };

    let mut errors = 0;
    let mut warnings = 0;
    let mut unreadable = 0;

    for file in &files {
        let document = match read_document(file) {
            Ok(document) => document,
            Err(e) => {
                println!("{}\n  {}", file.display(), e);
                unreadable += 1;
                continue;
            }
        };

        println!("{}: {} ({})", file.display(), document.title(), document.summary());
        for issue in validate_document(&document) {
            println!("  {}", issue);
            match issue.severity {
                Severity::Error => errors += 1,
                Severity::Warning => warnings += 1,
            }
        }
    }

    if errors == 0 && warnings == 0 && unreadable == 0 {
        println!("All {} document(s) valid.", files.len());
    } else {
        println!(
            "\n{} error(s), {} warning(s), {} unreadable file(s) found.",
            errors, warnings, unreadable
        );
    }

    match (unreadable, errors) {
        (0, 0) => Ok(()),
        (0, errors) => bail!("{} authoring error(s)", errors),
        (unreadable, 0) => bail!("{} file(s) could not be read or parsed", unreadable),
        (unreadable, errors) => bail!(
            "{} file(s) could not be read or parsed, {} authoring error(s)",
            unreadable,
            errors
        ),
    }
}
