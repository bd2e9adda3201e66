use std::fmt;
use std::sync::Arc;

use quiz_core::model::{CategoryId, Difficulty, QuestionQuery, QuestionType};
use services::quiz::shuffled_answers;
use services::{QuestionBank, QuizController, TriviaClient};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidAmount { raw: String },
    InvalidCategory { raw: String },
    InvalidDifficulty { raw: String },
    InvalidType { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidAmount { raw } => write!(f, "invalid --amount value: {raw}"),
            ArgsError::InvalidCategory { raw } => write!(f, "invalid --category value: {raw}"),
            ArgsError::InvalidDifficulty { raw } => {
                write!(f, "invalid --difficulty value: {raw}")
            }
            ArgsError::InvalidType { raw } => write!(f, "invalid --type value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  cargo run -p app -- [--amount <1-50>] [--category <id>] [--difficulty <easy|medium|hard>]"
    );
    eprintln!("                     [--type <multiple|boolean>] [--categories]");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  TRIVIA_BASE_URL, TRIVIA_MIN_INTERVAL_MS, TRIVIA_TIMEOUT_SECS, RUST_LOG");
}

struct Args {
    amount: u32,
    category: Option<CategoryId>,
    difficulty: Option<Difficulty>,
    kind: Option<QuestionType>,
    list_categories: bool,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self {
            amount: QuestionQuery::DEFAULT_AMOUNT,
            category: None,
            difficulty: None,
            kind: None,
            list_categories: false,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--amount" => {
                    let value = require_value(args, "--amount")?;
                    parsed.amount = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidAmount { raw: value.clone() })?;
                }
                "--category" => {
                    let value = require_value(args, "--category")?;
                    parsed.category = Some(
                        value
                            .parse()
                            .map_err(|_| ArgsError::InvalidCategory { raw: value.clone() })?,
                    );
                }
                "--difficulty" => {
                    let value = require_value(args, "--difficulty")?;
                    parsed.difficulty = Some(
                        value
                            .parse()
                            .map_err(|_| ArgsError::InvalidDifficulty { raw: value.clone() })?,
                    );
                }
                "--type" => {
                    let value = require_value(args, "--type")?;
                    parsed.kind = Some(
                        value
                            .parse()
                            .map_err(|_| ArgsError::InvalidType { raw: value.clone() })?,
                    );
                }
                "--categories" => parsed.list_categories = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let bank: Arc<dyn QuestionBank> = Arc::new(TriviaClient::from_env());
    let mut quiz = QuizController::new(bank);

    if args.list_categories {
        quiz.load_categories().await;
        if let Some(err) = quiz.state().last_error() {
            return Err(err.to_string().into());
        }
        for category in quiz.state().categories() {
            println!("{:>4}  {}", category.id, category.name);
        }
        return Ok(());
    }

    quiz.ensure_session_token().await;
    quiz.load_questions(args.amount, args.category, args.difficulty, args.kind)
        .await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(question) = quiz.state().current_question().cloned() {
        let progress = quiz.state().progress_summary();
        println!();
        println!(
            "[{}/{}] {} ({}, {})",
            progress.position,
            progress.total,
            question.category(),
            question.difficulty(),
            question.kind()
        );
        println!("{}", question.text());

        let choices = shuffled_answers(&question);
        for (i, choice) in choices.iter().enumerate() {
            println!("  {}) {choice}", i + 1);
        }

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let answer = line
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| choices.get(i))
            .cloned()
            .unwrap_or_else(|| line.trim().to_string());

        let Some(outcome) = quiz.answer_current_question(&answer) else {
            break;
        };
        if outcome.correct {
            println!("Correct!");
        } else {
            println!("Wrong, the answer was: {}", outcome.correct_answer);
        }
        if outcome.is_complete {
            break;
        }
    }

    let state = quiz.state();
    println!();
    println!("Score: {}/{}", state.score(), state.total_questions());
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
