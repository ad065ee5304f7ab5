use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use exam_core::model::QuestionSetId;
use services::{Clock, EngineConfig, ExamLoopService, ExamRunner};
use storage::{FileRepository, QuestionSetRepository};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

mod input;
mod render;

use input::{HELP, Input, parse_input};
use render::render_view;

#[derive(Debug)]
enum ArgsError {
    MissingFile,
    UnknownArg(String),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingFile => {
                write!(f, "a question set file is required (or set EXAM_QUESTION_FILE)")
            }
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  exam run   <questions.toml>   # practice a question set");
    eprintln!("  exam check <questions.toml>   # validate and summarize a question set");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  EXAM_QUESTION_FILE, EXAM_TICK_MS, EXAM_LOG, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Run,
    Check,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "run" => Some(Self::Run),
            "check" => Some(Self::Check),
            _ => None,
        }
    }
}

fn parse_file(args: &mut impl Iterator<Item = String>) -> Result<PathBuf, ArgsError> {
    let file = match args.next() {
        Some(arg) if arg.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
        Some(arg) => PathBuf::from(arg),
        None => std::env::var("EXAM_QUESTION_FILE")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .ok_or(ArgsError::MissingFile)?,
    };
    if let Some(extra) = args.next() {
        return Err(ArgsError::UnknownArg(extra));
    }
    Ok(file)
}

fn init_tracing(config: &EngineConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);

    // Default behavior: practicing when no subcommand is provided.
    let cmd = match argv.next() {
        None => Command::Run,
        Some(first) if first == "--help" || first == "-h" => {
            print_usage();
            return Ok(());
        }
        Some(first) => match Command::from_arg(&first) {
            Some(cmd) => cmd,
            None => {
                eprintln!("unknown subcommand: {first}");
                print_usage();
                return Err(ArgsError::UnknownArg(first).into());
            }
        },
    };

    let file = parse_file(&mut argv).map_err(|e| {
        print_usage();
        e
    })?;

    let config = EngineConfig::from_env()?;
    init_tracing(&config);
    tracing::debug!(file = %file.display(), ?cmd, "loading question set");

    let repo = Arc::new(FileRepository::single(&file).await?);
    let summaries = repo.list_question_sets().await?;
    let Some(summary) = summaries.first() else {
        return Err(ArgsError::MissingFile.into());
    };

    match cmd {
        Command::Check => {
            println!(
                "{}: \"{}\" with {} question(s)",
                summary.id, summary.title, summary.question_count
            );
            Ok(())
        }
        Command::Run => {
            let service = ExamLoopService::new(Clock::default(), config, repo);
            let runner = service.start_exam(&summary.id).await?;
            practice(&runner, &summary.id).await
        }
    }
}

async fn practice(
    runner: &ExamRunner,
    set_id: &QuestionSetId,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Practicing {set_id}. Type ? for help.\n");
    println!("{}", render_view(&runner.view()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = match parse_input(&line) {
            Ok(input) => input,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };

        match input {
            Input::Quit => break,
            Input::Help => {
                println!("{HELP}");
                continue;
            }
            Input::Show => {}
            Input::Answer(label) => {
                if let Err(err) = runner.select_current(label) {
                    println!("{err}");
                }
            }
            Input::Move(direction) => {
                runner.navigate(direction);
            }
            Input::Jump(index) => {
                runner.jump_to(index);
            }
            Input::Submit => {
                runner.submit();
            }
            Input::Detail(kind) => {
                if let Err(err) = runner.reveal_detail(kind) {
                    println!("{err}");
                }
            }
            Input::Retry => {
                if !runner.retry() {
                    println!("submit first to retry");
                }
            }
        }
        println!("{}", render_view(&runner.view()));
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
