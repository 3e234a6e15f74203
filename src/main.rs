//! Binary entry point for the fnmv CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Move mathutil.sum into app/main.go, previewing the diff first
//! fnmv mathutil.sum app/main.go
//!
//! # Apply without asking, from another directory
//! fnmv --dir ~/src/demo --no-preview mathutil.sum app/main.go
//! ```

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use fnmove::cli::{outcome_message, run_move, JsonOutcome, MoveArgs};
use fnmove::error::{FnMoveError, FnMoveResult};
use fnmove::go::ops::{Outcome, Ports};
use fnmove::go::CanonicalPrinter;
use fnmove::interaction::{StdioPrompt, WriterSink};
use fnmove::store::OsFileStore;

/// Move a function to another file, rewriting its callers.
#[derive(Parser, Debug)]
#[command(name = "fnmv", version, about = "Move a function to another file or package")]
struct Cli {
    /// Function to move, as Package.Function.
    function: String,

    /// Destination file, relative to the project root.
    destination: PathBuf,

    /// Project root (default: current directory).
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Write changes without showing a diff or asking.
    #[arg(long)]
    no_preview: bool,

    /// Print a JSON report instead of a message.
    #[arg(long)]
    json: bool,

    /// Log level for tracing output.
    #[arg(long, value_enum, default_value = "warn")]
    log_level: LogLevel,
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_level);

    let json = cli.json;
    match execute(cli) {
        Ok(outcome) => {
            if json {
                print_json(&JsonOutcome::from_outcome(&outcome));
            } else {
                println!("{}", outcome_message(&outcome));
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            if json {
                print_json(&JsonOutcome::from_error(&err));
            }
            eprintln!("error: {}", err);
            ExitCode::from(2)
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn execute(cli: Cli) -> FnMoveResult<Outcome> {
    let root = match cli.dir {
        Some(dir) => dir,
        None => std::env::current_dir().map_err(|e| FnMoveError::Io {
            path: ".".to_string(),
            message: e.to_string(),
            rollback_failures: Vec::new(),
        })?,
    };
    let args = MoveArgs {
        root,
        qualified: cli.function,
        destination: cli.destination,
        no_preview: cli.no_preview,
    };

    let mut store = OsFileStore;
    let mut prompt = StdioPrompt::terminal();
    let mut sink = WriterSink::new(io::stdout());
    run_move(
        &args,
        Ports {
            printer: &CanonicalPrinter,
            store: &mut store,
            prompt: &mut prompt,
            sink: &mut sink,
        },
    )
}

fn print_json(value: &JsonOutcome<'_>) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(err) => eprintln!("error: failed to serialize report: {}", err),
    }
}
