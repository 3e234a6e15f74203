//! CLI helpers for the `fnmv` binary.
//!
//! [`run_move`] takes its ports as arguments so tests can drive the whole
//! load, relocate and commit sequence without a terminal.

use std::path::{Path, PathBuf};

use fnmove_core::config::Config;
use fnmove_core::error::{FnMoveError, FnMoveResult, OutputErrorCode};
use fnmove_go::loader::{GoLoader, SemanticModel};
use fnmove_go::ops::{relocate_function, MoveRequest, Outcome, Ports};
use serde::Serialize;
use tracing::debug;

/// Split `Package.Function` into its two halves.
pub fn parse_qualified(qualified: &str) -> FnMoveResult<(String, String)> {
    let usage = || {
        FnMoveError::usage(format!("expected Package.Function, got '{}'", qualified))
    };
    let (package, function) = qualified.split_once('.').ok_or_else(usage)?;
    if package.is_empty() || function.is_empty() || function.contains('.') {
        return Err(usage());
    }
    Ok((package.to_string(), function.to_string()))
}

/// Arguments of one `fnmv` invocation.
#[derive(Debug, Clone)]
pub struct MoveArgs {
    /// Project root.
    pub root: PathBuf,
    /// `Package.Function`.
    pub qualified: String,
    /// Destination unit, absolute or relative to `root`.
    pub destination: PathBuf,
    pub no_preview: bool,
}

/// Load the project at `args.root` and perform the move.
pub fn run_move(args: &MoveArgs, ports: Ports<'_>) -> FnMoveResult<Outcome> {
    let (package, function) = parse_qualified(&args.qualified)?;
    let config = Config::load_from_project(&args.root)?;
    let mut program = GoLoader::from_config(&config.relocate).load(&args.root)?;

    let mut request = MoveRequest::new(package, function, destination(&args.destination));
    request.preview = config.relocate.preview && !args.no_preview;
    request.confirm_attempts = config.relocate.confirm_attempts;
    debug!(?request, "move requested");

    relocate_function(&mut program, &request, ports)
}

/// Absolute destinations are canonicalized to match loaded unit paths.
fn destination(path: &Path) -> PathBuf {
    if path.is_absolute() {
        std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
    } else {
        path.to_path_buf()
    }
}

/// Message printed for an outcome.
pub fn outcome_message(outcome: &Outcome) -> &'static str {
    match outcome {
        Outcome::Moved(_) => "Moved",
        Outcome::Declined => "No change applied",
    }
}

/// JSON body printed with `--json`.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JsonOutcome<'a> {
    Moved {
        #[serde(flatten)]
        report: &'a fnmove_go::ops::MoveReport,
    },
    Declined,
    Error {
        code: u8,
        message: String,
    },
}

impl<'a> JsonOutcome<'a> {
    pub fn from_outcome(outcome: &'a Outcome) -> Self {
        match outcome {
            Outcome::Moved(report) => JsonOutcome::Moved { report },
            Outcome::Declined => JsonOutcome::Declined,
        }
    }

    pub fn from_error(err: &FnMoveError) -> Self {
        JsonOutcome::Error {
            code: OutputErrorCode::from(err).code(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod qualified_names {
        use super::*;

        #[test]
        fn splits_on_the_dot() {
            let (package, function) = parse_qualified("mathutil.sum").unwrap();
            assert_eq!(package, "mathutil");
            assert_eq!(function, "sum");
        }

        #[test]
        fn rejects_malformed_names() {
            for bad in ["sum", ".sum", "mathutil.", "a.b.c", ""] {
                let err = parse_qualified(bad).unwrap_err();
                assert!(matches!(err, FnMoveError::Usage { .. }), "{bad}");
            }
        }
    }

    mod json {
        use super::*;

        #[test]
        fn declined_is_tagged() {
            let value =
                serde_json::to_value(JsonOutcome::from_outcome(&Outcome::Declined)).unwrap();
            assert_eq!(value, serde_json::json!({ "status": "declined" }));
        }

        #[test]
        fn errors_carry_their_code() {
            let err = FnMoveError::NoSuchPackage {
                package: "nope".to_string(),
            };
            let value = serde_json::to_value(JsonOutcome::from_error(&err)).unwrap();
            assert_eq!(value["status"], "error");
            assert_eq!(value["code"], 3);
            assert_eq!(value["message"], "package nope does not exist");
        }
    }
}
