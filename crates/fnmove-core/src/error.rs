//! Error types and error code constants for fnmove.
//!
//! This module provides a unified error type (`FnMoveError`) that bridges
//! domain-specific errors from different subsystems (loading, interaction,
//! configuration, commit) into a common format suitable for CLI and JSON output.
//!
//! ## Error Code Mapping
//!
//! - `2`: Invalid arguments (bad input from caller)
//! - `3`: Resolution errors (package, function or file not found, collisions)
//! - `4`: Apply errors (render or write failures, concurrent modification)
//! - `10`: Internal errors (bugs, unexpected state)
//!
//! The process exit code is always `2` on error; these codes only classify
//! errors in structured output.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;
use crate::interaction::InteractionError;

// ============================================================================
// Output Error Codes
// ============================================================================

/// Error classification codes for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Invalid arguments from caller (bad input, malformed request).
    InvalidArguments = 2,
    /// Resolution errors (lookup failures, guards that reject the request).
    ResolutionError = 3,
    /// Apply errors (failed to render or write changes).
    ApplyError = 4,
    /// Internal errors (bugs, unexpected state).
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for relocation operations.
///
/// Declining a preview is not an error; it is reported as a distinct outcome
/// by the operation itself.
#[derive(Debug, Error)]
pub enum FnMoveError {
    /// Malformed input from the caller.
    #[error("invalid arguments: {message}")]
    Usage { message: String },

    /// No loaded package has the requested name.
    #[error("package {package} does not exist")]
    NoSuchPackage { package: String },

    /// The package exists but declares no such top-level function.
    #[error("no function named {function} in package {package}")]
    NoSuchFunction { package: String, function: String },

    /// The destination path is not a unit of the loaded program.
    #[error("file {path} is not part of the loaded program")]
    NoSuchUnit { path: String },

    /// The matched declaration is a method.
    #[error("{function} is a method of {receiver} and can not be moved")]
    UnsupportedReceiver { function: String, receiver: String },

    /// Source and destination are the same unit.
    #[error("function {function} already exists in file {path}")]
    NoOp { function: String, path: String },

    /// The destination package already declares the post-move name.
    #[error("{name} is already declared in package {package} ({path})")]
    Collision {
        name: String,
        package: String,
        path: String,
    },

    /// The name cannot be made externally visible.
    #[error("function {name} can not be exported")]
    NotExportable { name: String },

    /// A mutated tree failed to render. Nothing was written.
    #[error("move failed due to invalid tree in {path}: {message}")]
    Structural { path: String, message: String },

    /// A touched file changed on disk after it was loaded. Nothing was written.
    #[error("file {path} changed on disk since it was loaded")]
    ConcurrentModification { path: String },

    /// A write failed during commit. Touched files were rolled back.
    #[error("failed to write in file: {path}: {message}")]
    Io {
        path: String,
        message: String,
        rollback_failures: Vec<String>,
    },

    /// The semantic model could not be loaded.
    #[error("failed to load program: {message}")]
    Load { message: String },

    /// Configuration could not be read or parsed.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// The confirmation prompt failed irrecoverably.
    #[error("interaction error: {message}")]
    Interaction { message: String },

    /// Internal error (bug or unexpected state).
    #[error("internal error: {message}")]
    Internal { message: String },
}

// ============================================================================
// Error Code Mapping
// ============================================================================

impl From<&FnMoveError> for OutputErrorCode {
    fn from(err: &FnMoveError) -> Self {
        match err {
            FnMoveError::Usage { .. } => OutputErrorCode::InvalidArguments,
            FnMoveError::Config { .. } => OutputErrorCode::InvalidArguments,
            FnMoveError::NoSuchPackage { .. } => OutputErrorCode::ResolutionError,
            FnMoveError::NoSuchFunction { .. } => OutputErrorCode::ResolutionError,
            FnMoveError::NoSuchUnit { .. } => OutputErrorCode::ResolutionError,
            FnMoveError::UnsupportedReceiver { .. } => OutputErrorCode::ResolutionError,
            FnMoveError::NoOp { .. } => OutputErrorCode::ResolutionError,
            FnMoveError::Collision { .. } => OutputErrorCode::ResolutionError,
            FnMoveError::NotExportable { .. } => OutputErrorCode::ResolutionError,
            FnMoveError::Load { .. } => OutputErrorCode::ResolutionError,
            FnMoveError::Structural { .. } => OutputErrorCode::ApplyError,
            FnMoveError::ConcurrentModification { .. } => OutputErrorCode::ApplyError,
            FnMoveError::Io { .. } => OutputErrorCode::ApplyError,
            FnMoveError::Interaction { .. } => OutputErrorCode::InternalError,
            FnMoveError::Internal { .. } => OutputErrorCode::InternalError,
        }
    }
}

impl From<FnMoveError> for OutputErrorCode {
    fn from(err: FnMoveError) -> Self {
        OutputErrorCode::from(&err)
    }
}

// ============================================================================
// Bridges
// ============================================================================

impl From<ConfigError> for FnMoveError {
    fn from(err: ConfigError) -> Self {
        FnMoveError::Config {
            message: err.to_string(),
        }
    }
}

impl From<InteractionError> for FnMoveError {
    fn from(err: InteractionError) -> Self {
        FnMoveError::Interaction {
            message: err.to_string(),
        }
    }
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl FnMoveError {
    /// Create a usage error.
    pub fn usage(message: impl Into<String>) -> Self {
        FnMoveError::Usage {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        FnMoveError::Internal {
            message: message.into(),
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> OutputErrorCode {
        OutputErrorCode::from(self)
    }

    /// Whether the error was detected before anything was mutated or written.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            FnMoveError::Usage { .. }
                | FnMoveError::NoSuchPackage { .. }
                | FnMoveError::NoSuchFunction { .. }
                | FnMoveError::NoSuchUnit { .. }
                | FnMoveError::UnsupportedReceiver { .. }
                | FnMoveError::NoOp { .. }
                | FnMoveError::Collision { .. }
                | FnMoveError::NotExportable { .. }
        )
    }
}

/// Result alias used throughout fnmove.
pub type FnMoveResult<T> = Result<T, FnMoveError>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod error_code_mapping {
        use super::*;

        #[test]
        fn usage_maps_to_invalid_arguments() {
            let err = FnMoveError::usage("expected Package.Function");
            assert_eq!(err.error_code(), OutputErrorCode::InvalidArguments);
            assert_eq!(err.error_code().code(), 2);
        }

        #[test]
        fn lookup_failures_map_to_resolution_error() {
            let err = FnMoveError::NoSuchPackage {
                package: "mathutil".to_string(),
            };
            assert_eq!(err.error_code(), OutputErrorCode::ResolutionError);

            let err = FnMoveError::NoSuchFunction {
                package: "mathutil".to_string(),
                function: "sum".to_string(),
            };
            assert_eq!(err.error_code().code(), 3);
        }

        #[test]
        fn commit_failures_map_to_apply_error() {
            let err = FnMoveError::Io {
                path: "a.go".to_string(),
                message: "permission denied".to_string(),
                rollback_failures: vec![],
            };
            assert_eq!(err.error_code(), OutputErrorCode::ApplyError);

            let err = FnMoveError::Structural {
                path: "a.go".to_string(),
                message: "empty identifier".to_string(),
            };
            assert_eq!(err.error_code().code(), 4);
        }

        #[test]
        fn internal_maps_to_internal() {
            let err = FnMoveError::internal("unexpected state");
            assert_eq!(err.error_code().code(), 10);
        }
    }

    mod error_display {
        use super::*;

        #[test]
        fn no_such_function_display() {
            let err = FnMoveError::NoSuchFunction {
                package: "mathutil".to_string(),
                function: "sum".to_string(),
            };
            assert_eq!(err.to_string(), "no function named sum in package mathutil");
        }

        #[test]
        fn io_display_names_the_file() {
            let err = FnMoveError::Io {
                path: "app/main.go".to_string(),
                message: "disk full".to_string(),
                rollback_failures: vec![],
            };
            assert!(err.to_string().contains("app/main.go"));
        }
    }

    mod classification {
        use super::*;

        #[test]
        fn validation_errors_are_flagged() {
            assert!(FnMoveError::NoOp {
                function: "sum".to_string(),
                path: "ops.go".to_string(),
            }
            .is_validation());
            assert!(!FnMoveError::internal("x").is_validation());
        }
    }
}
