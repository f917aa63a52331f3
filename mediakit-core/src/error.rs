// ============================================================================
// mediakit-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Core Error Types
//
// This module defines the error type shared by every operation in the
// mediakit-core library. Whole-operation failures (a scan root that is not a
// directory, an unreadable folder list) surface as `CoreError`. Failures of a
// single item inside a batch never do: those are recorded as data in the
// batch result so the remaining items still run.
//
// KEY COMPONENTS:
// - CoreError: The error enum
// - CoreResult: Result alias used throughout the crate
// - Helper constructors for external command failures

use std::io;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors produced by the mediakit core library.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to start '{0}': {1}")]
    CommandStart(String, #[source] io::Error),

    #[error("Failed while waiting for '{0}': {1}")]
    CommandWait(String, #[source] io::Error),

    #[error("'{0}' exited with {1}: {2}")]
    CommandFailed(String, ExitStatus, String),

    #[error("Required tool not found: {0}")]
    DependencyNotFound(String),

    #[error("JSON parse error: {0}")]
    JsonParseError(String),

    #[error("Path error: {0}")]
    PathError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Directory walk error: {0}")]
    Walkdir(#[from] walkdir::Error),

    #[error("Notification error: {0}")]
    NotificationError(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    OperationFailed(String),
}

/// Result alias for mediakit core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Builds a `CommandStart` error for a tool that could not be spawned.
pub fn command_start_error(tool: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandStart(tool.into(), err)
}

/// Builds a `CommandWait` error for a tool whose exit could not be collected.
pub fn command_wait_error(tool: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandWait(tool.into(), err)
}

/// Builds a `CommandFailed` error carrying the tool's diagnostic output.
pub fn command_failed_error(
    tool: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed(tool.into(), status, stderr.into())
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::JsonParseError(err.to_string())
    }
}
