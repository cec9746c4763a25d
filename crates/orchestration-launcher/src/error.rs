//! Error types for launching the orchestration server

use thiserror::Error;

/// Unified error type for server launch and control
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to spawn the server process
    #[error("failed to spawn process: {reason}")]
    SpawnFailed {
        /// The reason for the spawn failure
        reason: String,
    },

    /// Server executable not found
    #[error("command not found: {command}")]
    CommandNotFound {
        /// The command that was not found
        command: String,
    },

    /// Server process exited with a non-zero status
    #[error("command failed: {command} (exit code {code:?})")]
    NonZeroExit {
        /// The command line that failed
        command: String,
        /// The exit code, or `None` if terminated by a signal
        code: Option<i32>,
    },

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// For convenience, re-export specific error constructors
impl Error {
    /// Create a spawn failed error
    pub fn spawn_failed(reason: impl Into<String>) -> Self {
        Self::SpawnFailed {
            reason: reason.into(),
        }
    }

    /// Create a command not found error
    pub fn command_not_found(command: impl Into<String>) -> Self {
        Self::CommandNotFound {
            command: command.into(),
        }
    }

    /// Create a non-zero exit error
    pub fn non_zero_exit(command: impl Into<String>, code: Option<i32>) -> Self {
        Self::NonZeroExit {
            command: command.into(),
            code,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
