//! Error types for the orchestration client

use thiserror::Error;

/// Orchestration client error type
#[derive(Error, Debug)]
pub enum Error {
    /// Starting the orchestration server failed
    #[error("failed to start orchestration server: {0}")]
    Startup(#[source] orchestration_launcher::Error),

    /// Stopping the orchestration server failed
    #[error("failed to stop orchestration server: {0}")]
    Shutdown(#[source] orchestration_launcher::Error),

    /// Restarting the orchestration server failed
    #[error("failed to restart orchestration server: {0}")]
    Restart(#[source] orchestration_launcher::Error),

    /// HTTP error from the default transport
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON decode error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error reported by a caller-supplied transport
    #[error("transport error: {0}")]
    Transport(String),
}

impl Error {
    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
