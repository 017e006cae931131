//! Error types shared across GazeLens crates.

/// Top-level error type for GazeLens operations.
///
/// Per-tick channel failures are not represented here; they are
/// recoverable by construction and live in `gazelens-source`.
#[derive(Debug, thiserror::Error)]
pub enum GazeError {
    #[error("Session error: {message}")]
    Session { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using GazeError.
pub type GazeResult<T> = Result<T, GazeError>;

impl GazeError {
    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}
