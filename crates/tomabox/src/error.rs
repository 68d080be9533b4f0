//! Error types for tomabox.
//!
//! Configuration errors are fatal and reach the operator once. Remote
//! errors are caught at the call site and reported per identity.

/// Error type covering configuration, remote calls, and account files.
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error("{0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("{message}")]
    Rejected { status: i64, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid file format: {0}")]
    InvalidFileFormat(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BotError {
    /// Whether this error should stop the run instead of skipping one identity.
    pub fn is_fatal(&self) -> bool {
        matches!(self, BotError::Config(_) | BotError::Io(_))
    }
}

impl From<reqwest::Error> for BotError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            BotError::InvalidResponse(e.to_string())
        } else {
            BotError::Http(e.to_string())
        }
    }
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, BotError>;
