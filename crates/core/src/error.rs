use thiserror::Error;

/// Result type alias for chatline-core
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for Chatline
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error for file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Parse/serialization errors
    #[error("parse error: {0}")]
    Parse(String),

    /// An activity could not be decoded
    #[error("activity error: {0}")]
    Activity(#[from] ActivityError),

    /// Transport errors (feed closed, post rejected)
    #[error("transport error: {0}")]
    Transport(String),
}

/// Decode failures at the activity feed boundary
///
/// These never escape reconciliation: the offending activity is logged and
/// dropped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActivityError {
    /// The raw activity is not a JSON object
    #[error("activity is not a JSON object")]
    NotAnObject,

    /// The activity is missing a required field or has a field of the wrong type
    #[error("invalid {kind} activity: {reason}")]
    Invalid { kind: String, reason: String },
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(err.to_string())
    }
}
