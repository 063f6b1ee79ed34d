//! Error types for WCPS query construction and execution.

use thiserror::Error;

/// Result type alias using WcpsError.
pub type WcpsResult<T> = Result<T, WcpsError>;

/// Coarse classification of a [`WcpsError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed variable declaration.
    Format,
    /// Reference to a variable, format or name the query does not know.
    Value,
    /// Bad caller input rejected before any network activity.
    Input,
    /// The request never produced a response.
    Transport,
    /// The server answered with a non-success status.
    Server,
    /// The response payload could not be decoded.
    Decode,
}

/// Primary error type for WCPS operations.
#[derive(Debug, Error)]
pub enum WcpsError {
    // === Query construction ===
    #[error("The format of variable initialization wasn't correct: {0}")]
    MalformedDeclaration(String),

    #[error("Variables weren't specified")]
    NoVariablesSpecified,

    #[error("Variables in a string don't exist: {}", .0.join(", "))]
    UnknownVariables(Vec<String>),

    #[error("Such variable doesn't exist: {0}")]
    NoSuchVariable(String),

    #[error("Variable is already bound: {0}")]
    DuplicateVariable(String),

    #[error("Requested format not supported: {0}")]
    UnsupportedFormat(String),

    // === Input ===
    #[error("Query text is empty")]
    EmptyQuery,

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Configuration error: {0}")]
    Config(String),

    // === Execution ===
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Server responded with status {status}: {body}")]
    ServerStatus { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl WcpsError {
    /// Get the coarse kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            WcpsError::MalformedDeclaration(_) => ErrorKind::Format,

            WcpsError::NoVariablesSpecified
            | WcpsError::UnknownVariables(_)
            | WcpsError::NoSuchVariable(_)
            | WcpsError::DuplicateVariable(_)
            | WcpsError::UnsupportedFormat(_) => ErrorKind::Value,

            WcpsError::EmptyQuery | WcpsError::InvalidEndpoint(_) | WcpsError::Config(_) => {
                ErrorKind::Input
            }

            WcpsError::Transport(_) => ErrorKind::Transport,
            WcpsError::ServerStatus { .. } => ErrorKind::Server,
            WcpsError::Decode(_) => ErrorKind::Decode,
        }
    }
}
