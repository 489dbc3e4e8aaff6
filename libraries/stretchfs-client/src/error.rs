//! Error types for the StretchFS client.

use thiserror::Error;

/// Errors that can occur when talking to a StretchFS server.
#[derive(Error, Debug)]
pub enum StretchFsError {
    /// Transport failure (connect, timeout, body read)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Server returned a non-success response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Server rejected the session token or credentials
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Operation needs a session token and none is stored
    #[error("Authentication required")]
    AuthRequired,

    /// Neither a token nor a username/password pair was configured
    #[error("Missing authentication credentials: a token or username and password are required")]
    MissingCredentials,

    /// Login/logout response did not carry a session
    #[error("No session in response")]
    NoSession,

    /// Response envelope lacks an expected field
    #[error("Response missing `{0}` field")]
    MissingField(&'static str),

    /// Remote path failed local validation
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Caller-supplied value is malformed
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Server or download URL could not be built
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Local file not found for upload
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Response body is not valid JSON
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// IO error during upload/download
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse classification of a [`StretchFsError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Credentials or session problems
    Auth,
    /// Rejected locally before anything was sent
    Validation,
    /// The request or response never completed
    Transport,
    /// The server answered, but not with what was asked for
    Server,
}

impl StretchFsError {
    /// Classify the error by cause.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AuthFailed(_) | Self::AuthRequired | Self::MissingCredentials | Self::NoSession => {
                ErrorKind::Auth
            }
            Self::InvalidPath(_)
            | Self::InvalidInput(_)
            | Self::InvalidUrl(_)
            | Self::FileNotFound(_)
            | Self::Config(_) => ErrorKind::Validation,
            Self::Network(_) | Self::Io(_) => ErrorKind::Transport,
            Self::ServerError { .. } | Self::MissingField(_) | Self::ParseError(_) => {
                ErrorKind::Server
            }
        }
    }
}

impl From<config::ConfigError> for StretchFsError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, StretchFsError>;
