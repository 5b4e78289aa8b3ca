//! Error types for atl-backup
//!
//! Every failure that ends a run is an [`Error`]. Polling failures that only
//! cost one attempt never surface here: the poller counts them against its
//! error budget and reports [`PollError`] once the budget or the overall
//! timeout is exhausted.
//!
//! The binary maps errors to process exit codes through [`ToExitCode`].

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for atl-backup operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for atl-backup
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "url")
        key: Option<String>,
    },

    /// Login was answered with something other than HTTP 200
    #[error("unable to login, status: {status}")]
    Auth {
        /// HTTP status returned by the login endpoint
        status: u16,
    },

    /// A control request was answered with an unexpected HTTP status
    #[error("unable to {operation}, status: {status}, body: {body}")]
    UnexpectedStatus {
        /// What was being attempted (e.g., "trigger backup")
        operation: String,
        /// HTTP status returned by the server
        status: u16,
        /// Response body, kept for diagnostics
        body: String,
    },

    /// The server answered with a payload that could not be interpreted
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Progress polling gave up
    #[error("polling error: {0}")]
    Poll(#[from] PollError),

    /// Archive download failed
    #[error("download error: {0}")]
    Download(#[from] DownloadError),

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Reasons the progress poller stops without a file identifier
#[derive(Debug, Error)]
pub enum PollError {
    /// Too many transient failures while retrieving progress
    #[error("too many http errors while retrieving backup progress ({errors} of {limit})")]
    TooManyErrors {
        /// Transient failures recorded on the session
        errors: u32,
        /// Configured error budget
        limit: u32,
    },

    /// The backup did not complete within the configured timeout
    #[error("timeout while waiting for backup completion after {elapsed:?} (limit {limit:?})")]
    TimedOut {
        /// Time elapsed since login
        elapsed: Duration,
        /// Configured timeout
        limit: Duration,
    },
}

/// Archive download errors
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Download endpoint answered with something other than HTTP 200
    #[error("unable to download, got http status {status} for {url}")]
    Status {
        /// HTTP status returned by the server
        status: u16,
        /// Download URL
        url: String,
    },

    /// Destination file could not be created
    #[error("unable to open file {} for writing: {source}", path.display())]
    CreateFile {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Writing the archive to disk failed midway
    #[error("error during write to file {}: {source}", path.display())]
    Write {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Maps errors to process exit codes and machine-readable names
pub trait ToExitCode {
    /// Process exit code for this error (never 0)
    fn exit_code(&self) -> u8;

    /// Machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToExitCode for Error {
    fn exit_code(&self) -> u8 {
        match self {
            Error::Config { .. } => 2,
            Error::Auth { .. } => 3,
            Error::UnexpectedStatus { .. } => 4,
            Error::Poll(_) => 5,
            Error::Download(_) => 6,
            Error::InvalidResponse(_)
            | Error::Network(_)
            | Error::Serialization(_) => 1,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Auth { .. } => "auth_failed",
            Error::UnexpectedStatus { .. } => "unexpected_status",
            Error::InvalidResponse(_) => "invalid_response",
            Error::Poll(PollError::TooManyErrors { .. }) => "too_many_errors",
            Error::Poll(PollError::TimedOut { .. }) => "poll_timeout",
            Error::Download(DownloadError::Status { .. }) => "download_status",
            Error::Download(DownloadError::CreateFile { .. }) => "download_create_file",
            Error::Download(DownloadError::Write { .. }) => "download_write",
            Error::Network(_) => "network_error",
            Error::Serialization(_) => "serialization_error",
        }
    }
}

impl Error {
    /// Shorthand for a configuration error tied to a key
    pub(crate) fn config(key: &str, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.to_string()),
        }
    }
}
