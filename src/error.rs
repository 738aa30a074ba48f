//! Custom error types for dbbackup
//!
//! This module defines the error taxonomy for the backup service using
//! thiserror for ergonomic error definitions. The variants distinguish
//! recoverable per-file failures from cycle-fatal conditions.

use thiserror::Error;

/// The main error type for backup operations
#[derive(Error, Debug)]
pub enum BackupError {
    /// Configuration-related errors (bad addresses, unparseable run time)
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors (copy failures, directory scan failures)
    #[error("I/O error: {0}")]
    Io(String),

    /// SMTP authentication errors
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Network errors (connection, TLS, timeouts)
    #[error("Network error: {0}")]
    Network(String),

    /// Anything that does not fit the classes above
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl BackupError {
    /// Check if this is an I/O error
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }

    /// Check if this is an authentication error
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }
}

impl From<std::io::Error> for BackupError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type alias for backup operations
pub type BackupResult<T> = Result<T, BackupError>;
