//! CLI error types

use fleet_core::CoreError;
use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// A stop-list id token is not a process id
    #[error("Could not parse process id '{0}'")]
    ParseError(String),

    /// A stop-list command named no ids at all
    #[error("No process ids given")]
    MissingIds,

    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CliError {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            CliError::ParseError(_) => "CLI001",
            CliError::MissingIds => "CLI002",
            CliError::Core(e) => e.code(),
            CliError::IoError(_) => "CLI008",
        }
    }
}

/// CLI-specific result type
pub type Result<T> = std::result::Result<T, CliError>;
