//! Core error types and utilities

use thiserror::Error;

/// Errors produced by the fleet controller and its components
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Initialization error: {0}")]
    InitializationError(String),

    /// The OS refused to create a child process
    #[error("Spawn error: {0}")]
    ProcessSpawn(String),

    /// The referenced id is not tracked
    #[error("No such process with ID: [{0}]")]
    ProcessNotFound(u32),

    /// An id was registered twice
    #[error("Process with ID [{0}] is already registered")]
    DuplicateProcess(u32),

    /// The registry holds no entries
    #[error("There are no processes to stop. Create one at least.")]
    NoProcesses,

    /// The OS rejected a kill request for a reason other than "already exited"
    #[error("Failed to terminate process [{pid}]: {reason}")]
    ProcessTermination { pid: u32, reason: String },

    #[error("Wait error: {0}")]
    ProcessWait(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CoreError {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::ConfigurationError(_) => "FLEET001",
            CoreError::ValidationError(_) => "FLEET002",
            CoreError::InitializationError(_) => "FLEET003",
            CoreError::ProcessSpawn(_) => "FLEET010",
            CoreError::ProcessNotFound(_) => "FLEET011",
            CoreError::DuplicateProcess(_) => "FLEET012",
            CoreError::NoProcesses => "FLEET013",
            CoreError::ProcessTermination { .. } => "FLEET014",
            CoreError::ProcessWait(_) => "FLEET015",
            CoreError::IoError(_) => "FLEET020",
        }
    }
}

/// Core-specific result type
pub type Result<T> = std::result::Result<T, CoreError>;
