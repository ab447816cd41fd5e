use std::result::Result as StdResult;

use thiserror::Error;

/// Unified error type for the store, review, and submission layers.
#[derive(Error, Debug)]
pub enum WizardError {
    #[error("Persistence error: {0}")]
    StorageError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Form is incomplete: {0}")]
    Incomplete(String),
    #[error("Submission already in progress")]
    SubmissionInProgress,
    #[error("Application already submitted; start over to submit another")]
    AlreadySubmitted,
    #[error("Submission failed: {0}")]
    SubmissionFailed(String),
}

pub type Result<T> = StdResult<T, WizardError>;

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] WizardError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
    #[error("Terminal error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<std::io::Error> for WizardError {
    fn from(err: std::io::Error) -> Self {
        WizardError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for WizardError {
    fn from(err: serde_json::Error) -> Self {
        WizardError::StorageError(err.to_string())
    }
}

impl From<crate::config::ConfigError> for WizardError {
    fn from(err: crate::config::ConfigError) -> Self {
        match err {
            crate::config::ConfigError::Io(io) => WizardError::StorageError(io.to_string()),
            crate::config::ConfigError::Serde(message) => WizardError::ConfigError(message),
        }
    }
}
