//! Error types for the cesantías agent.
//!
//! This module defines a unified error enum that covers all error categories
//! in the application. Only load-time and input-validation failures surface
//! as errors; a missing record or an unmatched question is a normal answer.

use thiserror::Error;

/// Unified error type for the cesantías agent.
///
/// All fallible functions in the workspace return `Result<T, AppError>`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The severance data source is missing, unreadable or malformed
    #[error("Data load error: {0}")]
    DataLoad(String),

    /// The question was empty or not textual
    #[error("Input error: {0}")]
    Input(String),

    /// Knowledge corpus errors
    #[error("Knowledge error: {0}")]
    Knowledge(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Whether the error was caused by the caller's input rather than the system.
    pub fn is_client_error(&self) -> bool {
        matches!(self, AppError::Input(_))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::DataLoad(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = AppError::DataLoad("missing column 'monto'".to_string());
        assert_eq!(err.to_string(), "Data load error: missing column 'monto'");

        let err = AppError::Input("question is empty".to_string());
        assert_eq!(err.to_string(), "Input error: question is empty");
    }

    #[test]
    fn test_client_error_classification() {
        assert!(AppError::Input("empty".to_string()).is_client_error());
        assert!(!AppError::DataLoad("bad".to_string()).is_client_error());
        assert!(!AppError::Config("bad".to_string()).is_client_error());
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: AppError = io.into();
        assert!(matches!(err, AppError::Io(_)));
    }
}
