//! Shared error types for the family allocation system

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SharedError {
    #[error("Invalid phone number '{input}': must normalize to 11 digits starting with 0")]
    InvalidPhone { input: String },

    #[error("Invalid gender '{input}': expected MALE or FEMALE")]
    InvalidGender { input: String },

    #[error("Invalid age range '{input}'")]
    InvalidAgeBracket { input: String },

    #[error("Record store is locked by another run: {path}")]
    StoreLocked { path: String },

    #[error("Record store operation failed: {operation} on {path}: {message}")]
    StoreError {
        operation: String,
        path: String,
        message: String,
    },

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SharedError {
    pub fn store(operation: impl Into<String>, path: impl Into<String>, message: impl ToString) -> Self {
        SharedError::StoreError {
            operation: operation.into(),
            path: path.into(),
            message: message.to_string(),
        }
    }
}

pub type SharedResult<T> = Result<T, SharedError>;
