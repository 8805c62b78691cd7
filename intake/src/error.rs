//! Intake error types

use shared::SharedError;
use thiserror::Error;

/// Where an existing near-duplicate was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictLocation {
    /// Already placed in a family
    Assigned { family: String },
    /// Waiting in the pending set
    Pending { submitted_at: String },
}

/// Result type for intake operations
pub type IntakeResult<T> = Result<T, IntakeError>;

#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("Invalid submission: {field}: {message}")]
    InvalidSubmission { field: String, message: String },

    #[error("{}", describe_conflict(.candidate, .existing_name, .existing_phone, .location))]
    DuplicateConflict {
        candidate: String,
        existing_name: String,
        existing_phone: String,
        location: ConflictLocation,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Shared component error: {0}")]
    Shared(#[from] SharedError),
}

impl IntakeError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        IntakeError::InvalidSubmission {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        IntakeError::ConfigError { message: message.into() }
    }
}

fn describe_conflict(candidate: &str, name: &str, phone: &str, location: &ConflictLocation) -> String {
    match location {
        ConflictLocation::Assigned { family } => format!(
            "Registration for {candidate} halted: a similar registration already exists: {name} (Phone: {phone}) assigned to {family}"
        ),
        ConflictLocation::Pending { submitted_at } => format!(
            "Registration for {candidate} halted: a similar submission already exists: {name} (Phone: {phone}) submitted on {submitted_at}. Please wait to be assigned"
        ),
    }
}
