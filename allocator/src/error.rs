//! Allocator-specific error types

use shared::SharedError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AllocatorError {
    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Member {member} is missing required attribute '{attribute}'; substitute UNKNOWN before allocating")]
    MissingAttribute { member: String, attribute: String },

    #[error("Member {member} already belongs to {family}; re-run allocation instead of reassigning")]
    AlreadyAssigned { member: String, family: String },

    #[error("Member {member} appears more than once in the batch")]
    DuplicateMember { member: String },

    #[error("Run interrupted after appending {appended} of {total} assignments; re-run to resume: {source}")]
    AppendInterrupted {
        appended: usize,
        total: usize,
        #[source]
        source: SharedError,
    },

    #[error("Shared component error: {0}")]
    SharedError(#[from] SharedError),
}

impl AllocatorError {
    pub fn config(message: impl Into<String>) -> Self {
        AllocatorError::ConfigurationError { message: message.into() }
    }

    pub fn missing(member: impl Into<String>, attribute: &str) -> Self {
        AllocatorError::MissingAttribute {
            member: member.into(),
            attribute: attribute.to_string(),
        }
    }
}

pub type AllocatorResult<T> = Result<T, AllocatorError>;
