//! Core intake logic
//!
//! Pure normalization and scoring with no I/O dependencies.

pub mod similarity;
pub mod submission;

pub use similarity::{sorted_tokens, token_sort_ratio};
pub use submission::{IntakeSubmission, TIMESTAMP_FORMAT};
