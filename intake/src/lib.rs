//! Intake library for registering members awaiting family assignment
//!
//! Submissions are normalized (title-cased name, canonical phone), screened
//! for near-duplicates against both record sets, and appended to the
//! pending set for the allocator to pick up.

pub mod config;
pub mod core;
pub mod error;
pub mod registrar;
pub mod services;
pub mod traits;

pub use config::IntakeConfig;
pub use core::{token_sort_ratio, IntakeSubmission};
pub use error::{ConflictLocation, IntakeError, IntakeResult};
pub use registrar::Registrar;
pub use services::FuzzyDuplicateDetector;
pub use traits::*;
