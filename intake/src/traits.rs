//! Intake trait definitions for dependency injection

use shared::Record;

/// Near-duplicate detection over an existing record set
#[mockall::automock]
pub trait DuplicateDetector: Send + Sync {
    /// First record in `pool` that looks like the same person as `candidate`
    ///
    /// A record matches when its canonical phone equals the candidate's or
    /// its name similarity (0-100) meets `threshold`. Implementations may
    /// layer further matching rules on top.
    fn find_conflict(&self, candidate: &Record, pool: &[Record], threshold: u8) -> Option<Record>;
}
