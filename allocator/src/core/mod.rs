//! Core allocation logic
//!
//! Pure functions and data structures with no store access.

pub mod allocator;
pub mod load_tracker;
pub mod normalize;
pub mod roster;
pub mod stats;

pub use allocator::{allocate, partition, Allocation, AllocationMode, AllocationPlan, Assignment, StratumKey};
pub use load_tracker::{GroupLoad, GroupLoadTracker};
pub use normalize::{normalize_roster, roster_member};
pub use roster::{FamilyRoster, RosterEntry};
pub use stats::{CrossTab, DistributionStats, FamilyBreakdown, Tally};
