//! Family allocation for the youth fellowship roster
//!
//! Places pending registrations into families so that family sizes stay
//! level, and restructures a whole roster so each family also gets a fair
//! mix of gender, age bracket and activity.
//!
//! ## Architecture
//!
//! - **core**: pure allocation logic, load tracking and statistics
//! - **assigner**: pending-set runs against a [`shared::RecordStore`]
//! - **restructure**: whole-roster redistribution from and to CSV files

pub mod assigner;
pub mod config;
pub mod core;
pub mod error;
pub mod restructure;

pub use assigner::{FamilyAssigner, RejectedRecord, RunSummary};
pub use config::{numbered_families, AllocatorConfig, DEFAULT_FAMILY_COUNT};
pub use core::{
    allocate, AllocationMode, AllocationPlan, Assignment, DistributionStats, FamilyRoster, GroupLoadTracker,
};
pub use error::{AllocatorError, AllocatorResult};
pub use restructure::{restructure, restructure_file, RestructureOutcome, ROSTER_COLUMNS};
