//! Shared types for the family allocation system
//!
//! Contains the member and record types used by both intake and allocation,
//! the record store abstraction with its file-backed and in-memory
//! implementations, and common logging setup.

pub mod errors;
pub mod logging;
pub mod store;
pub mod types;

pub use errors::*;
pub use types::*;

pub use store::{read_csv_file, write_csv_file, CsvRecordStore, InMemoryRecordStore, RecordStore, StoreGuard};
