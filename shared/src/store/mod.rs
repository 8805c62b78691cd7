//! Record store abstraction
//!
//! The store holds two record sets: `assigned` (members already in a family)
//! and `pending` (registrations awaiting assignment). Both intake and the
//! allocator mutate the store only while holding the run lock returned by
//! [`RecordStore::lock`].

mod csv_store;
mod lock;
mod memory;

pub use csv_store::{read_csv_file, write_csv_file, CsvRecordStore};
pub use lock::StoreGuard;
pub use memory::InMemoryRecordStore;

use async_trait::async_trait;

use crate::errors::SharedResult;
use crate::types::Record;

#[mockall::automock]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All rows of the assigned set, in stored order
    async fn read_assigned(&self) -> SharedResult<Vec<Record>>;

    /// All rows of the pending set, in stored order
    async fn read_pending(&self) -> SharedResult<Vec<Record>>;

    /// Durably append one row to the assigned set
    async fn append_assigned(&self, record: &Record) -> SharedResult<()>;

    /// Durably append one row to the pending set
    async fn append_pending(&self, record: &Record) -> SharedResult<()>;

    /// Remove every pending row, header included
    async fn clear_pending(&self) -> SharedResult<()>;

    /// Write the pending header row into an empty pending set
    async fn append_pending_header(&self) -> SharedResult<()>;

    /// Take the store-wide run lock
    ///
    /// Fails with `StoreLocked` instead of waiting when another run holds it.
    /// The lock is released when the guard drops.
    async fn lock(&self) -> SharedResult<StoreGuard>;
}
