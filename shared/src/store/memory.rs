//! In-memory record store used for restructuring runs and tests

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{RecordStore, StoreGuard};
use crate::errors::SharedResult;
use crate::types::Record;

#[derive(Debug, Default)]
struct Sets {
    assigned: Vec<Record>,
    pending: Vec<Record>,
    /// Number of times the pending header was rewritten
    pending_headers: usize,
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryRecordStore {
    sets: Arc<Mutex<Sets>>,
    run_lock: Arc<Mutex<()>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(assigned: Vec<Record>, pending: Vec<Record>) -> Self {
        Self {
            sets: Arc::new(Mutex::new(Sets {
                assigned,
                pending,
                pending_headers: 0,
            })),
            run_lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn assigned(&self) -> Vec<Record> {
        self.sets.lock().await.assigned.clone()
    }

    pub async fn pending(&self) -> Vec<Record> {
        self.sets.lock().await.pending.clone()
    }

    pub async fn pending_header_writes(&self) -> usize {
        self.sets.lock().await.pending_headers
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn read_assigned(&self) -> SharedResult<Vec<Record>> {
        Ok(self.assigned().await)
    }

    async fn read_pending(&self) -> SharedResult<Vec<Record>> {
        Ok(self.pending().await)
    }

    async fn append_assigned(&self, record: &Record) -> SharedResult<()> {
        self.sets.lock().await.assigned.push(record.clone());
        Ok(())
    }

    async fn append_pending(&self, record: &Record) -> SharedResult<()> {
        self.sets.lock().await.pending.push(record.clone());
        Ok(())
    }

    async fn clear_pending(&self) -> SharedResult<()> {
        self.sets.lock().await.pending.clear();
        Ok(())
    }

    async fn append_pending_header(&self) -> SharedResult<()> {
        self.sets.lock().await.pending_headers += 1;
        Ok(())
    }

    async fn lock(&self) -> SharedResult<StoreGuard> {
        StoreGuard::acquire_memory(self.run_lock.clone())
    }
}
