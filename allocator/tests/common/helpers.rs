//! Test helpers: seeded batch generation and a store that fails on demand

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use shared::{Gender, InMemoryRecordStore, Member, Record, RecordStore, SharedError, SharedResult, StoreGuard};

use super::fixtures::TestFixtures;

/// Random batch of complete members with distinct phones
#[allow(dead_code)]
pub fn random_batch(rng: &mut ChaCha8Rng, size: usize, with_activity: bool) -> Vec<Member> {
    (0..size)
        .map(|n| {
            let gender = if rng.gen_bool(0.5) { Gender::Male } else { Gender::Female };
            let age = TestFixtures::AGE_BRACKETS[rng.gen_range(0..TestFixtures::AGE_BRACKETS.len())];
            let activity = with_activity
                .then(|| TestFixtures::ACTIVITIES[rng.gen_range(0..TestFixtures::ACTIVITIES.len())]);
            TestFixtures::member(n, gender, age, activity)
        })
        .collect()
}

/// In-memory store whose `append_assigned` fails once `fail_after` rows were appended
#[allow(dead_code)]
pub struct FlakyStore {
    pub inner: InMemoryRecordStore,
    fail_after: usize,
    appended: AtomicUsize,
}

#[allow(dead_code)]
impl FlakyStore {
    pub fn new(inner: InMemoryRecordStore, fail_after: usize) -> Self {
        Self {
            inner,
            fail_after,
            appended: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl RecordStore for FlakyStore {
    async fn read_assigned(&self) -> SharedResult<Vec<Record>> {
        self.inner.read_assigned().await
    }

    async fn read_pending(&self) -> SharedResult<Vec<Record>> {
        self.inner.read_pending().await
    }

    async fn append_assigned(&self, record: &Record) -> SharedResult<()> {
        if self.appended.fetch_add(1, Ordering::SeqCst) >= self.fail_after {
            return Err(SharedError::store("append", "assigned", "store unreachable"));
        }
        self.inner.append_assigned(record).await
    }

    async fn append_pending(&self, record: &Record) -> SharedResult<()> {
        self.inner.append_pending(record).await
    }

    async fn clear_pending(&self) -> SharedResult<()> {
        self.inner.clear_pending().await
    }

    async fn append_pending_header(&self) -> SharedResult<()> {
        self.inner.append_pending_header().await
    }

    async fn lock(&self) -> SharedResult<StoreGuard> {
        self.inner.lock().await
    }
}
