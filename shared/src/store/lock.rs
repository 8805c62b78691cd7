//! Run lock guards
//!
//! A run holds exclusive access to both record sets from the first read to
//! the final pending clear. File-backed stores use an advisory lock file;
//! the in-memory store uses an owned async mutex guard.

use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::errors::{SharedError, SharedResult};

/// Held for the duration of one run; dropping it releases the lock
#[derive(Debug)]
pub struct StoreGuard {
    _inner: GuardInner,
}

#[derive(Debug)]
enum GuardInner {
    File { _lock: FileLock },
    Memory { _guard: OwnedMutexGuard<()> },
    Detached,
}

#[derive(Debug)]
struct FileLock {
    file: File,
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

impl StoreGuard {
    /// Acquire an exclusive advisory lock on `path`, creating the file if needed
    pub async fn acquire_file(path: PathBuf) -> SharedResult<Self> {
        tokio::task::spawn_blocking(move || -> SharedResult<Self> {
            let file = OpenOptions::new()
                .create(true)
                .read(true)
                .write(true)
                .truncate(false)
                .open(&path)
                .map_err(|err| SharedError::store("open lock", path.display().to_string(), err))?;

            match file.try_lock_exclusive() {
                Ok(()) => Ok(Self {
                    _inner: GuardInner::File {
                        _lock: FileLock { file },
                    },
                }),
                Err(err) if err.kind() == fs2::lock_contended_error().kind() => {
                    Err(SharedError::StoreLocked {
                        path: path.display().to_string(),
                    })
                }
                Err(err) => Err(SharedError::store("acquire lock", path.display().to_string(), err)),
            }
        })
        .await
        .map_err(|err| SharedError::store("join lock task", "store.lock", err))?
    }

    /// Acquire the in-memory run mutex without waiting
    pub fn acquire_memory(mutex: Arc<Mutex<()>>) -> SharedResult<Self> {
        let guard = mutex.try_lock_owned().map_err(|_| SharedError::StoreLocked {
            path: "<memory>".to_string(),
        })?;
        Ok(Self {
            _inner: GuardInner::Memory { _guard: guard },
        })
    }

    /// Guard that holds nothing, for stores with no competing writer
    pub fn detached() -> Self {
        Self {
            _inner: GuardInner::Detached,
        }
    }
}
