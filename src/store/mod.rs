//! Embedded JSON document store for users, chirps and refresh tokens.
//!
//! The whole dataset lives in memory behind one `RwLock`. Reads take the
//! shared lock. Mutations take the exclusive lock, apply their change to a
//! working copy, write that copy to disk and only then install it, so memory
//! and the backing file never disagree after a call returns.

mod chirps;
mod codec;
mod error;
pub mod models;
mod password;
mod refresh_tokens;
mod users;

use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use time::Duration;
use tracing::info;

pub use codec::Snapshot;
pub use error::StoreError;
pub use models::{Chirp, RefreshToken, User};

#[derive(Debug, Clone)]
struct Dataset {
    snapshot: Snapshot,
    next_user_id: u64,
    next_chirp_id: u64,
}

impl Dataset {
    fn from_snapshot(snapshot: Snapshot) -> Self {
        let next_user_id = snapshot.users.keys().next_back().map_or(1, |id| id + 1);
        let next_chirp_id = snapshot.chirps.keys().next_back().map_or(1, |id| id + 1);
        Self {
            snapshot,
            next_user_id,
            next_chirp_id,
        }
    }
}

pub struct Store {
    codec: codec::JsonFile,
    refresh_ttl: Duration,
    inner: RwLock<Dataset>,
}

impl Store {
    /// Open (creating if needed) the backing file at `path` and load it.
    pub fn open(path: impl Into<PathBuf>, refresh_ttl: Duration) -> Result<Self, StoreError> {
        let codec = codec::JsonFile::new(path);
        codec.ensure()?;
        let dataset = Dataset::from_snapshot(codec.load()?);

        info!(
            path = %codec.path().display(),
            users = dataset.snapshot.users.len(),
            chirps = dataset.snapshot.chirps.len(),
            next_user_id = dataset.next_user_id,
            next_chirp_id = dataset.next_chirp_id,
            "store opened"
        );
        Ok(Self {
            codec,
            refresh_ttl,
            inner: RwLock::new(dataset),
        })
    }

    pub fn path(&self) -> &Path {
        self.codec.path()
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    fn read<T>(&self, f: impl FnOnce(&Dataset) -> T) -> T {
        let guard = self.read_guard();
        f(&*guard)
    }

    /// Run a mutation under the write lock.
    ///
    /// `f` works on a copy; the copy replaces the live dataset only after it
    /// has been saved. Any error from `f` or from the save leaves the live
    /// dataset as it was.
    fn commit<T>(
        &self,
        f: impl FnOnce(&mut Dataset) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut guard = self.write_guard();
        let mut working = guard.clone();
        let out = f(&mut working)?;
        self.codec.save(&working.snapshot)?;
        *guard = working;
        Ok(out)
    }

    // The live dataset is only ever swapped for a fully saved copy, so a
    // poisoned guard still holds committed state.
    fn read_guard(&self) -> RwLockReadGuard<'_, Dataset> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, Dataset> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn open_in(dir: &tempfile::TempDir) -> Store {
        Store::open(dir.path().join("database.json"), Duration::days(60)).unwrap()
    }

    impl Store {
        /// Copy of the current dataset.
        pub fn snapshot(&self) -> Snapshot {
            self.read(|data| data.snapshot.clone())
        }
    }
}
