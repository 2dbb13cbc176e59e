//! Whole-document JSON codec for the backing file.
//!
//! Every save rewrites the entire file, so each mutation costs I/O
//! proportional to the dataset. Fine at this scale; an append-only log with
//! compaction would be the next step if that stops being true.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::error::StoreError;
use super::models::{Chirp, RefreshToken, User};

/// Everything the store holds, in the shape written to disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub users: BTreeMap<u64, User>,
    #[serde(default)]
    pub chirps: BTreeMap<u64, Chirp>,
    #[serde(default)]
    pub refresh_tokens: BTreeMap<String, RefreshToken>,
}

#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the backing file holding an empty snapshot if it is missing.
    pub fn ensure(&self) -> Result<(), StoreError> {
        if self.path.exists() {
            return Ok(());
        }
        info!(path = %self.path.display(), "creating empty database file");
        self.save(&Snapshot::default())
    }

    /// Read the backing file. Missing or blank files load as empty.
    pub fn load(&self) -> Result<Snapshot, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Snapshot::default()),
            Err(e) => return Err(self.persistence(e)),
        };
        if raw.trim().is_empty() {
            return Ok(Snapshot::default());
        }

        let snapshot: Snapshot =
            serde_json::from_str(&raw).map_err(|e| self.corrupt(e.to_string()))?;
        self.check_keys(&snapshot)?;

        debug!(
            users = snapshot.users.len(),
            chirps = snapshot.chirps.len(),
            refresh_tokens = snapshot.refresh_tokens.len(),
            "database loaded"
        );
        Ok(snapshot)
    }

    /// Replace the backing file with `snapshot`.
    ///
    /// Writes a sibling temp file, syncs it, then renames it over the target.
    pub fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(snapshot)
            .map_err(|e| self.persistence(io::Error::new(io::ErrorKind::InvalidData, e)))?;

        let tmp_path = self.path.with_extension("json.tmp");
        let write = || -> io::Result<()> {
            let mut file = File::create(&tmp_path)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
            fs::rename(&tmp_path, &self.path)
        };
        write().map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            self.persistence(e)
        })
    }

    fn check_keys(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        if let Some((key, user)) = snapshot.users.iter().find(|(k, u)| **k != u.id) {
            return Err(self.corrupt(format!("user under key {key} has id {}", user.id)));
        }
        if let Some((key, chirp)) = snapshot.chirps.iter().find(|(k, c)| **k != c.id) {
            return Err(self.corrupt(format!("chirp under key {key} has id {}", chirp.id)));
        }
        if snapshot.refresh_tokens.iter().any(|(k, t)| *k != t.token) {
            return Err(self.corrupt("refresh token stored under a different key".into()));
        }
        Ok(())
    }

    fn persistence(&self, source: io::Error) -> StoreError {
        StoreError::Persistence {
            path: self.path.clone(),
            source,
        }
    }

    fn corrupt(&self, reason: String) -> StoreError {
        StoreError::CorruptData {
            path: self.path.clone(),
            reason,
        }
    }
}
