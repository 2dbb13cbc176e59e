use tracing::debug;

use super::{Chirp, Store, StoreError};

impl Store {
    /// Length limits are the caller's job.
    pub fn create_chirp(&self, body: &str) -> Result<Chirp, StoreError> {
        let chirp = self.commit(|data| {
            let chirp = Chirp {
                id: data.next_chirp_id,
                body: body.to_owned(),
            };
            data.snapshot.chirps.insert(chirp.id, chirp.clone());
            data.next_chirp_id += 1;
            Ok(chirp)
        })?;
        debug!(chirp_id = chirp.id, "chirp created");
        Ok(chirp)
    }

    /// All chirps, ascending by id.
    pub fn get_chirps(&self) -> Vec<Chirp> {
        // BTreeMap iteration is key-ordered.
        self.read(|data| data.snapshot.chirps.values().cloned().collect())
    }

    pub fn get_chirp(&self, id: u64) -> Result<Chirp, StoreError> {
        self.read(|data| data.snapshot.chirps.get(&id).cloned())
            .ok_or(StoreError::NotFound)
    }
}
