//! In-memory backend.
//!
//! Nothing survives the process. The snapshot still round-trips through JSON on
//! every save, so field loss shows up here the same way it would on disk.

use super::{RecordRepository, StoreSnapshot};
use crate::{LifeKeyError, LifeKeyResult};

#[derive(Clone, Debug, Default)]
pub struct MemoryRepository {
    blob: Option<String>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// The serialized snapshot as last saved, if any.
    pub fn raw(&self) -> Option<&str> {
        self.blob.as_deref()
    }
}

impl RecordRepository for MemoryRepository {
    fn load(&self) -> LifeKeyResult<StoreSnapshot> {
        match &self.blob {
            Some(blob) => serde_json::from_str(blob).map_err(LifeKeyError::Deserialization),
            None => Ok(StoreSnapshot::default()),
        }
    }

    fn save(&mut self, snapshot: &StoreSnapshot) -> LifeKeyResult<()> {
        self.blob = Some(serde_json::to_string(snapshot).map_err(LifeKeyError::Serialization)?);
        Ok(())
    }
}
