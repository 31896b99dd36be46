//! Persistence backends for the patient store.
//!
//! The store never touches a storage medium directly. It reads a whole
//! [`StoreSnapshot`] through [`RecordRepository::load`], changes it, and hands it back
//! through [`RecordRepository::save`]. Any backend that can hold one serialized blob
//! can sit behind it:
//!
//! - [`file::FileRepository`]: a JSON file on local disk
//! - [`memory::MemoryRepository`]: process memory, for tests and throwaway sessions

pub mod file;
pub mod memory;

use crate::record::PatientRecord;
use crate::LifeKeyResult;
use serde::{Deserialize, Serialize};

/// Persisted state layout: `{ "patients": [PatientRecord, ...] }`.
///
/// A missing `patients` key reads as an empty store and unknown top-level keys are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub patients: Vec<PatientRecord>,
}

impl StoreSnapshot {
    pub fn position(&self, id: &str) -> Option<usize> {
        self.patients.iter().position(|p| p.id.as_str() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }
}

/// Scoped access to one serialized [`StoreSnapshot`].
///
/// Implementations report medium failures as storage-class
/// [`LifeKeyError`](crate::LifeKeyError) variants and never retry.
pub trait RecordRepository {
    /// Reads the current snapshot. An absent blob is an empty snapshot, not an error.
    fn load(&self) -> LifeKeyResult<StoreSnapshot>;

    /// Replaces the stored snapshot.
    fn save(&mut self, snapshot: &StoreSnapshot) -> LifeKeyResult<()>;
}

impl<R: RecordRepository + ?Sized> RecordRepository for Box<R> {
    fn load(&self) -> LifeKeyResult<StoreSnapshot> {
        (**self).load()
    }

    fn save(&mut self, snapshot: &StoreSnapshot) -> LifeKeyResult<()> {
        (**self).save(snapshot)
    }
}
