//! Patient record store.
//!
//! [`PatientStore`] owns identifier allocation, record upsert and lookup by
//! identifier. It holds no records itself: every operation loads the snapshot from its
//! [`RecordRepository`], works on it, and saves it back when it changed. A medium
//! failure therefore surfaces once, on the operation that hit it.
//!
//! ## Write discipline
//!
//! There is one logical writer. Upserts are last-writer-wins with no version token.
//! Each write stamps `last_updated` strictly after the previous stamp of the same
//! record.

use crate::constants::MAX_MINT_ATTEMPTS;
use crate::record::{next_write_stamp, PatientDraft, PatientRecord};
use crate::repositories::{RecordRepository, StoreSnapshot};
use crate::seed::demo_records;
use crate::{LifeKeyError, LifeKeyResult};
use lifekey_id::LifeKeyId;

/// Handle to the patient records behind one repository.
pub struct PatientStore {
    repo: Box<dyn RecordRepository + Send>,
}

impl std::fmt::Debug for PatientStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatientStore").finish_non_exhaustive()
    }
}

impl PatientStore {
    /// Opens a store over `repo`, seeding demo records into it if it is empty.
    ///
    /// # Errors
    ///
    /// Returns a storage-class error if the repository cannot be read, or cannot be
    /// written while seeding.
    pub fn open(
        repo: impl RecordRepository + Send + 'static,
        seed_demo_records: bool,
    ) -> LifeKeyResult<Self> {
        let mut store = Self {
            repo: Box::new(repo),
        };

        let snapshot = store.repo.load()?;
        if snapshot.patients.is_empty() && seed_demo_records {
            let seeded = StoreSnapshot {
                patients: demo_records()?,
            };
            store.repo.save(&seeded)?;
            tracing::info!("seeded {} demo patient records", seeded.patients.len());
        } else {
            tracing::debug!("opened patient store with {} records", snapshot.patients.len());
        }

        Ok(store)
    }

    /// Mints an identifier that no stored record uses.
    ///
    /// # Errors
    ///
    /// Returns [`LifeKeyError::InvalidInput`] if every attempt collided, or a
    /// storage-class error if the repository cannot be read.
    pub fn mint_id(&self) -> LifeKeyResult<LifeKeyId> {
        let snapshot = self.repo.load()?;
        Self::mint_unique(&snapshot, LifeKeyId::mint)
    }

    fn mint_unique(
        snapshot: &StoreSnapshot,
        mut id_source: impl FnMut() -> LifeKeyId,
    ) -> LifeKeyResult<LifeKeyId> {
        for _attempt in 0..MAX_MINT_ATTEMPTS {
            let id = id_source();
            if !snapshot.contains(id.as_str()) {
                return Ok(id);
            }
            tracing::debug!("minted identifier {} already in use, retrying", id);
        }

        Err(LifeKeyError::InvalidInput(format!(
            "failed to allocate a unique LifeKey ID after {} attempts",
            MAX_MINT_ATTEMPTS
        )))
    }

    /// Inserts or replaces `record`, keyed by its id.
    ///
    /// An existing record keeps its position in [`list_all`](Self::list_all); a new one
    /// is appended. `last_updated` is always restamped. Field contents are stored as
    /// given, including blank required fields.
    ///
    /// # Returns
    ///
    /// The record as stored, with its new stamp.
    pub fn upsert(&mut self, mut record: PatientRecord) -> LifeKeyResult<PatientRecord> {
        let mut snapshot = self.repo.load()?;

        match snapshot.position(record.id.as_str()) {
            Some(idx) => {
                record.last_updated = next_write_stamp(Some(snapshot.patients[idx].last_updated));
                snapshot.patients[idx] = record.clone();
                tracing::info!("replaced patient record {}", record.id);
            }
            None => {
                record.last_updated = next_write_stamp(None);
                snapshot.patients.push(record.clone());
                tracing::info!("created patient record {}", record.id);
            }
        }

        self.repo.save(&snapshot)?;
        Ok(record)
    }

    /// Looks up a record by a candidate identifier.
    ///
    /// The candidate is trimmed and uppercased first. Candidates that cannot be a
    /// LifeKey ID match nothing without touching the repository.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when no record matches; this is an expected outcome, not an error.
    pub fn find_by_id(&self, candidate: &str) -> LifeKeyResult<Option<PatientRecord>> {
        let Ok(id) = LifeKeyId::parse(candidate) else {
            tracing::debug!("lookup key {:?} is not a LifeKey ID", candidate);
            return Ok(None);
        };

        let snapshot = self.repo.load()?;
        let found = snapshot.patients.into_iter().find(|p| p.id == id);
        tracing::debug!("lookup {} -> {}", id, if found.is_some() { "hit" } else { "miss" });
        Ok(found)
    }

    /// All records in stored order.
    pub fn list_all(&self) -> LifeKeyResult<Vec<PatientRecord>> {
        Ok(self.repo.load()?.patients)
    }

    /// Creates a record for a newly submitted profile under a fresh identifier.
    pub fn register(&mut self, draft: PatientDraft) -> LifeKeyResult<PatientRecord> {
        let id = self.mint_id()?;
        self.upsert(PatientRecord::from_draft(id, draft))
    }

    /// Replaces the record stored under `id` with `draft`.
    ///
    /// # Errors
    ///
    /// - [`LifeKeyError::InvalidId`] if `id` is malformed,
    /// - [`LifeKeyError::NotFound`] if no record has that id.
    pub fn replace(&mut self, id: &str, draft: PatientDraft) -> LifeKeyResult<PatientRecord> {
        let id = LifeKeyId::parse(id)?;
        if !self.repo.load()?.contains(id.as_str()) {
            return Err(LifeKeyError::NotFound(id.to_string()));
        }
        self.upsert(PatientRecord::from_draft(id, draft))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::file::FileRepository;
    use crate::repositories::memory::MemoryRepository;
    use crate::ErrorKind;
    use chrono::{Duration, Utc};
    use tempfile::TempDir;

    fn empty_store() -> PatientStore {
        PatientStore::open(MemoryRepository::new(), false).unwrap()
    }

    fn draft(name: &str) -> PatientDraft {
        PatientDraft {
            name: name.into(),
            phone: "+1-555-0100".into(),
            allergies: vec!["Penicillin".into(), "Latex".into()],
            ..Default::default()
        }
    }

    /// Repository whose medium is gone.
    struct UnavailableRepository;

    impl RecordRepository for UnavailableRepository {
        fn load(&self) -> LifeKeyResult<StoreSnapshot> {
            Err(LifeKeyError::StorageRead(std::io::Error::other("storage offline")))
        }

        fn save(&mut self, _snapshot: &StoreSnapshot) -> LifeKeyResult<()> {
            Err(LifeKeyError::StorageWrite(std::io::Error::other("storage offline")))
        }
    }

    /// Repository that reads fine but refuses writes.
    #[derive(Default)]
    struct ReadOnlyRepository(MemoryRepository);

    impl RecordRepository for ReadOnlyRepository {
        fn load(&self) -> LifeKeyResult<StoreSnapshot> {
            self.0.load()
        }

        fn save(&mut self, _snapshot: &StoreSnapshot) -> LifeKeyResult<()> {
            Err(LifeKeyError::StorageWrite(std::io::Error::other("read-only")))
        }
    }

    #[test]
    fn open_seeds_empty_store_when_enabled() {
        let store = PatientStore::open(MemoryRepository::new(), true).unwrap();
        let records = store.list_all().unwrap();

        assert_eq!(records, demo_records().unwrap());
    }

    #[test]
    fn open_does_not_seed_when_disabled_or_populated() {
        let store = empty_store();
        assert!(store.list_all().unwrap().is_empty());

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("patients.json");
        let mut store = PatientStore::open(FileRepository::new(&path), false).unwrap();
        store.register(draft("Jane Roe")).unwrap();

        let reopened = PatientStore::open(FileRepository::new(&path), true).unwrap();
        let records = reopened.list_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Jane Roe");
    }

    #[test]
    fn upsert_then_find_returns_stored_record() {
        let mut store = empty_store();
        let id = store.mint_id().unwrap();
        let stored = store
            .upsert(PatientRecord::from_draft(id.clone(), draft("Jane Roe")))
            .unwrap();

        let found = store.find_by_id(id.as_str()).unwrap();
        assert_eq!(found, Some(stored));
    }

    #[test]
    fn upsert_same_id_replaces_in_place() {
        let mut store = PatientStore::open(MemoryRepository::new(), true).unwrap();
        let first = store.register(draft("Jane Roe")).unwrap();

        let mut changed = PatientRecord::from_draft(first.id.clone(), draft("Jane Q. Roe"));
        changed.blood_group = Some("AB-".into());
        let second = store.upsert(changed).unwrap();

        let records = store.list_all().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[2].id, first.id);
        assert_eq!(records[2].name, "Jane Q. Roe");
        assert_eq!(records[2].blood_group.as_deref(), Some("AB-"));
        assert!(second.last_updated > first.last_updated);
    }

    #[test]
    fn replacing_a_seeded_record_keeps_its_position() {
        let mut store = PatientStore::open(MemoryRepository::new(), true).unwrap();
        let john = store.find_by_id("LK-A1B2C3D4").unwrap().unwrap();

        let mut updated = john.clone();
        updated.medications.push("Aspirin".into());
        store.upsert(updated).unwrap();

        let records = store.list_all().unwrap();
        assert_eq!(records[0].id.as_str(), "LK-A1B2C3D4");
        assert_eq!(records[0].medications.last().map(String::as_str), Some("Aspirin"));
        assert!(records[0].last_updated > john.last_updated);
        assert_eq!(records[1].id.as_str(), "LK-E5F6G7H8");
    }

    #[test]
    fn stamp_increases_even_when_previous_is_in_the_future() {
        let mut store = empty_store();
        let mut record = store.register(draft("Jane Roe")).unwrap();

        // Simulate a stored stamp ahead of the wall clock.
        let ahead = Utc::now() + Duration::minutes(5);
        let mut snapshot = StoreSnapshot::default();
        record.last_updated = ahead;
        snapshot.patients.push(record.clone());
        store.repo.save(&snapshot).unwrap();

        let rewritten = store.upsert(record).unwrap();
        assert!(rewritten.last_updated > ahead);
    }

    #[test]
    fn find_is_case_insensitive() {
        let store = PatientStore::open(MemoryRepository::new(), true).unwrap();

        let found = store.find_by_id("lk-a1b2c3d4").unwrap().unwrap();
        assert_eq!(found.id.as_str(), "LK-A1B2C3D4");
        assert_eq!(found.name, "John Doe");

        assert!(store.find_by_id("  Lk-E5f6G7h8 ").unwrap().is_some());
    }

    #[test]
    fn find_unknown_or_malformed_id_is_none() {
        let store = PatientStore::open(MemoryRepository::new(), true).unwrap();

        assert_eq!(store.find_by_id("LK-ZZZZZZZZ").unwrap(), None);
        assert_eq!(store.find_by_id("patient_123").unwrap(), None);
        assert_eq!(store.find_by_id("").unwrap(), None);
    }

    #[test]
    fn register_mints_prefixed_id_and_splits_lists() {
        let mut store = empty_store();
        let record = store.register(draft("Jane Roe")).unwrap();

        assert!(lifekey_id::LifeKeyId::is_canonical(record.id.as_str()));
        assert!(record.id.as_str().starts_with("LK-"));
        assert_eq!(record.allergies, vec!["Penicillin", "Latex"]);
        assert!(record.last_updated > chrono::DateTime::<Utc>::default());
    }

    #[test]
    fn blank_required_fields_are_stored_as_given() {
        let mut store = empty_store();
        let record = store
            .register(PatientDraft {
                name: String::new(),
                phone: String::new(),
                ..Default::default()
            })
            .unwrap();

        let found = store.find_by_id(record.id.as_str()).unwrap().unwrap();
        assert_eq!(found.name, "");
        assert_eq!(found.phone, "");
    }

    #[test]
    fn replace_requires_existing_record() {
        let mut store = empty_store();

        let err = store.replace("LK-ABCDEFGH", draft("Nobody")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = store.replace("not-an-id", draft("Nobody")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let created = store.register(draft("Jane Roe")).unwrap();
        let lower = created.id.as_str().to_lowercase();
        let replaced = store.replace(&lower, draft("Jane Doe")).unwrap();
        assert_eq!(replaced.id, created.id);
        assert_eq!(store.list_all().unwrap().len(), 1);
    }

    #[test]
    fn mint_unique_skips_stored_ids() {
        let snapshot = StoreSnapshot {
            patients: demo_records().unwrap(),
        };
        let taken = LifeKeyId::parse("LK-A1B2C3D4").unwrap();
        let free = LifeKeyId::parse("LK-00000001").unwrap();
        let mut candidates = vec![free.clone(), taken.clone(), taken].into_iter().rev();

        let minted = PatientStore::mint_unique(&snapshot, || candidates.next().unwrap()).unwrap();
        assert_eq!(minted, free);
    }

    #[test]
    fn mint_unique_gives_up_after_max_attempts() {
        let snapshot = StoreSnapshot {
            patients: demo_records().unwrap(),
        };
        let taken = LifeKeyId::parse("LK-E5F6G7H8").unwrap();
        let mut calls = 0;

        let result = PatientStore::mint_unique(&snapshot, || {
            calls += 1;
            taken.clone()
        });
        assert!(result.is_err());
        assert_eq!(calls, MAX_MINT_ATTEMPTS);
    }

    #[test]
    fn unavailable_storage_fails_each_operation_once() {
        assert_eq!(
            PatientStore::open(UnavailableRepository, false)
                .unwrap_err()
                .kind(),
            ErrorKind::StorageUnavailable
        );

        let mut store = PatientStore {
            repo: Box::new(UnavailableRepository),
        };
        let record = PatientRecord::from_draft(LifeKeyId::mint(), draft("Jane Roe"));

        assert_eq!(
            store.upsert(record).unwrap_err().kind(),
            ErrorKind::StorageUnavailable
        );
        assert_eq!(
            store.find_by_id("LK-A1B2C3D4").unwrap_err().kind(),
            ErrorKind::StorageUnavailable
        );
        assert_eq!(
            store.list_all().unwrap_err().kind(),
            ErrorKind::StorageUnavailable
        );
    }

    #[test]
    fn malformed_key_is_none_even_when_storage_is_down() {
        let store = PatientStore {
            repo: Box::new(UnavailableRepository),
        };

        assert_eq!(store.find_by_id("patient_123").unwrap(), None);
        assert_eq!(store.find_by_id("  ").unwrap(), None);
    }

    #[test]
    fn failed_save_does_not_persist() {
        let mut store = PatientStore::open(ReadOnlyRepository::default(), false).unwrap();

        let err = store.register(draft("Jane Roe")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StorageUnavailable);
        assert!(store.list_all().unwrap().is_empty());
    }
}
