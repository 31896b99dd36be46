//! JSON-file backend.
//!
//! The whole store lives in one pretty-printed JSON file. Saves write a sibling
//! `.tmp` file first and rename it over the target, so a crash mid-write leaves the
//! previous snapshot intact.

use super::{RecordRepository, StoreSnapshot};
use crate::{LifeKeyError, LifeKeyResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug)]
pub struct FileRepository {
    path: PathBuf,
}

impl FileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl RecordRepository for FileRepository {
    fn load(&self) -> LifeKeyResult<StoreSnapshot> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(StoreSnapshot::default()),
            Err(e) => {
                tracing::warn!("failed to read patient store {}: {}", self.path.display(), e);
                return Err(LifeKeyError::StorageRead(e));
            }
        };

        if contents.trim().is_empty() {
            return Ok(StoreSnapshot::default());
        }

        serde_json::from_str(&contents).map_err(|e| {
            tracing::warn!("failed to parse patient store {}: {}", self.path.display(), e);
            LifeKeyError::Deserialization(e)
        })
    }

    fn save(&mut self, snapshot: &StoreSnapshot) -> LifeKeyResult<()> {
        let json = serde_json::to_string_pretty(snapshot).map_err(LifeKeyError::Serialization)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(LifeKeyError::StorageWrite)?;
            }
        }

        let temp = self.temp_path();
        fs::write(&temp, json).map_err(LifeKeyError::StorageWrite)?;
        fs::rename(&temp, &self.path).map_err(|e| {
            tracing::warn!("failed to replace patient store {}: {}", self.path.display(), e);
            let _ = fs::remove_file(&temp);
            LifeKeyError::StorageWrite(e)
        })
    }
}
