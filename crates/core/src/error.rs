use lifekey_id::IdError;

/// Coarse error classes that callers branch on.
///
/// Every [`LifeKeyError`] maps to exactly one kind. UI layers use the kind to pick a
/// single non-blocking notice; tests use it to tell storage and remote failures apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required field is missing or malformed.
    Validation,
    /// A lookup matched no record.
    NotFound,
    /// The persistence medium could not be read or written.
    StorageUnavailable,
    /// A remote lookup failed before producing a record.
    RemoteUnavailable,
}

#[derive(Debug, thiserror::Error)]
pub enum LifeKeyError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid LifeKey ID: {0}")]
    InvalidId(#[from] IdError),

    #[error("patient record not found: {0}")]
    NotFound(String),

    #[error("failed to read patient store: {0}")]
    StorageRead(std::io::Error),
    #[error("failed to write patient store: {0}")]
    StorageWrite(std::io::Error),
    #[error("failed to serialize patient store: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize patient store: {0}")]
    Deserialization(serde_json::Error),
    #[error("no local patient store is open")]
    StoreNotOpen,

    #[error("remote lookup request failed: {0}")]
    RemoteRequest(reqwest::Error),
    #[error("remote lookup returned status {0}")]
    RemoteStatus(u16),
}

impl LifeKeyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LifeKeyError::InvalidInput(_) | LifeKeyError::InvalidId(_) => ErrorKind::Validation,
            LifeKeyError::NotFound(_) => ErrorKind::NotFound,
            LifeKeyError::StorageRead(_)
            | LifeKeyError::StorageWrite(_)
            | LifeKeyError::Serialization(_)
            | LifeKeyError::Deserialization(_)
            | LifeKeyError::StoreNotOpen => ErrorKind::StorageUnavailable,
            LifeKeyError::RemoteRequest(_) | LifeKeyError::RemoteStatus(_) => {
                ErrorKind::RemoteUnavailable
            }
        }
    }

    /// True for outcomes a responder screen shows as "no record for this ID".
    ///
    /// Remote failures are reported the same way as a missing record, but keep their
    /// own [`ErrorKind`] for logs and tests.
    pub fn is_lookup_miss(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::NotFound | ErrorKind::RemoteUnavailable
        )
    }
}

pub type LifeKeyResult<T> = std::result::Result<T, LifeKeyError>;
