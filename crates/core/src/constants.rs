//! Constants used throughout the LifeKey core crate.

/// Default file for the file-backed store when no explicit path is configured.
pub const DEFAULT_DATA_FILE: &str = "lifekey_data/lifekey_patients.json";

/// Number of times the store re-mints an identifier that collides with a stored one.
pub const MAX_MINT_ATTEMPTS: usize = 5;

/// Environment variable naming the store file.
pub const ENV_DATA_FILE: &str = "LIFEKEY_DATA_FILE";

/// Environment variable naming the remote lookup base URL. Unset means mock mode.
pub const ENV_REMOTE_URL: &str = "LIFEKEY_REMOTE_URL";

/// Environment variable controlling demo seeding of an empty store.
pub const ENV_SEED_DEMO: &str = "LIFEKEY_SEED_DEMO";

/// Scheme tag at the start of a reference QR payload.
pub const QR_REFERENCE_SCHEME: &str = "LIFEKEY";

/// `type` value of a complete-record QR payload.
pub const QR_RECORD_TYPE: &str = "LIFEKEY_MEDICAL_RECORD";

/// `version` value of a complete-record QR payload.
pub const QR_RECORD_VERSION: &str = "1.0";
