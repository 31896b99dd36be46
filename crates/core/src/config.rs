//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core
//! services. Request handling never reads process-wide environment variables.

use crate::constants::DEFAULT_DATA_FILE;
use crate::{LifeKeyError, LifeKeyResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_file: PathBuf,
    remote_base_url: Option<String>,
    seed_demo_records: bool,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// `remote_base_url`, when present, must be an absolute `http`/`https` URL.
    pub fn new(
        data_file: PathBuf,
        remote_base_url: Option<String>,
        seed_demo_records: bool,
    ) -> LifeKeyResult<Self> {
        if data_file.as_os_str().is_empty() {
            return Err(LifeKeyError::InvalidInput(
                "data_file cannot be empty".into(),
            ));
        }

        let remote_base_url = match remote_base_url {
            Some(url) => Some(validate_remote_base_url(&url)?),
            None => None,
        };

        Ok(Self {
            data_file,
            remote_base_url,
            seed_demo_records,
        })
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    pub fn remote_base_url(&self) -> Option<&str> {
        self.remote_base_url.as_deref()
    }

    /// True when no remote source is configured and lookups use the local store.
    pub fn is_mock_mode(&self) -> bool {
        self.remote_base_url.is_none()
    }

    pub fn seed_demo_records(&self) -> bool {
        self.seed_demo_records
    }
}

fn validate_remote_base_url(url: &str) -> LifeKeyResult<String> {
    let url = url.trim().trim_end_matches('/');
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(LifeKeyError::InvalidInput(format!(
            "remote base URL must start with http:// or https://, got: '{}'",
            url
        )));
    }
    if url.contains(char::is_whitespace) {
        return Err(LifeKeyError::InvalidInput(
            "remote base URL must not contain whitespace".into(),
        ));
    }
    Ok(url.to_string())
}

/// Resolve the store file from an optional environment value.
///
/// Empty or whitespace values fall back to [`DEFAULT_DATA_FILE`].
pub fn data_file_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE))
}

/// Parse the remote base URL from an optional environment value.
///
/// `None` or blank means mock mode.
pub fn remote_base_url_from_env_value(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse the demo-seed flag from an optional environment value.
///
/// Unset or blank defaults to `true`, matching the demo's mock mode.
pub fn seed_flag_from_env_value(value: Option<String>) -> LifeKeyResult<bool> {
    let value = value
        .map(|v| v.trim().to_ascii_lowercase())
        .filter(|v| !v.is_empty());

    match value.as_deref() {
        None => Ok(true),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(other) => Err(LifeKeyError::InvalidInput(format!(
            "seed flag must be true or false, got: '{}'",
            other
        ))),
    }
}
