//! Responder lookups.
//!
//! A lookup resolves a LifeKey ID to a patient record. Where it is resolved is a
//! configuration decision made once at startup:
//!
//! - with a remote base URL configured, [`RemoteLookupClient`] asks the remote service
//! - otherwise (mock mode) the local [`PatientStore`] answers
//!
//! Either way the caller gets a record or an explicit error value. Remote requests are
//! non-blocking, carry no timeout and are never retried.

use crate::config::CoreConfig;
use crate::qr::{parse_scan, EmergencyCard, ScannedCode};
use crate::record::PatientRecord;
use crate::store::PatientStore;
use crate::{LifeKeyError, LifeKeyResult};
use lifekey_id::LifeKeyId;
use reqwest::StatusCode;

/// HTTP client for a remote LifeKey service.
///
/// Expects `GET {base_url}/patients/{id}` to answer with a record JSON body, or `404`.
#[derive(Clone, Debug)]
pub struct RemoteLookupClient {
    http: reqwest::Client,
    base_url: String,
}

impl RemoteLookupClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches one record.
    ///
    /// # Errors
    ///
    /// - [`LifeKeyError::NotFound`] on `404`,
    /// - [`LifeKeyError::RemoteStatus`] on any other non-success status,
    /// - [`LifeKeyError::RemoteRequest`] if the request fails or the body is not a record.
    pub async fn fetch(&self, id: &LifeKeyId) -> LifeKeyResult<PatientRecord> {
        let url = format!("{}/patients/{}", self.base_url, id);
        tracing::debug!("remote lookup GET {}", url);

        let response = self.http.get(&url).send().await.map_err(|e| {
            tracing::warn!("remote lookup for {} failed: {}", id, e);
            LifeKeyError::RemoteRequest(e)
        })?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(LifeKeyError::NotFound(id.to_string())),
            status if status.is_success() => response
                .json::<PatientRecord>()
                .await
                .map_err(LifeKeyError::RemoteRequest),
            status => {
                tracing::warn!("remote lookup for {} returned {}", id, status);
                Err(LifeKeyError::RemoteStatus(status.as_u16()))
            }
        }
    }
}

/// Result of resolving a scanned QR payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// Looked up by identifier.
    Record(PatientRecord),
    /// Read directly from a complete-record code.
    Card(EmergencyCard),
}

/// Routes lookups to the remote service or the local store.
#[derive(Clone, Debug, Default)]
pub struct LookupRouter {
    remote: Option<RemoteLookupClient>,
}

impl LookupRouter {
    /// Local-store lookups only.
    pub fn local() -> Self {
        Self { remote: None }
    }

    pub fn remote(client: RemoteLookupClient) -> Self {
        Self {
            remote: Some(client),
        }
    }

    pub fn from_config(cfg: &CoreConfig) -> Self {
        match cfg.remote_base_url() {
            Some(url) => Self::remote(RemoteLookupClient::new(url)),
            None => Self::local(),
        }
    }

    pub fn is_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Resolves `raw_id` to a record.
    ///
    /// The identifier is validated before any query is issued. `store` is only
    /// consulted in mock mode; a remote router never touches it, so callers may pass
    /// `None` there.
    ///
    /// # Errors
    ///
    /// - [`LifeKeyError::InvalidId`] if `raw_id` is not a LifeKey ID,
    /// - [`LifeKeyError::NotFound`] if no record matches,
    /// - [`LifeKeyError::StoreNotOpen`] in mock mode without a store,
    /// - a storage-class error from the local store, or a remote-class error from the
    ///   remote service.
    pub async fn resolve(
        &self,
        store: Option<&PatientStore>,
        raw_id: &str,
    ) -> LifeKeyResult<PatientRecord> {
        let id = LifeKeyId::parse(raw_id)?;

        match (&self.remote, store) {
            (Some(client), _) => client.fetch(&id).await,
            (None, Some(store)) => store
                .find_by_id(id.as_str())?
                .ok_or_else(|| LifeKeyError::NotFound(id.to_string())),
            (None, None) => Err(LifeKeyError::StoreNotOpen),
        }
    }

    /// Resolves scanned QR text.
    ///
    /// Reference payloads go through [`resolve`](Self::resolve); complete-record
    /// payloads are returned as-is without touching any store.
    pub async fn resolve_scan(
        &self,
        store: Option<&PatientStore>,
        payload: &str,
    ) -> LifeKeyResult<Resolved> {
        match parse_scan(payload)? {
            ScannedCode::Reference(id) => self
                .resolve(store, id.as_str())
                .await
                .map(Resolved::Record),
            ScannedCode::Card(card) => Ok(Resolved::Card(card)),
        }
    }
}
