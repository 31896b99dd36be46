//! QR payload text.
//!
//! Two payloads are printed for each patient:
//!
//! - a *reference* payload, `LIFEKEY:<id>`, which a responder resolves against a store
//! - a *complete* payload, an [`EmergencyCard`] JSON document carrying the medical
//!   data itself, readable with no store at all
//!
//! Turning these strings into images is left to whichever QR renderer the front end
//! uses.

use crate::constants::{QR_RECORD_TYPE, QR_RECORD_VERSION, QR_REFERENCE_SCHEME};
use crate::record::PatientRecord;
use crate::{LifeKeyError, LifeKeyResult};
use chrono::{DateTime, Utc};
use lifekey_id::LifeKeyId;
use serde::{Deserialize, Serialize};

/// Self-contained emergency data embedded in a complete-record QR code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyCard {
    #[serde(rename = "type")]
    pub kind: String,
    pub version: String,
    pub patient_id: LifeKeyId,
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_group: Option<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub medications: Vec<String>,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl EmergencyCard {
    pub fn from_record(record: &PatientRecord, timestamp: DateTime<Utc>) -> Self {
        Self {
            kind: QR_RECORD_TYPE.to_string(),
            version: QR_RECORD_VERSION.to_string(),
            patient_id: record.id.clone(),
            name: record.name.clone(),
            phone: record.phone.clone(),
            blood_group: record.blood_group.clone(),
            allergies: record.allergies.clone(),
            medications: record.medications.clone(),
            conditions: record.conditions.clone(),
            emergency_contact: record.emergency_contact.clone(),
            timestamp,
        }
    }
}

/// What a scanned payload turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScannedCode {
    /// An identifier to resolve against a store.
    Reference(LifeKeyId),
    /// Medical data carried in the code itself.
    Card(EmergencyCard),
}

/// `LIFEKEY:<id>`
pub fn reference_payload(id: &LifeKeyId) -> String {
    format!("{}:{}", QR_REFERENCE_SCHEME, id)
}

/// JSON for the complete-record code, timestamped `generated_at`.
pub fn complete_payload(record: &PatientRecord, generated_at: DateTime<Utc>) -> LifeKeyResult<String> {
    serde_json::to_string(&EmergencyCard::from_record(record, generated_at))
        .map_err(LifeKeyError::Serialization)
}

/// Classifies scanned text.
///
/// Accepted forms, in order:
/// 1. `LIFEKEY:<id>` with optional trailing `:`-separated segments, which are ignored
/// 2. a bare LifeKey ID, in any case
/// 3. an [`EmergencyCard`] JSON document whose `type` is `LIFEKEY_MEDICAL_RECORD`
///
/// # Errors
///
/// Returns a validation-class error for anything else, including a `LIFEKEY:` payload
/// whose identifier is malformed.
pub fn parse_scan(text: &str) -> LifeKeyResult<ScannedCode> {
    let text = text.trim();

    if let Some(rest) = text
        .strip_prefix(QR_REFERENCE_SCHEME)
        .and_then(|rest| rest.strip_prefix(':'))
    {
        let id_part = rest.split(':').next().unwrap_or_default();
        return Ok(ScannedCode::Reference(LifeKeyId::parse(id_part)?));
    }

    if let Ok(id) = LifeKeyId::parse(text) {
        return Ok(ScannedCode::Reference(id));
    }

    if text.starts_with('{') {
        if let Ok(card) = serde_json::from_str::<EmergencyCard>(text) {
            if card.kind == QR_RECORD_TYPE {
                return Ok(ScannedCode::Card(card));
            }
        }
    }

    Err(LifeKeyError::InvalidInput(
        "not a LifeKey QR code".into(),
    ))
}
