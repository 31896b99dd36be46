//! The patient record and its write timestamps.
//!
//! A [`PatientRecord`] is the only entity the store holds. Records are created from a
//! validated [`PatientDraft`] and replaced wholesale on update; there is no partial
//! field patching.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use lifekey_id::LifeKeyId;
use serde::{Deserialize, Serialize};

/// Emergency-relevant profile of one patient, keyed by a LifeKey identifier.
///
/// JSON uses camelCase keys and names the identifier `lifeKeyId`. List fields default
/// to empty when absent, so "missing list" and "empty list" are indistinguishable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    #[serde(rename = "lifeKeyId", alias = "id")]
    pub id: LifeKeyId,
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_group: Option<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub medications: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<String>,
    pub last_updated: DateTime<Utc>,
}

impl PatientRecord {
    /// Builds a record for `id` from validated form data.
    ///
    /// `last_updated` is left at the epoch; the store stamps it on write.
    pub fn from_draft(id: LifeKeyId, draft: PatientDraft) -> Self {
        Self {
            id,
            name: draft.name,
            phone: draft.phone,
            age: draft.age,
            blood_group: draft.blood_group,
            allergies: draft.allergies,
            conditions: draft.conditions,
            medications: draft.medications,
            emergency_contact: draft.emergency_contact,
            last_updated: DateTime::<Utc>::default(),
        }
    }

    /// True when the record carries any allergy, condition or medication.
    pub fn has_clinical_alerts(&self) -> bool {
        !(self.allergies.is_empty() && self.conditions.is_empty() && self.medications.is_empty())
    }
}

/// Validated patient data without an identifier or timestamp.
///
/// Produced by [`crate::form::PatientForm::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientDraft {
    pub name: String,
    pub phone: String,
    pub age: Option<u32>,
    pub blood_group: Option<String>,
    pub allergies: Vec<String>,
    pub conditions: Vec<String>,
    pub medications: Vec<String>,
    pub emergency_contact: Option<String>,
}

/// Returns the `last_updated` stamp for a write.
///
/// The stamp has millisecond precision. If `previous` is provided, the result is
/// guaranteed to be strictly greater than it (by at least 1 ms), even when the wall
/// clock has not advanced or has stepped backwards.
pub fn next_write_stamp(previous: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now().trunc_subsecs(3);

    match previous {
        Some(prev) if now <= prev => prev + Duration::milliseconds(1),
        _ => now,
    }
}
