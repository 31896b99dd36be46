//! # API Shared
//!
//! Request and response bodies for the LifeKey REST API, plus the shared
//! `HealthService`.
//!
//! Bodies derive `utoipa::ToSchema` for the OpenAPI document. Core types that carry
//! no schema (`PatientRecord`, `EmergencyCard`) are documented as free-form objects.

pub mod health;

pub use health::HealthService;

use lifekey_core::qr::EmergencyCard;
use lifekey_core::{PatientForm, PatientRecord};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Profile form as submitted by a registration or edit screen.
///
/// All fields are text. `allergies`, `conditions` and `medications` are
/// comma-delimited.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct PatientFormReq {
    pub name: String,
    pub phone: String,
    pub age: String,
    pub blood_group: String,
    pub allergies: String,
    pub conditions: String,
    pub medications: String,
    pub emergency_contact: String,
}

impl From<PatientFormReq> for PatientForm {
    fn from(req: PatientFormReq) -> Self {
        PatientForm {
            name: req.name,
            phone: req.phone,
            age: req.age,
            blood_group: req.blood_group,
            allergies: req.allergies,
            conditions: req.conditions,
            medications: req.medications,
            emergency_contact: req.emergency_contact,
        }
    }
}

/// A stored patient record, serialized exactly as the store persists it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct PatientRes(#[schema(value_type = Object)] pub PatientRecord);

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListPatientsRes {
    #[schema(value_type = Vec<Object>)]
    pub patients: Vec<PatientRecord>,
}

/// QR payload text for one patient.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QrCodesRes {
    pub life_key_id: String,
    /// `LIFEKEY:<id>`, resolved against a store when scanned.
    pub reference: String,
    /// Complete-record JSON, readable without a store.
    pub complete: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScanReq {
    pub payload: String,
}

/// Where a scanned payload's data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ScanSource {
    /// Looked up in the store by identifier.
    Store,
    /// Read from a complete-record code.
    Card,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScanRes {
    pub source: ScanSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub patient: Option<PatientRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub card: Option<EmergencyCard>,
}
