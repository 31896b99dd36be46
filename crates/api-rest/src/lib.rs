//! # API REST
//!
//! REST API for LifeKey.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON bodies, status codes, CORS)
//!
//! This service is also the remote data source that `lifekey_core::RemoteLookupClient`
//! talks to: `GET /patients/{id}` answers with a bare record JSON body or `404`.

#![warn(rust_2018_idioms)]

use axum::{
    extract::{Path as AxumPath, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::Utc;
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{
    HealthRes, HealthService, ListPatientsRes, PatientFormReq, PatientRes, QrCodesRes, ScanReq,
    ScanRes, ScanSource,
};
use lifekey_core::qr::{complete_payload, parse_scan, reference_payload, ScannedCode};
use lifekey_core::{ErrorKind, LifeKeyError, LifeKeyId, PatientForm, PatientRecord, PatientStore};

type ApiError = (StatusCode, String);

/// Application state shared across REST handlers.
///
/// Holds the one store handle every handler reads and writes through.
#[derive(Clone)]
pub struct AppState {
    store: Arc<Mutex<PatientStore>>,
}

impl AppState {
    pub fn new(store: PatientStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }

    fn store(&self) -> Result<MutexGuard<'_, PatientStore>, ApiError> {
        self.store.lock().map_err(|_| {
            tracing::error!("patient store lock poisoned");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".into())
        })
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        list_patients,
        create_patient,
        get_patient,
        update_patient,
        patient_qr,
        scan,
    ),
    components(schemas(
        HealthRes,
        ListPatientsRes,
        PatientFormReq,
        PatientRes,
        QrCodesRes,
        ScanReq,
        ScanRes,
        ScanSource,
    ))
)]
pub struct ApiDoc;

/// Builds the REST router with OpenAPI docs and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/patients", get(list_patients).post(create_patient))
        .route("/patients/:id", get(get_patient).put(update_patient))
        .route("/patients/:id/qr", get(patient_qr))
        .route("/scan", post(scan))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Maps a core error to a status code and a single user-facing notice.
fn error_response(context: &str, err: LifeKeyError) -> ApiError {
    match err.kind() {
        ErrorKind::Validation => (StatusCode::BAD_REQUEST, err.to_string()),
        ErrorKind::NotFound => (StatusCode::NOT_FOUND, "Patient not found".into()),
        ErrorKind::StorageUnavailable => {
            tracing::error!("{} error: {:?}", context, err);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "Patient store unavailable".into(),
            )
        }
        ErrorKind::RemoteUnavailable => {
            tracing::error!("{} error: {:?}", context, err);
            (StatusCode::BAD_GATEWAY, "Remote lookup unavailable".into())
        }
    }
}

fn parse_path_id(id: &str) -> Result<LifeKeyId, ApiError> {
    LifeKeyId::parse(id).map_err(|e| error_response("Parse id", e.into()))
}

fn find_record(state: &AppState, id: &LifeKeyId) -> Result<PatientRecord, ApiError> {
    state
        .store()?
        .find_by_id(id.as_str())
        .map_err(|e| error_response("Find patient", e))?
        .ok_or_else(|| error_response("Find patient", LifeKeyError::NotFound(id.to_string())))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/patients",
    responses(
        (status = 200, description = "List of patients", body = ListPatientsRes),
        (status = 503, description = "Patient store unavailable")
    )
)]
/// List all patient records in stored order
#[axum::debug_handler]
async fn list_patients(State(state): State<AppState>) -> Result<Json<ListPatientsRes>, ApiError> {
    let patients = state
        .store()?
        .list_all()
        .map_err(|e| error_response("List patients", e))?;
    Ok(Json(ListPatientsRes { patients }))
}

#[utoipa::path(
    post,
    path = "/patients",
    request_body = PatientFormReq,
    responses(
        (status = 201, description = "Patient registered", body = PatientRes),
        (status = 400, description = "Missing or malformed field"),
        (status = 503, description = "Patient store unavailable")
    )
)]
/// Register a new patient
///
/// Validates the submitted form, mints a fresh LifeKey ID and stores the record.
///
/// # Returns
/// * `201` with the stored record, including its ID and `lastUpdated` stamp
///
/// # Errors
/// Returns `400 Bad Request` if name or phone is blank or age is not a whole number.
#[axum::debug_handler]
async fn create_patient(
    State(state): State<AppState>,
    Json(req): Json<PatientFormReq>,
) -> Result<(StatusCode, Json<PatientRes>), ApiError> {
    let draft = PatientForm::from(req)
        .validate()
        .map_err(|e| error_response("Create patient", e))?;

    let record = state
        .store()?
        .register(draft)
        .map_err(|e| error_response("Create patient", e))?;

    Ok((StatusCode::CREATED, Json(PatientRes(record))))
}

#[utoipa::path(
    get,
    path = "/patients/{id}",
    params(("id" = String, Path, description = "LifeKey ID, any case")),
    responses(
        (status = 200, description = "Patient record", body = PatientRes),
        (status = 400, description = "Malformed LifeKey ID"),
        (status = 404, description = "No record for this ID")
    )
)]
/// Look up a patient by LifeKey ID
///
/// This is the responder view and the remote lookup contract.
#[axum::debug_handler]
async fn get_patient(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<PatientRes>, ApiError> {
    let id = parse_path_id(&id)?;
    let record = find_record(&state, &id)?;
    tracing::info!("patient record {} accessed", record.id);
    Ok(Json(PatientRes(record)))
}

#[utoipa::path(
    put,
    path = "/patients/{id}",
    params(("id" = String, Path, description = "LifeKey ID, any case")),
    request_body = PatientFormReq,
    responses(
        (status = 200, description = "Patient record replaced", body = PatientRes),
        (status = 400, description = "Missing or malformed field"),
        (status = 404, description = "No record for this ID")
    )
)]
/// Replace a patient's profile
///
/// The whole record is replaced; omitted list fields become empty.
#[axum::debug_handler]
async fn update_patient(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Json(req): Json<PatientFormReq>,
) -> Result<Json<PatientRes>, ApiError> {
    let id = parse_path_id(&id)?;
    let draft = PatientForm::from(req)
        .validate()
        .map_err(|e| error_response("Update patient", e))?;

    let record = state
        .store()?
        .replace(id.as_str(), draft)
        .map_err(|e| error_response("Update patient", e))?;

    Ok(Json(PatientRes(record)))
}

#[utoipa::path(
    get,
    path = "/patients/{id}/qr",
    params(("id" = String, Path, description = "LifeKey ID, any case")),
    responses(
        (status = 200, description = "QR payload text", body = QrCodesRes),
        (status = 404, description = "No record for this ID")
    )
)]
/// QR payload text for a patient
#[axum::debug_handler]
async fn patient_qr(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<QrCodesRes>, ApiError> {
    let id = parse_path_id(&id)?;
    let record = find_record(&state, &id)?;
    let complete =
        complete_payload(&record, Utc::now()).map_err(|e| error_response("QR payload", e))?;

    Ok(Json(QrCodesRes {
        life_key_id: record.id.to_string(),
        reference: reference_payload(&record.id),
        complete,
    }))
}

#[utoipa::path(
    post,
    path = "/scan",
    request_body = ScanReq,
    responses(
        (status = 200, description = "Scanned payload resolved", body = ScanRes),
        (status = 400, description = "Not a LifeKey QR code"),
        (status = 404, description = "No record for the scanned ID")
    )
)]
/// Resolve scanned QR text
///
/// Reference codes are looked up in the store; complete-record codes are decoded
/// without a lookup.
#[axum::debug_handler]
async fn scan(
    State(state): State<AppState>,
    Json(req): Json<ScanReq>,
) -> Result<Json<ScanRes>, ApiError> {
    match parse_scan(&req.payload).map_err(|e| error_response("Scan", e))? {
        ScannedCode::Reference(id) => {
            let record = find_record(&state, &id)?;
            tracing::info!("patient record {} accessed via QR code", record.id);
            Ok(Json(ScanRes {
                source: ScanSource::Store,
                patient: Some(record),
                card: None,
            }))
        }
        ScannedCode::Card(card) => Ok(Json(ScanRes {
            source: ScanSource::Card,
            patient: None,
            card: Some(card),
        })),
    }
}
