use api_rest::{router, AppState};
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use lifekey_core::{FileRepository, MemoryRepository, PatientStore};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

fn seeded_app() -> Router {
    let store = PatientStore::open(MemoryRepository::new(), true).expect("store should open");
    router(AppState::new(store))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("request failed");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn with_json(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let (status, body) = send(&seeded_app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn lists_seeded_patients_in_order() {
    let (status, body) = send(&seeded_app(), get("/patients")).await;
    assert_eq!(status, StatusCode::OK);

    let patients = body["patients"].as_array().unwrap();
    assert_eq!(patients.len(), 2);
    assert_eq!(patients[0]["lifeKeyId"], "LK-A1B2C3D4");
    assert_eq!(patients[1]["lifeKeyId"], "LK-E5F6G7H8");
}

#[tokio::test]
async fn register_then_lookup_case_insensitively() {
    let app = seeded_app();
    let (status, created) = send(
        &app,
        with_json(
            "POST",
            "/patients",
            json!({
                "name": "Jane Roe",
                "phone": "+1-555-0199",
                "age": "37",
                "allergies": "Penicillin, Latex, ",
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["allergies"], json!(["Penicillin", "Latex"]));
    assert_eq!(created["conditions"], json!([]));
    assert_eq!(created["age"], 37);

    let id = created["lifeKeyId"].as_str().unwrap().to_string();
    assert!(id.starts_with("LK-"));

    let (status, found) = send(&app, get(&format!("/patients/{}", id.to_lowercase()))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found, created);
}

#[tokio::test]
async fn register_rejects_missing_phone() {
    let (status, body) = send(
        &seeded_app(),
        with_json("POST", "/patients", json!({ "name": "Jane Roe" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.as_str().unwrap().contains("phone"));
}

#[tokio::test]
async fn lookup_distinguishes_malformed_and_unknown_ids() {
    let app = seeded_app();

    let (status, _) = send(&app, get("/patients/patient_123")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, get("/patients/LK-ZZZZZZZZ")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_replaces_whole_record() {
    let app = seeded_app();
    let (status, updated) = send(
        &app,
        with_json(
            "PUT",
            "/patients/lk-a1b2c3d4",
            json!({
                "name": "John Doe",
                "phone": "+1-555-0101",
                "bloodGroup": "O+",
                "medications": "Metformin",
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["lifeKeyId"], "LK-A1B2C3D4");
    assert_eq!(updated["medications"], json!(["Metformin"]));
    assert_eq!(updated["allergies"], json!([]));
    assert_ne!(updated["lastUpdated"], "2024-01-20T10:00:00Z");

    let (_, listed) = send(&app, get("/patients")).await;
    let patients = listed["patients"].as_array().unwrap();
    assert_eq!(patients.len(), 2);
    assert_eq!(patients[0], updated);
}

#[tokio::test]
async fn update_unknown_id_is_not_found() {
    let (status, _) = send(
        &seeded_app(),
        with_json(
            "PUT",
            "/patients/LK-00000000",
            json!({ "name": "Nobody", "phone": "000" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn qr_payloads_scan_back() {
    let app = seeded_app();
    let (status, qr) = send(&app, get("/patients/LK-E5F6G7H8/qr")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(qr["reference"], "LIFEKEY:LK-E5F6G7H8");
    let reference = qr["reference"].clone();
    let complete = qr["complete"].clone();

    let (status, scanned) = send(
        &app,
        with_json("POST", "/scan", json!({ "payload": reference })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(scanned["source"], "store");
    assert_eq!(scanned["patient"]["name"], "Anita Rao");

    let (status, scanned) = send(
        &app,
        with_json("POST", "/scan", json!({ "payload": complete })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(scanned["source"], "card");
    assert_eq!(scanned["card"]["patientId"], "LK-E5F6G7H8");
    assert_eq!(scanned["card"]["allergies"], json!(["Latex"]));
}

#[tokio::test]
async fn scan_rejects_foreign_codes() {
    let (status, _) = send(
        &seeded_app(),
        with_json("POST", "/scan", json!({ "payload": "https://example.com/menu" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn broken_store_file_is_service_unavailable() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("lifekey_patients.json");
    let store = PatientStore::open(FileRepository::new(&path), true).unwrap();
    let app = router(AppState::new(store));

    std::fs::write(&path, "not json").unwrap();

    let (status, body) = send(&app, get("/patients/LK-A1B2C3D4")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, "Patient store unavailable");
}

#[tokio::test]
async fn openapi_document_lists_routes() {
    let (status, doc) = send(&seeded_app(), get("/api-docs/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/patients/{id}"].is_object());
    assert!(doc["paths"]["/scan"].is_object());
}
