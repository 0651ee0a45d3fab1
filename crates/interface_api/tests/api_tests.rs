//! HTTP boundary tests
//!
//! Drives the full router over mock ports: real middleware, extractors, and
//! error mapping, no database or external services.

use std::sync::Arc;

use axum::http::{header::AUTHORIZATION, HeaderValue};
use axum_test::TestServer;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;

use domain_claims::ports::mock::{
    MockBlobStore, MockClaimStore, MockTextExtractor, MockTextModel,
};
use domain_claims::ClaimWorkflow;
use interface_api::{auth, config::ApiConfig, create_router, AppState};
use test_utils::{
    eligibility_completion, extraction_payload, fenced, ClaimBuilder, DocumentBuilder,
};

const OWNER: &str = "user_2abc";
const STRANGER: &str = "user_2xyz";

struct TestApp {
    server: TestServer,
    config: ApiConfig,
    store: Arc<MockClaimStore>,
    blobs: Arc<MockBlobStore>,
    model: Arc<MockTextModel>,
}

fn test_app() -> TestApp {
    let config = ApiConfig::default();
    let store = Arc::new(MockClaimStore::new());
    let blobs = Arc::new(MockBlobStore::new());
    let model = Arc::new(MockTextModel::new());
    let workflow = Arc::new(ClaimWorkflow::new(
        store.clone(),
        blobs.clone(),
        Arc::new(MockTextExtractor),
        model.clone(),
    ));

    // Lazy pool: never connects unless the readiness probe is exercised
    let pool = PgPoolOptions::new()
        .connect_lazy(&config.database_url)
        .expect("lazy pool");

    let server = TestServer::new(create_router(AppState {
        pool,
        workflow,
        config: config.clone(),
    }))
    .expect("test server");

    TestApp {
        server,
        config,
        store,
        blobs,
        model,
    }
}

fn bearer(app: &TestApp, user: &str) -> HeaderValue {
    let token = auth::create_token(user, &app.config.jwt_secret, 3600).unwrap();
    HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
}

async fn create_claim(app: &TestApp, user: &str) -> Value {
    let response = app
        .server
        .post("/api/v1/claims")
        .add_header(AUTHORIZATION, bearer(app, user))
        .json(&json!({
            "client_name": "Jane Doe",
            "vehicle_reg": "AB12CDE",
        }))
        .await;
    response.assert_status_ok();
    response.json::<Value>()
}

#[tokio::test]
async fn test_health_endpoint_is_public() {
    let app = test_app();
    let response = app.server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "healthy");
}

#[tokio::test]
async fn test_readiness_fails_without_database() {
    let app = test_app();
    let response = app.server.get("/health/ready").await;
    assert_eq!(response.status_code(), 503);
}

#[tokio::test]
async fn test_api_rejects_unauthenticated_calls() {
    let app = test_app();

    let response = app.server.get("/api/v1/claims").await;
    assert_eq!(response.status_code(), 401);

    let response = app
        .server
        .get("/api/v1/dashboard")
        .add_header(AUTHORIZATION, HeaderValue::from_static("Bearer not-a-jwt"))
        .await;
    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn test_create_claim_starts_new() {
    let app = test_app();
    let claim = create_claim(&app, OWNER).await;

    assert_eq!(claim["status"], "NEW");
    assert_eq!(claim["client_name"], "Jane Doe");
    assert_eq!(claim["vehicle_reg"], "AB12CDE");
    assert!(claim["eligibility"].is_null());
    assert!(claim["lender_name"].is_null());
}

#[tokio::test]
async fn test_create_claim_validates_required_fields() {
    let app = test_app();
    let response = app
        .server
        .post("/api/v1/claims")
        .add_header(AUTHORIZATION, bearer(&app, OWNER))
        .json(&json!({
            "client_name": "",
            "vehicle_reg": "AB12CDE",
        }))
        .await;
    assert_eq!(response.status_code(), 422);
    assert_eq!(response.json::<Value>()["error"], "validation_error");
}

#[tokio::test]
async fn test_list_claims_only_shows_own() {
    let app = test_app();
    create_claim(&app, OWNER).await;
    create_claim(&app, STRANGER).await;

    let response = app
        .server
        .get("/api/v1/claims")
        .add_header(AUTHORIZATION, bearer(&app, OWNER))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>().as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_claims_orders_by_recency() {
    use domain_claims::ClaimStore;

    let app = test_app();
    let older = ClaimBuilder::new().owned_by(OWNER).client_name("Older").build();
    let newer = ClaimBuilder::new()
        .owned_by(OWNER)
        .client_name("Newer")
        .updated_later_by(chrono::Duration::minutes(5))
        .build();
    app.store.create_claim(older).await.unwrap();
    app.store.create_claim(newer).await.unwrap();

    let response = app
        .server
        .get("/api/v1/claims")
        .add_header(AUTHORIZATION, bearer(&app, OWNER))
        .await;
    response.assert_status_ok();

    let claims = response.json::<Value>();
    assert_eq!(claims[0]["client_name"], "Newer");
    assert_eq!(claims[1]["client_name"], "Older");
}

#[tokio::test]
async fn test_extract_over_seeded_document() {
    use domain_claims::ClaimStore;

    let app = test_app();
    let claim = ClaimBuilder::new().owned_by(OWNER).lender("Acme Finance").build();
    let claim_id = claim.id;
    app.store.create_claim(claim).await.unwrap();

    let document = DocumentBuilder::for_claim(claim_id)
        .file_name("statement.pdf")
        .build();
    app.blobs
        .put_object(document.storage_key.clone(), b"statement text".to_vec())
        .await;
    let document_id = document.id;
    app.store.insert_document(document).await;

    let payload = extraction_payload();
    app.model.enqueue(payload.to_string()).await;

    let response = app
        .server
        .post("/api/v1/ai/extract-document")
        .add_header(AUTHORIZATION, bearer(&app, OWNER))
        .json(&json!({ "document_id": *document_id.as_uuid() }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["extracted_data"], payload);
}

#[tokio::test]
async fn test_foreign_claim_indistinguishable_from_missing() {
    let app = test_app();
    let claim = create_claim(&app, OWNER).await;
    let id = claim["id"].as_str().unwrap().to_string();

    let foreign = app
        .server
        .get(&format!("/api/v1/claims/{}", id))
        .add_header(AUTHORIZATION, bearer(&app, STRANGER))
        .await;
    let missing = app
        .server
        .get(&format!("/api/v1/claims/{}", uuid::Uuid::new_v4()))
        .add_header(AUTHORIZATION, bearer(&app, OWNER))
        .await;

    assert_eq!(foreign.status_code(), 404);
    assert_eq!(missing.status_code(), 404);
    assert_eq!(foreign.json::<Value>(), missing.json::<Value>());
}

#[tokio::test]
async fn test_status_updates_append_history() {
    let app = test_app();
    let claim = create_claim(&app, OWNER).await;
    let id = claim["id"].as_str().unwrap().to_string();

    for _ in 0..2 {
        let response = app
            .server
            .patch(&format!("/api/v1/claims/{}/status", id))
            .add_header(AUTHORIZATION, bearer(&app, OWNER))
            .json(&json!({ "status": "APPROVED" }))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["status"], "APPROVED");
    }

    let response = app
        .server
        .get(&format!("/api/v1/claims/{}/history", id))
        .add_header(AUTHORIZATION, bearer(&app, OWNER))
        .await;
    response.assert_status_ok();

    let history = response.json::<Value>();
    let rows = history.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["from"], "NEW");
    assert_eq!(rows[0]["to"], "APPROVED");
    assert_eq!(rows[1]["from"], "APPROVED");
    assert_eq!(rows[1]["to"], "APPROVED");
}

#[tokio::test]
async fn test_status_update_rejects_unknown_status() {
    let app = test_app();
    let claim = create_claim(&app, OWNER).await;
    let id = claim["id"].as_str().unwrap().to_string();

    let response = app
        .server
        .patch(&format!("/api/v1/claims/{}/status", id))
        .add_header(AUTHORIZATION, bearer(&app, OWNER))
        .json(&json!({ "status": "PENDING" }))
        .await;
    assert!(response.status_code().is_client_error());
}

#[tokio::test]
async fn test_upload_url_issues_namespaced_key() {
    let app = test_app();
    let claim = create_claim(&app, OWNER).await;
    let id = claim["id"].as_str().unwrap().to_string();

    let response = app
        .server
        .post("/api/v1/documents/upload-url")
        .add_header(AUTHORIZATION, bearer(&app, OWNER))
        .json(&json!({
            "claim_id": id,
            "file_name": "agreement.pdf",
            "file_type": "application/pdf",
        }))
        .await;
    response.assert_status_ok();

    let body = response.json::<Value>();
    let key = body["storage_key"].as_str().unwrap();
    assert!(key.starts_with(&format!("claims/{}/", id)));
    assert!(key.ends_with(".pdf"));
    assert!(body["upload_url"].as_str().unwrap().contains(key));
}

#[tokio::test]
async fn test_document_upload_register_extract_flow() {
    let app = test_app();
    let claim = create_claim(&app, OWNER).await;
    let claim_id = claim["id"].as_str().unwrap().to_string();

    // Request a slot and simulate the client's direct upload
    let slot = app
        .server
        .post("/api/v1/documents/upload-url")
        .add_header(AUTHORIZATION, bearer(&app, OWNER))
        .json(&json!({
            "claim_id": claim_id,
            "file_name": "agreement.pdf",
            "file_type": "application/pdf",
        }))
        .await
        .json::<Value>();
    let storage_key = slot["storage_key"].as_str().unwrap().to_string();
    app.blobs
        .put_object(storage_key.clone(), b"agreement text".to_vec())
        .await;

    // Register the document row
    let document = app
        .server
        .post("/api/v1/documents")
        .add_header(AUTHORIZATION, bearer(&app, OWNER))
        .json(&json!({
            "claim_id": claim_id,
            "file_name": "agreement.pdf",
            "storage_key": storage_key,
            "mime_type": "application/pdf",
        }))
        .await
        .json::<Value>();

    // Extract; the model answers with a fenced JSON payload
    let payload = extraction_payload();
    app.model.enqueue(fenced(&payload.to_string())).await;

    let response = app
        .server
        .post("/api/v1/ai/extract-document")
        .add_header(AUTHORIZATION, bearer(&app, OWNER))
        .json(&json!({ "document_id": document["id"] }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["extracted_data"], payload);

    // Both the document and the claim carry the payload
    let detail = app
        .server
        .get(&format!("/api/v1/claims/{}", claim_id))
        .add_header(AUTHORIZATION, bearer(&app, OWNER))
        .await
        .json::<Value>();
    assert_eq!(detail["ai_extracted_data"], payload);
    assert_eq!(detail["documents"][0]["extracted_data"], payload);
}

#[tokio::test]
async fn test_check_eligibility_without_documents_short_circuits() {
    let app = test_app();
    let claim = create_claim(&app, OWNER).await;

    let response = app
        .server
        .post("/api/v1/ai/check-eligibility")
        .add_header(AUTHORIZATION, bearer(&app, OWNER))
        .json(&json!({ "claim_id": claim["id"] }))
        .await;
    response.assert_status_ok();

    let body = response.json::<Value>();
    assert_eq!(body["eligibility"], "NEEDS_REVIEW");
    assert_eq!(body["reason"], "No documents uploaded.");
    assert_eq!(app.model.call_count(), 0);
}

#[tokio::test]
async fn test_check_eligibility_persists_model_classification() {
    let app = test_app();
    let claim = create_claim(&app, OWNER).await;
    let claim_id = claim["id"].as_str().unwrap().to_string();

    // Attach one document so the model path runs
    let slot = app
        .server
        .post("/api/v1/documents/upload-url")
        .add_header(AUTHORIZATION, bearer(&app, OWNER))
        .json(&json!({
            "claim_id": claim_id,
            "file_name": "agreement.pdf",
            "file_type": "application/pdf",
        }))
        .await
        .json::<Value>();
    app.server
        .post("/api/v1/documents")
        .add_header(AUTHORIZATION, bearer(&app, OWNER))
        .json(&json!({
            "claim_id": claim_id,
            "file_name": "agreement.pdf",
            "storage_key": slot["storage_key"],
            "mime_type": "application/pdf",
        }))
        .await
        .assert_status_ok();

    app.model
        .enqueue(eligibility_completion("LIKELY_VALID", "Agreement predates 2021."))
        .await;

    let response = app
        .server
        .post("/api/v1/ai/check-eligibility")
        .add_header(AUTHORIZATION, bearer(&app, OWNER))
        .json(&json!({ "claim_id": claim_id }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["eligibility"], "LIKELY_VALID");
    assert_eq!(app.model.call_count(), 1);

    let detail = app
        .server
        .get(&format!("/api/v1/claims/{}", claim_id))
        .add_header(AUTHORIZATION, bearer(&app, OWNER))
        .await
        .json::<Value>();
    assert_eq!(detail["eligibility"], "LIKELY_VALID");
}

#[tokio::test]
async fn test_summarize_claim_persists_summary() {
    let app = test_app();
    let claim = create_claim(&app, OWNER).await;
    let claim_id = claim["id"].as_str().unwrap().to_string();

    app.model.enqueue("A concise summary.").await;

    let response = app
        .server
        .post("/api/v1/ai/summarize-claim")
        .add_header(AUTHORIZATION, bearer(&app, OWNER))
        .json(&json!({ "claim_id": claim_id }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["summary"], "A concise summary.");

    let detail = app
        .server
        .get(&format!("/api/v1/claims/{}", claim_id))
        .add_header(AUTHORIZATION, bearer(&app, OWNER))
        .await
        .json::<Value>();
    assert_eq!(detail["ai_summary"], "A concise summary.");
}

#[tokio::test]
async fn test_dashboard_aggregates_by_status() {
    let app = test_app();
    for _ in 0..3 {
        create_claim(&app, OWNER).await;
    }
    let claim = create_claim(&app, OWNER).await;
    app.server
        .patch(&format!(
            "/api/v1/claims/{}/status",
            claim["id"].as_str().unwrap()
        ))
        .add_header(AUTHORIZATION, bearer(&app, OWNER))
        .json(&json!({ "status": "SUBMITTED" }))
        .await
        .assert_status_ok();

    let response = app
        .server
        .get("/api/v1/dashboard")
        .add_header(AUTHORIZATION, bearer(&app, OWNER))
        .await;
    response.assert_status_ok();

    let body = response.json::<Value>();
    assert_eq!(body["total_claims"], 4);
    assert_eq!(body["claims_by_status"]["NEW"], 3);
    assert_eq!(body["claims_by_status"]["SUBMITTED"], 1);
    assert_eq!(body["claims_by_status"]["REJECTED"], 0);
    assert_eq!(body["recent_claims"].as_array().unwrap().len(), 4);
    // Most recently touched claim leads
    assert_eq!(body["recent_claims"][0]["id"], claim["id"]);
}
