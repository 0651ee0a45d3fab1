//! Workflow engine tests against the in-memory mock ports

use std::sync::Arc;

use serde_json::json;

use core_kernel::{ClaimId, DocumentId};
use domain_claims::ports::mock::{
    MockBlobStore, MockClaimStore, MockTextExtractor, MockTextModel,
};
use domain_claims::{ClaimStatus, ClaimWorkflow, Eligibility, NewClaim, WorkflowError};

const OWNER: &str = "user_2abc";
const STRANGER: &str = "user_2xyz";

struct Harness {
    workflow: ClaimWorkflow,
    store: Arc<MockClaimStore>,
    blobs: Arc<MockBlobStore>,
    model: Arc<MockTextModel>,
}

fn harness() -> Harness {
    let store = Arc::new(MockClaimStore::new());
    let blobs = Arc::new(MockBlobStore::new());
    let model = Arc::new(MockTextModel::new());
    let workflow = ClaimWorkflow::new(
        store.clone(),
        blobs.clone(),
        Arc::new(MockTextExtractor),
        model.clone(),
    );
    Harness {
        workflow,
        store,
        blobs,
        model,
    }
}

fn new_claim() -> NewClaim {
    NewClaim {
        client_name: "Jane Doe".to_string(),
        vehicle_reg: "AB12CDE".to_string(),
        lender_name: None,
    }
}

async fn uploaded_document(h: &Harness, claim_id: ClaimId, text: &str) -> DocumentId {
    let slot = h
        .workflow
        .request_upload_slot(OWNER, claim_id, "agreement.pdf", "application/pdf")
        .await
        .unwrap();
    h.blobs
        .put_object(slot.storage_key.clone(), text.as_bytes().to_vec())
        .await;
    h.workflow
        .register_document(OWNER, claim_id, "agreement.pdf", &slot.storage_key, "application/pdf")
        .await
        .unwrap()
        .id
}

mod lifecycle {
    use super::*;

    #[tokio::test]
    async fn test_create_claim_starts_new_with_unset_eligibility() {
        let h = harness();
        let claim = h.workflow.create_claim(OWNER, new_claim()).await.unwrap();

        assert_eq!(claim.status, ClaimStatus::New);
        assert!(claim.eligibility.is_none());
        assert_eq!(claim.user_id, OWNER);
    }

    #[tokio::test]
    async fn test_create_claim_rejects_blank_required_fields() {
        let h = harness();

        let result = h
            .workflow
            .create_claim(
                OWNER,
                NewClaim {
                    client_name: "  ".to_string(),
                    vehicle_reg: "AB12CDE".to_string(),
                    lender_name: None,
                },
            )
            .await;
        assert!(matches!(result, Err(WorkflowError::Validation(_))));

        let result = h
            .workflow
            .create_claim(
                OWNER,
                NewClaim {
                    client_name: "Jane Doe".to_string(),
                    vehicle_reg: String::new(),
                    lender_name: None,
                },
            )
            .await;
        assert!(matches!(result, Err(WorkflowError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_claim_by_non_owner_matches_missing_id() {
        let h = harness();
        let claim = h.workflow.create_claim(OWNER, new_claim()).await.unwrap();

        let foreign = h.workflow.get_claim(STRANGER, claim.id).await.unwrap_err();
        let missing = h
            .workflow
            .get_claim(OWNER, ClaimId::new())
            .await
            .unwrap_err();

        // Both surface as the same not-found outcome
        assert!(matches!(foreign, WorkflowError::ClaimNotFound(_)));
        assert!(matches!(missing, WorkflowError::ClaimNotFound(_)));
        assert_eq!(foreign.to_string().starts_with("Claim not found"), true);
        assert_eq!(missing.to_string().starts_with("Claim not found"), true);
    }

    #[tokio::test]
    async fn test_set_status_appends_one_history_row_per_call() {
        let h = harness();
        let claim = h.workflow.create_claim(OWNER, new_claim()).await.unwrap();

        h.workflow
            .set_status(OWNER, claim.id, ClaimStatus::Review)
            .await
            .unwrap();

        let history = h.workflow.status_history(OWNER, claim.id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].from, ClaimStatus::New);
        assert_eq!(history[0].to, ClaimStatus::Review);
    }

    #[tokio::test]
    async fn test_set_status_records_noop_transition() {
        let h = harness();
        let claim = h.workflow.create_claim(OWNER, new_claim()).await.unwrap();

        h.workflow
            .set_status(OWNER, claim.id, ClaimStatus::Approved)
            .await
            .unwrap();
        h.workflow
            .set_status(OWNER, claim.id, ClaimStatus::Approved)
            .await
            .unwrap();

        let history = h.workflow.status_history(OWNER, claim.id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].from, ClaimStatus::New);
        assert_eq!(history[0].to, ClaimStatus::Approved);
        assert_eq!(history[1].from, ClaimStatus::Approved);
        assert_eq!(history[1].to, ClaimStatus::Approved);
    }

    #[tokio::test]
    async fn test_set_status_by_non_owner_is_not_found() {
        let h = harness();
        let claim = h.workflow.create_claim(OWNER, new_claim()).await.unwrap();

        let result = h
            .workflow
            .set_status(STRANGER, claim.id, ClaimStatus::Rejected)
            .await;
        assert!(matches!(result, Err(WorkflowError::ClaimNotFound(_))));

        // No history row was appended for the rejected attempt
        let history = h.workflow.status_history(OWNER, claim.id).await.unwrap();
        assert!(history.is_empty());
    }
}

mod ingestion {
    use super::*;

    #[tokio::test]
    async fn test_upload_slot_key_is_namespaced_and_keeps_extension() {
        let h = harness();
        let claim = h.workflow.create_claim(OWNER, new_claim()).await.unwrap();

        let slot = h
            .workflow
            .request_upload_slot(OWNER, claim.id, "finance agreement.pdf", "application/pdf")
            .await
            .unwrap();

        let prefix = format!("claims/{}/", claim.id.as_uuid());
        assert!(slot.storage_key.starts_with(&prefix));
        assert!(slot.storage_key.ends_with(".pdf"));
        assert!(slot.upload_url.contains(&slot.storage_key));
        // Mock URL encodes the TTL it was issued with
        assert!(slot.upload_url.contains("expires=60"));
    }

    #[tokio::test]
    async fn test_upload_slot_without_extension() {
        let h = harness();
        let claim = h.workflow.create_claim(OWNER, new_claim()).await.unwrap();

        let slot = h
            .workflow
            .request_upload_slot(OWNER, claim.id, "agreement", "application/pdf")
            .await
            .unwrap();
        assert!(!slot.storage_key.contains('.'));
    }

    #[tokio::test]
    async fn test_upload_slot_for_unknown_claim_is_not_found() {
        let h = harness();
        let result = h
            .workflow
            .request_upload_slot(OWNER, ClaimId::new(), "a.pdf", "application/pdf")
            .await;
        assert!(matches!(result, Err(WorkflowError::ClaimNotFound(_))));
    }

    #[tokio::test]
    async fn test_extract_document_persists_to_document_and_claim() {
        let h = harness();
        let claim = h.workflow.create_claim(OWNER, new_claim()).await.unwrap();
        let document_id = uploaded_document(&h, claim.id, "agreement text").await;

        let payload = json!({
            "agreementNumber": "AG-1001",
            "lenderName": "Acme Finance",
            "contractDate": "2019-03-14",
            "potentialIssues": ["undisclosed commission"],
        });
        h.model.enqueue(payload.to_string()).await;

        let extracted = h.workflow.extract_document(document_id).await.unwrap();
        assert_eq!(extracted, payload);

        let detail = h.workflow.get_claim(OWNER, claim.id).await.unwrap();
        assert_eq!(detail.claim.ai_extracted_data, Some(payload.clone()));
        assert_eq!(detail.documents[0].extracted_data, Some(payload));
    }

    #[tokio::test]
    async fn test_extract_document_accepts_fenced_completion() {
        let h = harness();
        let claim = h.workflow.create_claim(OWNER, new_claim()).await.unwrap();
        let document_id = uploaded_document(&h, claim.id, "agreement text").await;

        h.model
            .enqueue("```json\n{\"agreementNumber\": \"AG-2\"}\n```")
            .await;

        let extracted = h.workflow.extract_document(document_id).await.unwrap();
        assert_eq!(extracted["agreementNumber"], "AG-2");
    }

    #[tokio::test]
    async fn test_extract_last_document_wins_on_claim() {
        let h = harness();
        let claim = h.workflow.create_claim(OWNER, new_claim()).await.unwrap();
        let first = uploaded_document(&h, claim.id, "first document").await;
        let second = uploaded_document(&h, claim.id, "second document").await;

        h.model.enqueue(r#"{"agreementNumber": "AG-1"}"#).await;
        h.workflow.extract_document(first).await.unwrap();
        h.model.enqueue(r#"{"agreementNumber": "AG-2"}"#).await;
        h.workflow.extract_document(second).await.unwrap();

        let detail = h.workflow.get_claim(OWNER, claim.id).await.unwrap();
        assert_eq!(
            detail.claim.ai_extracted_data,
            Some(json!({"agreementNumber": "AG-2"}))
        );
        // The first document keeps its own payload
        let first_doc = detail
            .documents
            .iter()
            .find(|d| d.id == first)
            .unwrap();
        assert_eq!(
            first_doc.extracted_data,
            Some(json!({"agreementNumber": "AG-1"}))
        );
    }

    #[tokio::test]
    async fn test_extract_unknown_document_is_not_found() {
        let h = harness();
        let result = h.workflow.extract_document(DocumentId::new()).await;
        assert!(matches!(result, Err(WorkflowError::DocumentNotFound(_))));
        assert_eq!(h.model.call_count(), 0);
    }

    #[tokio::test]
    async fn test_extract_unparseable_completion_persists_nothing() {
        let h = harness();
        let claim = h.workflow.create_claim(OWNER, new_claim()).await.unwrap();
        let document_id = uploaded_document(&h, claim.id, "agreement text").await;

        h.model.enqueue("this is not json").await;

        let result = h.workflow.extract_document(document_id).await;
        assert!(matches!(result, Err(WorkflowError::ModelResponse(_))));

        let detail = h.workflow.get_claim(OWNER, claim.id).await.unwrap();
        assert!(detail.claim.ai_extracted_data.is_none());
        assert!(detail.documents[0].extracted_data.is_none());
    }
}

mod annotation {
    use super::*;
    use domain_claims::prompts::MAX_DOCUMENT_PROMPT_BYTES;

    #[tokio::test]
    async fn test_check_eligibility_without_documents_never_calls_model() {
        let h = harness();
        let claim = h.workflow.create_claim(OWNER, new_claim()).await.unwrap();

        let assessment = h.workflow.check_eligibility(claim.id).await.unwrap();

        assert_eq!(assessment.eligibility, Eligibility::NeedsReview);
        assert_eq!(assessment.reason, "No documents uploaded.");
        assert_eq!(h.model.call_count(), 0);

        let detail = h.workflow.get_claim(OWNER, claim.id).await.unwrap();
        assert_eq!(detail.claim.eligibility, Some(Eligibility::NeedsReview));
    }

    #[tokio::test]
    async fn test_check_eligibility_with_documents_calls_model_once() {
        let h = harness();
        let claim = h.workflow.create_claim(OWNER, new_claim()).await.unwrap();
        uploaded_document(&h, claim.id, "agreement text").await;

        h.model
            .enqueue(r#"{"eligibility": "LIKELY_VALID", "reason": "Agreement predates 2021."}"#)
            .await;

        let assessment = h.workflow.check_eligibility(claim.id).await.unwrap();
        assert_eq!(assessment.eligibility, Eligibility::LikelyValid);
        assert_eq!(assessment.reason, "Agreement predates 2021.");
        assert_eq!(h.model.call_count(), 1);

        let detail = h.workflow.get_claim(OWNER, claim.id).await.unwrap();
        assert_eq!(detail.claim.eligibility, Some(Eligibility::LikelyValid));
    }

    #[tokio::test]
    async fn test_check_eligibility_rejects_value_outside_enum() {
        let h = harness();
        let claim = h.workflow.create_claim(OWNER, new_claim()).await.unwrap();
        uploaded_document(&h, claim.id, "agreement text").await;

        h.model
            .enqueue(r#"{"eligibility": "MAYBE", "reason": "unsure"}"#)
            .await;

        let result = h.workflow.check_eligibility(claim.id).await;
        assert!(matches!(result, Err(WorkflowError::ModelResponse(_))));

        // The unrecognized value was not persisted
        let detail = h.workflow.get_claim(OWNER, claim.id).await.unwrap();
        assert!(detail.claim.eligibility.is_none());
    }

    #[tokio::test]
    async fn test_check_eligibility_unknown_claim_is_not_found() {
        let h = harness();
        let result = h.workflow.check_eligibility(ClaimId::new()).await;
        assert!(matches!(result, Err(WorkflowError::ClaimNotFound(_))));
    }

    #[tokio::test]
    async fn test_summarize_claim_concatenates_documents_and_persists() {
        let h = harness();
        let claim = h.workflow.create_claim(OWNER, new_claim()).await.unwrap();
        uploaded_document(&h, claim.id, "first document body").await;
        uploaded_document(&h, claim.id, "second document body").await;

        h.model.enqueue("A concise summary.").await;

        let summary = h.workflow.summarize_claim(claim.id).await.unwrap();
        assert_eq!(summary, "A concise summary.");

        let prompt = h.model.last_prompt().await.unwrap();
        assert!(prompt.contains("first document body"));
        assert!(prompt.contains("second document body"));
        assert!(prompt.contains("first document body\n\nsecond document body"));

        let detail = h.workflow.get_claim(OWNER, claim.id).await.unwrap();
        assert_eq!(detail.claim.ai_summary.as_deref(), Some("A concise summary."));
    }

    #[tokio::test]
    async fn test_summarize_claim_caps_prompt_size() {
        let h = harness();
        let claim = h.workflow.create_claim(OWNER, new_claim()).await.unwrap();
        let oversized = "y".repeat(MAX_DOCUMENT_PROMPT_BYTES * 2);
        uploaded_document(&h, claim.id, &oversized).await;

        h.model.enqueue("Short summary.").await;
        h.workflow.summarize_claim(claim.id).await.unwrap();

        let prompt = h.model.last_prompt().await.unwrap();
        assert!(prompt.len() < oversized.len());
    }

    #[tokio::test]
    async fn test_summarize_unknown_claim_is_not_found() {
        let h = harness();
        let result = h.workflow.summarize_claim(ClaimId::new()).await;
        assert!(matches!(result, Err(WorkflowError::ClaimNotFound(_))));
        assert_eq!(h.model.call_count(), 0);
    }
}

mod dashboard {
    use super::*;

    #[tokio::test]
    async fn test_dashboard_counts_sum_to_total() {
        let h = harness();
        for _ in 0..3 {
            h.workflow.create_claim(OWNER, new_claim()).await.unwrap();
        }
        let claim = h.workflow.create_claim(OWNER, new_claim()).await.unwrap();
        h.workflow
            .set_status(OWNER, claim.id, ClaimStatus::Approved)
            .await
            .unwrap();
        // Another user's claims never leak into the aggregate
        h.workflow.create_claim(STRANGER, new_claim()).await.unwrap();

        let dashboard = h.workflow.dashboard(OWNER).await.unwrap();

        assert_eq!(dashboard.total_claims, 4);
        let sum: usize = dashboard.claims_by_status.values().sum();
        assert_eq!(sum, dashboard.total_claims);
        assert_eq!(dashboard.claims_by_status[&ClaimStatus::New], 3);
        assert_eq!(dashboard.claims_by_status[&ClaimStatus::Approved], 1);
    }

    #[tokio::test]
    async fn test_dashboard_always_has_all_five_buckets() {
        let h = harness();
        let dashboard = h.workflow.dashboard(OWNER).await.unwrap();

        assert_eq!(dashboard.total_claims, 0);
        assert_eq!(dashboard.claims_by_status.len(), 5);
        assert!(dashboard.claims_by_status.values().all(|&n| n == 0));
        assert!(dashboard.recent_claims.is_empty());
    }

    #[tokio::test]
    async fn test_dashboard_recent_is_descending_prefix_of_five() {
        let h = harness();
        let mut ids = Vec::new();
        for _ in 0..7 {
            let claim = h.workflow.create_claim(OWNER, new_claim()).await.unwrap();
            // Touch each claim in order so updated_at strictly increases
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
            let updated = h
                .workflow
                .set_status(OWNER, claim.id, ClaimStatus::Review)
                .await
                .unwrap();
            ids.push(updated.id);
        }

        let dashboard = h.workflow.dashboard(OWNER).await.unwrap();
        assert_eq!(dashboard.recent_claims.len(), 5);

        // Most recently touched first
        let expected: Vec<_> = ids.iter().rev().take(5).copied().collect();
        let actual: Vec<_> = dashboard.recent_claims.iter().map(|c| c.id).collect();
        assert_eq!(actual, expected);
    }
}

mod scenarios {
    use super::*;

    /// End to end: create, then eligibility-check a documentless claim
    #[tokio::test]
    async fn test_fresh_claim_eligibility_flow() {
        let h = harness();
        let claim = h
            .workflow
            .create_claim(
                OWNER,
                NewClaim {
                    client_name: "Jane Doe".to_string(),
                    vehicle_reg: "AB12CDE".to_string(),
                    lender_name: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(claim.status, ClaimStatus::New);
        assert!(claim.eligibility.is_none());

        let assessment = h.workflow.check_eligibility(claim.id).await.unwrap();
        assert_eq!(assessment.eligibility, Eligibility::NeedsReview);
        assert_eq!(assessment.reason, "No documents uploaded.");

        let detail = h.workflow.get_claim(OWNER, claim.id).await.unwrap();
        assert_eq!(detail.claim.eligibility, Some(Eligibility::NeedsReview));
    }

    /// End to end: upload one document and extract it
    #[tokio::test]
    async fn test_upload_and_extract_flow() {
        let h = harness();
        let claim = h.workflow.create_claim(OWNER, new_claim()).await.unwrap();
        let document_id = uploaded_document(&h, claim.id, "agreement body").await;

        let payload = json!({
            "agreementNumber": "HP-44781",
            "lenderName": "Acme Finance",
            "contractDate": "2018-06-02",
            "potentialIssues": [],
        });
        h.model.enqueue(payload.to_string()).await;
        h.workflow.extract_document(document_id).await.unwrap();

        let detail = h.workflow.get_claim(OWNER, claim.id).await.unwrap();
        assert_eq!(detail.claim.ai_extracted_data, Some(payload.clone()));
        assert_eq!(detail.documents[0].extracted_data, Some(payload));
    }
}
