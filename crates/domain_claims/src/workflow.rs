//! Claims workflow engine
//!
//! [`ClaimWorkflow`] orchestrates the claim lifecycle, document ingestion,
//! and AI annotation against dependency-injected port handles. Every
//! operation runs to completion within one request; external calls are
//! single-attempt with no retry.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use core_kernel::{ClaimId, DocumentId};

use crate::claim::{Claim, ClaimStatus, ClaimWithDocuments, Eligibility, NewClaim};
use crate::document::Document;
use crate::error::WorkflowError;
use crate::history::StatusChange;
use crate::ports::{BlobStore, ClaimStore, TextExtractor, TextModel};
use crate::prompts;

/// Lifetime of an issued upload URL
pub const UPLOAD_URL_TTL: Duration = Duration::from_secs(60);

/// How many claims the dashboard lists as recent
const RECENT_CLAIMS_LIMIT: usize = 5;

/// Reason returned when eligibility short-circuits on an empty document set
const NO_DOCUMENTS_REASON: &str = "No documents uploaded.";

/// A write-capable upload slot issued against the blob store
#[derive(Debug, Clone, Serialize)]
pub struct UploadSlot {
    pub upload_url: String,
    pub storage_key: String,
}

/// Outcome of an eligibility check
#[derive(Debug, Clone, Serialize)]
pub struct EligibilityAssessment {
    pub eligibility: Eligibility,
    pub reason: String,
}

/// Aggregate view over an owner's claims
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub total_claims: usize,
    /// One bucket per status, zero-filled
    pub claims_by_status: BTreeMap<ClaimStatus, usize>,
    /// Prefix of the descending-by-updated-at ordering
    pub recent_claims: Vec<Claim>,
}

/// Shape the model must return from an eligibility prompt
#[derive(Debug, serde::Deserialize)]
struct AssessmentPayload {
    eligibility: Eligibility,
    reason: String,
}

/// The claims workflow engine
///
/// Holds explicitly constructed service handles; no global clients. Clone is
/// cheap (all handles are shared).
#[derive(Clone)]
pub struct ClaimWorkflow {
    store: Arc<dyn ClaimStore>,
    blobs: Arc<dyn BlobStore>,
    extractor: Arc<dyn TextExtractor>,
    model: Arc<dyn TextModel>,
}

impl ClaimWorkflow {
    pub fn new(
        store: Arc<dyn ClaimStore>,
        blobs: Arc<dyn BlobStore>,
        extractor: Arc<dyn TextExtractor>,
        model: Arc<dyn TextModel>,
    ) -> Self {
        Self {
            store,
            blobs,
            extractor,
            model,
        }
    }

    // ========================================================================
    // Claim lifecycle
    // ========================================================================

    /// Creates a claim in status `New` for the given owner
    pub async fn create_claim(
        &self,
        user_id: &str,
        input: NewClaim,
    ) -> Result<Claim, WorkflowError> {
        if input.client_name.trim().is_empty() {
            return Err(WorkflowError::Validation(
                "client_name must not be empty".to_string(),
            ));
        }
        if input.vehicle_reg.trim().is_empty() {
            return Err(WorkflowError::Validation(
                "vehicle_reg must not be empty".to_string(),
            ));
        }

        let claim = self.store.create_claim(Claim::new(user_id, input)).await?;
        info!(claim_id = %claim.id, user = %user_id, "claim created");
        Ok(claim)
    }

    /// All claims owned by the caller, most recently updated first
    pub async fn list_claims(&self, user_id: &str) -> Result<Vec<Claim>, WorkflowError> {
        Ok(self.store.list_claims(user_id).await?)
    }

    /// A claim with its documents; a claim owned by someone else is
    /// indistinguishable from a missing one
    pub async fn get_claim(
        &self,
        user_id: &str,
        id: ClaimId,
    ) -> Result<ClaimWithDocuments, WorkflowError> {
        let claim = self.find_owned(user_id, id).await?;
        let documents = self.store.documents_for_claim(id).await?;
        Ok(ClaimWithDocuments { claim, documents })
    }

    /// Moves a claim to a new status and appends one history record
    ///
    /// Any-to-any transitions are allowed, including a status moving to
    /// itself; the history row is appended either way.
    pub async fn set_status(
        &self,
        user_id: &str,
        id: ClaimId,
        status: ClaimStatus,
    ) -> Result<Claim, WorkflowError> {
        let claim = self.find_owned(user_id, id).await?;
        let updated = self.store.update_status(id, claim.status, status).await?;
        info!(claim_id = %id, from = %claim.status, to = %status, "claim status changed");
        Ok(updated)
    }

    /// The status audit trail for an owned claim, oldest first
    pub async fn status_history(
        &self,
        user_id: &str,
        id: ClaimId,
    ) -> Result<Vec<StatusChange>, WorkflowError> {
        self.find_owned(user_id, id).await?;
        Ok(self.store.status_history(id).await?)
    }

    // ========================================================================
    // Document ingestion
    // ========================================================================

    /// Issues a 60-second presigned upload URL against a fresh storage key
    ///
    /// Keys are namespaced by claim: `claims/{claim_id}/{uuid}[.{ext}]`,
    /// preserving the uploaded file's extension.
    pub async fn request_upload_slot(
        &self,
        user_id: &str,
        claim_id: ClaimId,
        file_name: &str,
        file_type: &str,
    ) -> Result<UploadSlot, WorkflowError> {
        self.find_owned(user_id, claim_id).await?;

        let storage_key = match file_name.rsplit_once('.') {
            Some((_, ext)) if !ext.is_empty() => {
                format!("claims/{}/{}.{}", claim_id.as_uuid(), Uuid::new_v4(), ext)
            }
            _ => format!("claims/{}/{}", claim_id.as_uuid(), Uuid::new_v4()),
        };

        let upload_url = self
            .blobs
            .signed_upload_url(&storage_key, file_type, UPLOAD_URL_TTL)
            .await?;

        debug!(claim_id = %claim_id, key = %storage_key, "upload slot issued");
        Ok(UploadSlot {
            upload_url,
            storage_key,
        })
    }

    /// Registers a document row pointing at an already-uploaded blob
    ///
    /// The blob's existence at `storage_key` is not verified.
    pub async fn register_document(
        &self,
        user_id: &str,
        claim_id: ClaimId,
        file_name: &str,
        storage_key: &str,
        mime_type: &str,
    ) -> Result<Document, WorkflowError> {
        self.find_owned(user_id, claim_id).await?;

        let document = self
            .store
            .create_document(Document::new(claim_id, file_name, storage_key, mime_type))
            .await?;
        info!(claim_id = %claim_id, document_id = %document.id, "document registered");
        Ok(document)
    }

    /// Runs the extraction pipeline for one document
    ///
    /// Fetches the blob, extracts text, asks the model for the structured
    /// payload, and persists it onto the document and its claim in one
    /// atomic write. The most recently extracted document wins on the claim;
    /// payloads are not merged.
    pub async fn extract_document(&self, id: DocumentId) -> Result<Value, WorkflowError> {
        let document = self
            .store
            .get_document(id)
            .await?
            .ok_or(WorkflowError::DocumentNotFound(id))?;

        let bytes = self.blobs.get_object(&document.storage_key).await?;
        let text = self.extractor.extract_text(bytes).await?;

        let completion = self.model.complete(&prompts::extraction_prompt(&text)).await?;
        let data = parse_model_json(&completion)?;

        self.store
            .record_extraction(id, document.claim_id, data.clone())
            .await?;

        info!(document_id = %id, claim_id = %document.claim_id, "document extracted");
        Ok(data)
    }

    // ========================================================================
    // AI annotation
    // ========================================================================

    /// Summarizes a claim from its documents and persists the summary
    ///
    /// Document text is extracted sequentially, concatenated with a blank
    /// line between documents, and capped before prompt assembly.
    pub async fn summarize_claim(&self, id: ClaimId) -> Result<String, WorkflowError> {
        let claim = self
            .store
            .get_claim(id)
            .await?
            .ok_or(WorkflowError::ClaimNotFound(id))?;
        let documents = self.store.documents_for_claim(id).await?;

        let mut combined = String::new();
        for document in &documents {
            let bytes = self.blobs.get_object(&document.storage_key).await?;
            let text = self.extractor.extract_text(bytes).await?;
            combined.push_str(&text);
            combined.push_str("\n\n");
        }

        let summary = self
            .model
            .complete(&prompts::summary_prompt(&claim, &combined))
            .await?;
        self.store.set_summary(id, &summary).await?;

        info!(claim_id = %id, documents = documents.len(), "claim summarized");
        Ok(summary)
    }

    /// Assesses a claim's eligibility and persists the classification
    ///
    /// A claim with no documents short-circuits to `NeedsReview` without
    /// calling the model. Otherwise the completion must carry an eligibility
    /// value inside the closed enum; anything else is rejected and nothing
    /// is persisted.
    pub async fn check_eligibility(
        &self,
        id: ClaimId,
    ) -> Result<EligibilityAssessment, WorkflowError> {
        let claim = self
            .store
            .get_claim(id)
            .await?
            .ok_or(WorkflowError::ClaimNotFound(id))?;
        let documents = self.store.documents_for_claim(id).await?;

        if documents.is_empty() {
            self.store
                .set_eligibility(id, Eligibility::NeedsReview)
                .await?;
            info!(claim_id = %id, "eligibility short-circuited: no documents");
            return Ok(EligibilityAssessment {
                eligibility: Eligibility::NeedsReview,
                reason: NO_DOCUMENTS_REASON.to_string(),
            });
        }

        let completion = self
            .model
            .complete(&prompts::eligibility_prompt(&claim))
            .await?;
        let value = parse_model_json(&completion)?;
        let payload: AssessmentPayload = serde_json::from_value(value).map_err(|e| {
            WorkflowError::ModelResponse(format!("eligibility payload did not match: {}", e))
        })?;

        self.store.set_eligibility(id, payload.eligibility).await?;
        info!(claim_id = %id, eligibility = %payload.eligibility, "eligibility assessed");

        Ok(EligibilityAssessment {
            eligibility: payload.eligibility,
            reason: payload.reason,
        })
    }

    // ========================================================================
    // Dashboard
    // ========================================================================

    /// Aggregate view over the caller's claims; pure read
    pub async fn dashboard(&self, user_id: &str) -> Result<Dashboard, WorkflowError> {
        let claims = self.store.list_claims(user_id).await?;

        let mut claims_by_status: BTreeMap<ClaimStatus, usize> =
            ClaimStatus::ALL.iter().map(|s| (*s, 0)).collect();
        for claim in &claims {
            *claims_by_status.entry(claim.status).or_default() += 1;
        }

        let recent_claims = claims.iter().take(RECENT_CLAIMS_LIMIT).cloned().collect();

        Ok(Dashboard {
            total_claims: claims.len(),
            claims_by_status,
            recent_claims,
        })
    }

    async fn find_owned(&self, user_id: &str, id: ClaimId) -> Result<Claim, WorkflowError> {
        self.store
            .find_claim(user_id, id)
            .await?
            .ok_or(WorkflowError::ClaimNotFound(id))
    }
}

/// Parses a model completion as JSON, tolerating a surrounding fenced code
/// block
fn parse_model_json(completion: &str) -> Result<Value, WorkflowError> {
    let body = strip_code_fence(completion);
    serde_json::from_str(body)
        .map_err(|e| WorkflowError::ModelResponse(format!("completion was not valid JSON: {}", e)))
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    if let Some(rest) = trimmed.strip_prefix("```") {
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        if let Some(end) = rest.rfind("```") {
            return rest[..end].trim();
        }
    }
    trimmed
}
