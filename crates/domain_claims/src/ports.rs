//! Claims Domain Ports
//!
//! Port traits for every collaborator the workflow engine depends on,
//! enabling swappable implementations:
//!
//! - [`ClaimStore`]: relational persistence for claims, documents, and the
//!   status history. Implemented by `infra_db::PgClaimStore` and by
//!   [`mock::MockClaimStore`] for tests.
//! - [`BlobStore`]: external object storage holding document bytes, with
//!   signed-URL upload capability. Implemented by `infra_external::S3BlobStore`.
//! - [`TextExtractor`]: converts stored document bytes into plain text.
//! - [`TextModel`]: the external generative-text completion service.
//!
//! Adapters are constructed at application startup and injected into
//! [`crate::workflow::ClaimWorkflow`] as `Arc<dyn …>` handles, so tests can
//! substitute fakes without touching the engine.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use core_kernel::{ClaimId, DocumentId, DomainPort, PortError};

use crate::claim::{Claim, ClaimStatus, Eligibility};
use crate::document::Document;
use crate::history::StatusChange;

/// Persistence port for claims, documents, and status history
///
/// Lookup methods taking a `user_id` apply a single combined predicate over
/// id and owner: a claim owned by someone else is reported exactly like a
/// missing one. Methods that touch two entities (`update_status`,
/// `record_extraction`) must apply both writes atomically.
#[async_trait]
pub trait ClaimStore: DomainPort {
    /// Persists a new claim
    async fn create_claim(&self, claim: Claim) -> Result<Claim, PortError>;

    /// All claims for an owner, most recently updated first
    async fn list_claims(&self, user_id: &str) -> Result<Vec<Claim>, PortError>;

    /// Finds a claim by id and owner with one combined predicate
    async fn find_claim(&self, user_id: &str, id: ClaimId) -> Result<Option<Claim>, PortError>;

    /// Finds a claim by id alone
    async fn get_claim(&self, id: ClaimId) -> Result<Option<Claim>, PortError>;

    /// Documents attached to a claim, oldest first
    async fn documents_for_claim(&self, id: ClaimId) -> Result<Vec<Document>, PortError>;

    /// Writes the new status and appends one history record, atomically
    async fn update_status(
        &self,
        id: ClaimId,
        from: ClaimStatus,
        to: ClaimStatus,
    ) -> Result<Claim, PortError>;

    /// The append-only status trail for a claim, oldest first
    async fn status_history(&self, id: ClaimId) -> Result<Vec<StatusChange>, PortError>;

    /// Persists a new document row
    async fn create_document(&self, document: Document) -> Result<Document, PortError>;

    /// Finds a document by id
    async fn get_document(&self, id: DocumentId) -> Result<Option<Document>, PortError>;

    /// Persists an extraction payload onto the document and its claim in one
    /// atomic write
    async fn record_extraction(
        &self,
        document_id: DocumentId,
        claim_id: ClaimId,
        data: Value,
    ) -> Result<(), PortError>;

    /// Overwrites the claim's AI summary
    async fn set_summary(&self, id: ClaimId, summary: &str) -> Result<(), PortError>;

    /// Overwrites the claim's eligibility classification
    async fn set_eligibility(&self, id: ClaimId, eligibility: Eligibility)
        -> Result<(), PortError>;
}

/// External object storage for document bytes
#[async_trait]
pub trait BlobStore: DomainPort {
    /// Issues a time-limited write-capable URL for direct client upload
    async fn signed_upload_url(
        &self,
        key: &str,
        content_type: &str,
        ttl: Duration,
    ) -> Result<String, PortError>;

    /// Fetches the raw bytes stored under a key
    async fn get_object(&self, key: &str) -> Result<Vec<u8>, PortError>;
}

/// Converts stored document bytes into plain text
#[async_trait]
pub trait TextExtractor: DomainPort {
    async fn extract_text(&self, bytes: Vec<u8>) -> Result<String, PortError>;
}

/// External generative-text completion service
#[async_trait]
pub trait TextModel: DomainPort {
    /// Sends one prompt and returns the raw completion text
    async fn complete(&self, prompt: &str) -> Result<String, PortError>;
}

/// In-memory mock adapters for testing without external dependencies
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// In-memory implementation of [`ClaimStore`]
    #[derive(Debug, Default)]
    pub struct MockClaimStore {
        claims: Arc<RwLock<HashMap<ClaimId, Claim>>>,
        documents: Arc<RwLock<HashMap<DocumentId, Document>>>,
        history: Arc<RwLock<Vec<StatusChange>>>,
    }

    impl MockClaimStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates the store with claims
        pub async fn with_claims(claims: Vec<Claim>) -> Self {
            let store = Self::new();
            for claim in claims {
                store.claims.write().await.insert(claim.id, claim);
            }
            store
        }

        /// Inserts a document directly, bypassing the workflow
        pub async fn insert_document(&self, document: Document) {
            self.documents
                .write()
                .await
                .insert(document.id, document);
        }
    }

    impl DomainPort for MockClaimStore {}

    #[async_trait]
    impl ClaimStore for MockClaimStore {
        async fn create_claim(&self, claim: Claim) -> Result<Claim, PortError> {
            self.claims.write().await.insert(claim.id, claim.clone());
            Ok(claim)
        }

        async fn list_claims(&self, user_id: &str) -> Result<Vec<Claim>, PortError> {
            let claims = self.claims.read().await;
            let mut owned: Vec<_> = claims
                .values()
                .filter(|c| c.user_id == user_id)
                .cloned()
                .collect();
            owned.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
            Ok(owned)
        }

        async fn find_claim(
            &self,
            user_id: &str,
            id: ClaimId,
        ) -> Result<Option<Claim>, PortError> {
            Ok(self
                .claims
                .read()
                .await
                .get(&id)
                .filter(|c| c.user_id == user_id)
                .cloned())
        }

        async fn get_claim(&self, id: ClaimId) -> Result<Option<Claim>, PortError> {
            Ok(self.claims.read().await.get(&id).cloned())
        }

        async fn documents_for_claim(&self, id: ClaimId) -> Result<Vec<Document>, PortError> {
            let documents = self.documents.read().await;
            let mut attached: Vec<_> = documents
                .values()
                .filter(|d| d.claim_id == id)
                .cloned()
                .collect();
            attached.sort_by(|a, b| a.created_at.cmp(&b.created_at));
            Ok(attached)
        }

        async fn update_status(
            &self,
            id: ClaimId,
            from: ClaimStatus,
            to: ClaimStatus,
        ) -> Result<Claim, PortError> {
            let mut claims = self.claims.write().await;
            let claim = claims
                .get_mut(&id)
                .ok_or_else(|| PortError::not_found("Claim", id))?;
            claim.status = to;
            claim.updated_at = chrono::Utc::now();
            let updated = claim.clone();
            drop(claims);

            self.history
                .write()
                .await
                .push(StatusChange::new(id, from, to));
            Ok(updated)
        }

        async fn status_history(&self, id: ClaimId) -> Result<Vec<StatusChange>, PortError> {
            Ok(self
                .history
                .read()
                .await
                .iter()
                .filter(|h| h.claim_id == id)
                .cloned()
                .collect())
        }

        async fn create_document(&self, document: Document) -> Result<Document, PortError> {
            self.documents
                .write()
                .await
                .insert(document.id, document.clone());
            Ok(document)
        }

        async fn get_document(&self, id: DocumentId) -> Result<Option<Document>, PortError> {
            Ok(self.documents.read().await.get(&id).cloned())
        }

        async fn record_extraction(
            &self,
            document_id: DocumentId,
            claim_id: ClaimId,
            data: Value,
        ) -> Result<(), PortError> {
            let mut documents = self.documents.write().await;
            let document = documents
                .get_mut(&document_id)
                .ok_or_else(|| PortError::not_found("Document", document_id))?;
            document.extracted_data = Some(data.clone());
            drop(documents);

            let mut claims = self.claims.write().await;
            let claim = claims
                .get_mut(&claim_id)
                .ok_or_else(|| PortError::not_found("Claim", claim_id))?;
            claim.ai_extracted_data = Some(data);
            claim.updated_at = chrono::Utc::now();
            Ok(())
        }

        async fn set_summary(&self, id: ClaimId, summary: &str) -> Result<(), PortError> {
            let mut claims = self.claims.write().await;
            let claim = claims
                .get_mut(&id)
                .ok_or_else(|| PortError::not_found("Claim", id))?;
            claim.ai_summary = Some(summary.to_string());
            claim.updated_at = chrono::Utc::now();
            Ok(())
        }

        async fn set_eligibility(
            &self,
            id: ClaimId,
            eligibility: Eligibility,
        ) -> Result<(), PortError> {
            let mut claims = self.claims.write().await;
            let claim = claims
                .get_mut(&id)
                .ok_or_else(|| PortError::not_found("Claim", id))?;
            claim.eligibility = Some(eligibility);
            claim.updated_at = chrono::Utc::now();
            Ok(())
        }
    }

    /// In-memory implementation of [`BlobStore`]
    ///
    /// Issued URLs are fake but deterministic; bytes are held in a map.
    #[derive(Debug, Default)]
    pub struct MockBlobStore {
        objects: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    }

    impl MockBlobStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Stores bytes under a key, as if a client had used an upload URL
        pub async fn put_object(&self, key: impl Into<String>, bytes: Vec<u8>) {
            self.objects.write().await.insert(key.into(), bytes);
        }
    }

    impl DomainPort for MockBlobStore {}

    #[async_trait]
    impl BlobStore for MockBlobStore {
        async fn signed_upload_url(
            &self,
            key: &str,
            _content_type: &str,
            ttl: Duration,
        ) -> Result<String, PortError> {
            Ok(format!(
                "https://blobs.invalid/{}?signature=mock&expires={}",
                key,
                ttl.as_secs()
            ))
        }

        async fn get_object(&self, key: &str) -> Result<Vec<u8>, PortError> {
            self.objects
                .read()
                .await
                .get(key)
                .cloned()
                .ok_or_else(|| PortError::not_found("Object", key))
        }
    }

    /// [`TextExtractor`] that treats the stored bytes as UTF-8 text
    #[derive(Debug, Default)]
    pub struct MockTextExtractor;

    impl DomainPort for MockTextExtractor {}

    #[async_trait]
    impl TextExtractor for MockTextExtractor {
        async fn extract_text(&self, bytes: Vec<u8>) -> Result<String, PortError> {
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
    }

    /// Scripted [`TextModel`] that replays queued completions and records
    /// every prompt it receives
    #[derive(Debug, Default)]
    pub struct MockTextModel {
        responses: Arc<RwLock<Vec<String>>>,
        prompts: Arc<RwLock<Vec<String>>>,
        calls: AtomicUsize,
    }

    impl MockTextModel {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queues the next completion to return
        pub async fn enqueue(&self, completion: impl Into<String>) {
            self.responses.write().await.push(completion.into());
        }

        /// Number of completions served so far
        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        /// The most recent prompt received, if any
        pub async fn last_prompt(&self) -> Option<String> {
            self.prompts.read().await.last().cloned()
        }
    }

    impl DomainPort for MockTextModel {}

    #[async_trait]
    impl TextModel for MockTextModel {
        async fn complete(&self, prompt: &str) -> Result<String, PortError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.write().await.push(prompt.to_string());
            let mut responses = self.responses.write().await;
            if responses.is_empty() {
                return Err(PortError::ServiceUnavailable {
                    service: "mock text model: no scripted completion".to_string(),
                });
            }
            Ok(responses.remove(0))
        }
    }
}
