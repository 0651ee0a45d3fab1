//! Document entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use core_kernel::{ClaimId, DocumentId};

/// An uploaded file attached to a claim
///
/// The row only points at the blob; the bytes live in the object store under
/// `storage_key`. A document always belongs to exactly one claim, which must
/// exist when the document is registered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier
    pub id: DocumentId,
    /// Owning claim
    pub claim_id: ClaimId,
    /// Original file name as uploaded by the client
    pub file_name: String,
    /// Object-store key the bytes were uploaded under
    pub storage_key: String,
    /// Declared MIME type
    pub mime_type: String,
    /// Payload extracted from the document text by the text model
    pub extracted_data: Option<Value>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl Document {
    /// Creates a document record pointing at an already-uploaded blob
    pub fn new(
        claim_id: ClaimId,
        file_name: impl Into<String>,
        storage_key: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            id: DocumentId::new(),
            claim_id,
            file_name: file_name.into(),
            storage_key: storage_key.into(),
            mime_type: mime_type.into(),
            extracted_data: None,
            created_at: Utc::now(),
        }
    }
}
