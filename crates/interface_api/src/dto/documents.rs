//! Document DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use domain_claims::Document;

#[derive(Debug, Deserialize, Validate)]
pub struct UploadUrlRequest {
    pub claim_id: Uuid,
    #[validate(length(min = 1, message = "file_name must not be empty"))]
    pub file_name: String,
    #[validate(length(min = 1, message = "file_type must not be empty"))]
    pub file_type: String,
}

#[derive(Debug, Serialize)]
pub struct UploadUrlResponse {
    pub upload_url: String,
    pub storage_key: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterDocumentRequest {
    pub claim_id: Uuid,
    #[validate(length(min = 1, message = "file_name must not be empty"))]
    pub file_name: String,
    #[validate(length(min = 1, message = "storage_key must not be empty"))]
    pub storage_key: String,
    #[validate(length(min = 1, message = "mime_type must not be empty"))]
    pub mime_type: String,
}

#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    pub id: Uuid,
    pub claim_id: Uuid,
    pub file_name: String,
    pub storage_key: String,
    pub mime_type: String,
    pub extracted_data: Option<Value>,
    pub created_at: DateTime<Utc>,
}

impl From<Document> for DocumentResponse {
    fn from(document: Document) -> Self {
        Self {
            id: *document.id.as_uuid(),
            claim_id: *document.claim_id.as_uuid(),
            file_name: document.file_name,
            storage_key: document.storage_key,
            mime_type: document.mime_type,
            extracted_data: document.extracted_data,
            created_at: document.created_at,
        }
    }
}
