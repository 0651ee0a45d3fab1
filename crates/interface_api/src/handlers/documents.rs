//! Document handlers

use axum::{extract::State, Extension, Json};
use validator::Validate;

use core_kernel::ClaimId;

use crate::auth::TokenClaims;
use crate::dto::documents::*;
use crate::{error::ApiError, AppState};

/// Issues a presigned upload URL for a new document blob
pub async fn request_upload_url(
    State(state): State<AppState>,
    Extension(identity): Extension<TokenClaims>,
    Json(request): Json<UploadUrlRequest>,
) -> Result<Json<UploadUrlResponse>, ApiError> {
    request.validate()?;

    let slot = state
        .workflow
        .request_upload_slot(
            identity.user_id(),
            ClaimId::from(request.claim_id),
            &request.file_name,
            &request.file_type,
        )
        .await?;

    Ok(Json(UploadUrlResponse {
        upload_url: slot.upload_url,
        storage_key: slot.storage_key,
    }))
}

/// Registers a document row for an already-uploaded blob
pub async fn register_document(
    State(state): State<AppState>,
    Extension(identity): Extension<TokenClaims>,
    Json(request): Json<RegisterDocumentRequest>,
) -> Result<Json<DocumentResponse>, ApiError> {
    request.validate()?;

    let document = state
        .workflow
        .register_document(
            identity.user_id(),
            ClaimId::from(request.claim_id),
            &request.file_name,
            &request.storage_key,
            &request.mime_type,
        )
        .await?;

    Ok(Json(document.into()))
}
