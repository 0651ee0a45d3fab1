//! AI operation handlers
//!
//! These endpoints are authenticated but keyed by entity id alone; the
//! operations themselves report NotFound for missing entities.

use axum::{extract::State, Extension, Json};

use core_kernel::{ClaimId, DocumentId};

use crate::auth::TokenClaims;
use crate::dto::ai::*;
use crate::{error::ApiError, AppState};

/// Runs the extraction pipeline for one document
pub async fn extract_document(
    State(state): State<AppState>,
    Extension(_identity): Extension<TokenClaims>,
    Json(request): Json<ExtractDocumentRequest>,
) -> Result<Json<ExtractionResponse>, ApiError> {
    let extracted_data = state
        .workflow
        .extract_document(DocumentId::from(request.document_id))
        .await?;
    Ok(Json(ExtractionResponse { extracted_data }))
}

/// Summarizes a claim from its documents
pub async fn summarize_claim(
    State(state): State<AppState>,
    Extension(_identity): Extension<TokenClaims>,
    Json(request): Json<SummarizeClaimRequest>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let summary = state
        .workflow
        .summarize_claim(ClaimId::from(request.claim_id))
        .await?;
    Ok(Json(SummaryResponse { summary }))
}

/// Assesses a claim's eligibility
pub async fn check_eligibility(
    State(state): State<AppState>,
    Extension(_identity): Extension<TokenClaims>,
    Json(request): Json<CheckEligibilityRequest>,
) -> Result<Json<EligibilityResponse>, ApiError> {
    let assessment = state
        .workflow
        .check_eligibility(ClaimId::from(request.claim_id))
        .await?;
    Ok(Json(assessment.into()))
}
