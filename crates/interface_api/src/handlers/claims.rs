//! Claims handlers

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use core_kernel::ClaimId;

use crate::auth::TokenClaims;
use crate::dto::claims::*;
use crate::{error::ApiError, AppState};

/// Creates a new claim
pub async fn create_claim(
    State(state): State<AppState>,
    Extension(identity): Extension<TokenClaims>,
    Json(request): Json<CreateClaimRequest>,
) -> Result<Json<ClaimResponse>, ApiError> {
    request.validate()?;

    let claim = state
        .workflow
        .create_claim(identity.user_id(), request.into())
        .await?;
    Ok(Json(claim.into()))
}

/// Lists the caller's claims, most recently updated first
pub async fn list_claims(
    State(state): State<AppState>,
    Extension(identity): Extension<TokenClaims>,
) -> Result<Json<Vec<ClaimResponse>>, ApiError> {
    let claims = state.workflow.list_claims(identity.user_id()).await?;
    Ok(Json(claims.into_iter().map(ClaimResponse::from).collect()))
}

/// Gets a claim with its documents
pub async fn get_claim(
    State(state): State<AppState>,
    Extension(identity): Extension<TokenClaims>,
    Path(id): Path<Uuid>,
) -> Result<Json<ClaimDetailResponse>, ApiError> {
    let detail = state
        .workflow
        .get_claim(identity.user_id(), ClaimId::from(id))
        .await?;
    Ok(Json(detail.into()))
}

/// Updates claim status and appends a history record
pub async fn update_status(
    State(state): State<AppState>,
    Extension(identity): Extension<TokenClaims>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<ClaimResponse>, ApiError> {
    let claim = state
        .workflow
        .set_status(identity.user_id(), ClaimId::from(id), request.status)
        .await?;
    Ok(Json(claim.into()))
}

/// Lists the claim's status audit trail, oldest first
pub async fn status_history(
    State(state): State<AppState>,
    Extension(identity): Extension<TokenClaims>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<StatusChangeResponse>>, ApiError> {
    let history = state
        .workflow
        .status_history(identity.user_id(), ClaimId::from(id))
        .await?;
    Ok(Json(
        history.into_iter().map(StatusChangeResponse::from).collect(),
    ))
}
