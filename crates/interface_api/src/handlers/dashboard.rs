//! Dashboard handler

use axum::{extract::State, Extension, Json};

use crate::auth::TokenClaims;
use crate::dto::dashboard::DashboardResponse;
use crate::{error::ApiError, AppState};

/// Aggregate view over the caller's claims
pub async fn get_dashboard(
    State(state): State<AppState>,
    Extension(identity): Extension<TokenClaims>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let dashboard = state.workflow.dashboard(identity.user_id()).await?;
    Ok(Json(dashboard.into()))
}
