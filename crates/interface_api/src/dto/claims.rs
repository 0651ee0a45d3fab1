//! Claims DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use domain_claims::{Claim, ClaimStatus, ClaimWithDocuments, Eligibility, NewClaim, StatusChange};

use crate::dto::documents::DocumentResponse;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateClaimRequest {
    #[validate(length(min = 1, message = "client_name must not be empty"))]
    pub client_name: String,
    #[validate(length(min = 1, message = "vehicle_reg must not be empty"))]
    pub vehicle_reg: String,
    pub lender_name: Option<String>,
}

impl From<CreateClaimRequest> for NewClaim {
    fn from(request: CreateClaimRequest) -> Self {
        NewClaim {
            client_name: request.client_name,
            vehicle_reg: request.vehicle_reg,
            lender_name: request.lender_name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: ClaimStatus,
}

#[derive(Debug, Serialize)]
pub struct ClaimResponse {
    pub id: Uuid,
    pub client_name: String,
    pub vehicle_reg: String,
    pub lender_name: Option<String>,
    pub status: ClaimStatus,
    pub eligibility: Option<Eligibility>,
    pub ai_extracted_data: Option<Value>,
    pub ai_summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Claim> for ClaimResponse {
    fn from(claim: Claim) -> Self {
        Self {
            id: *claim.id.as_uuid(),
            client_name: claim.client_name,
            vehicle_reg: claim.vehicle_reg,
            lender_name: claim.lender_name,
            status: claim.status,
            eligibility: claim.eligibility,
            ai_extracted_data: claim.ai_extracted_data,
            ai_summary: claim.ai_summary,
            created_at: claim.created_at,
            updated_at: claim.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ClaimDetailResponse {
    #[serde(flatten)]
    pub claim: ClaimResponse,
    pub documents: Vec<DocumentResponse>,
}

impl From<ClaimWithDocuments> for ClaimDetailResponse {
    fn from(detail: ClaimWithDocuments) -> Self {
        Self {
            claim: detail.claim.into(),
            documents: detail
                .documents
                .into_iter()
                .map(DocumentResponse::from)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusChangeResponse {
    pub id: Uuid,
    pub from: ClaimStatus,
    pub to: ClaimStatus,
    pub changed_at: DateTime<Utc>,
}

impl From<StatusChange> for StatusChangeResponse {
    fn from(change: StatusChange) -> Self {
        Self {
            id: *change.id.as_uuid(),
            from: change.from,
            to: change.to,
            changed_at: change.changed_at,
        }
    }
}
