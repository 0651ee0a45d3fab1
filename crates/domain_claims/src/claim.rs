//! Claim aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use core_kernel::ClaimId;

use crate::document::Document;

/// Workflow stage of a claim
///
/// Transitions are unconstrained: any status may move to any other, including
/// itself. Every transition is recorded in the status history.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimStatus {
    New,
    Review,
    Submitted,
    Approved,
    Rejected,
}

impl ClaimStatus {
    /// All statuses, in declaration order
    pub const ALL: [ClaimStatus; 5] = [
        ClaimStatus::New,
        ClaimStatus::Review,
        ClaimStatus::Submitted,
        ClaimStatus::Approved,
        ClaimStatus::Rejected,
    ];

    /// Wire-form name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::New => "NEW",
            ClaimStatus::Review => "REVIEW",
            ClaimStatus::Submitted => "SUBMITTED",
            ClaimStatus::Approved => "APPROVED",
            ClaimStatus::Rejected => "REJECTED",
        }
    }
}

impl std::fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// AI-derived classification of a claim's likely validity
///
/// Set only by the eligibility check; overwritten unconditionally on each
/// call, independent of status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Eligibility {
    LikelyValid,
    NeedsReview,
    LikelyInvalid,
}

impl Eligibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Eligibility::LikelyValid => "LIKELY_VALID",
            Eligibility::NeedsReview => "NEEDS_REVIEW",
            Eligibility::LikelyInvalid => "LIKELY_INVALID",
        }
    }
}

impl std::fmt::Display for Eligibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A vehicle finance dispute case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    /// Unique identifier
    pub id: ClaimId,
    /// Owning user, the identity-provider subject. Immutable after creation.
    pub user_id: String,
    /// Name of the client the dispute is raised for
    pub client_name: String,
    /// Vehicle registration mark
    pub vehicle_reg: String,
    /// Finance lender, if known at creation
    pub lender_name: Option<String>,
    /// Workflow stage
    pub status: ClaimStatus,
    /// AI-derived validity classification
    pub eligibility: Option<Eligibility>,
    /// Payload extracted from the most recently processed document
    pub ai_extracted_data: Option<Value>,
    /// Free-text summary produced by the text model
    pub ai_summary: Option<String>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a claim
#[derive(Debug, Clone)]
pub struct NewClaim {
    pub client_name: String,
    pub vehicle_reg: String,
    pub lender_name: Option<String>,
}

impl Claim {
    /// Creates a new claim in status `New` with no derived annotations
    pub fn new(user_id: impl Into<String>, input: NewClaim) -> Self {
        let now = Utc::now();
        Self {
            id: ClaimId::new(),
            user_id: user_id.into(),
            client_name: input.client_name,
            vehicle_reg: input.vehicle_reg,
            lender_name: input.lender_name,
            status: ClaimStatus::New,
            eligibility: None,
            ai_extracted_data: None,
            ai_summary: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A claim together with its attached documents
#[derive(Debug, Clone, Serialize)]
pub struct ClaimWithDocuments {
    pub claim: Claim,
    pub documents: Vec<Document>,
}
