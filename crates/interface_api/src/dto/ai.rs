//! AI operation DTOs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use domain_claims::{Eligibility, EligibilityAssessment};

#[derive(Debug, Deserialize)]
pub struct ExtractDocumentRequest {
    pub document_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ExtractionResponse {
    pub extracted_data: Value,
}

#[derive(Debug, Deserialize)]
pub struct SummarizeClaimRequest {
    pub claim_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

#[derive(Debug, Deserialize)]
pub struct CheckEligibilityRequest {
    pub claim_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct EligibilityResponse {
    pub eligibility: Eligibility,
    pub reason: String,
}

impl From<EligibilityAssessment> for EligibilityResponse {
    fn from(assessment: EligibilityAssessment) -> Self {
        Self {
            eligibility: assessment.eligibility,
            reason: assessment.reason,
        }
    }
}
