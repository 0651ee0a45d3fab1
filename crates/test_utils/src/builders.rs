//! Builder patterns for test data construction

use chrono::{DateTime, Duration, Utc};
use fake::faker::name::en::Name;
use fake::Fake;

use core_kernel::{ClaimId, DocumentId};
use domain_claims::{Claim, ClaimStatus, Document, Eligibility};

/// Builder for test claims
///
/// Defaults to a fresh `New` claim with a generated client name; override
/// what the test cares about.
#[derive(Debug, Clone)]
pub struct ClaimBuilder {
    user_id: String,
    client_name: String,
    vehicle_reg: String,
    lender_name: Option<String>,
    status: ClaimStatus,
    eligibility: Option<Eligibility>,
    updated_offset: Duration,
}

impl Default for ClaimBuilder {
    fn default() -> Self {
        Self {
            user_id: "user_test".to_string(),
            client_name: Name().fake(),
            vehicle_reg: "AB12CDE".to_string(),
            lender_name: None,
            status: ClaimStatus::New,
            eligibility: None,
            updated_offset: Duration::zero(),
        }
    }
}

impl ClaimBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owned_by(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn client_name(mut self, client_name: impl Into<String>) -> Self {
        self.client_name = client_name.into();
        self
    }

    pub fn vehicle_reg(mut self, vehicle_reg: impl Into<String>) -> Self {
        self.vehicle_reg = vehicle_reg.into();
        self
    }

    pub fn lender(mut self, lender_name: impl Into<String>) -> Self {
        self.lender_name = Some(lender_name.into());
        self
    }

    pub fn status(mut self, status: ClaimStatus) -> Self {
        self.status = status;
        self
    }

    pub fn eligibility(mut self, eligibility: Eligibility) -> Self {
        self.eligibility = Some(eligibility);
        self
    }

    /// Shifts `updated_at` forward, for tests that need a recency ordering
    pub fn updated_later_by(mut self, duration: Duration) -> Self {
        self.updated_offset = duration;
        self
    }

    pub fn build(self) -> Claim {
        let now = Utc::now();
        Claim {
            id: ClaimId::new(),
            user_id: self.user_id,
            client_name: self.client_name,
            vehicle_reg: self.vehicle_reg,
            lender_name: self.lender_name,
            status: self.status,
            eligibility: self.eligibility,
            ai_extracted_data: None,
            ai_summary: None,
            created_at: now,
            updated_at: now + self.updated_offset,
        }
    }
}

/// Builder for test documents
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    claim_id: ClaimId,
    file_name: String,
    storage_key: Option<String>,
    mime_type: String,
    created_at: DateTime<Utc>,
}

impl DocumentBuilder {
    pub fn for_claim(claim_id: ClaimId) -> Self {
        Self {
            claim_id,
            file_name: "agreement.pdf".to_string(),
            storage_key: None,
            mime_type: "application/pdf".to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn storage_key(mut self, storage_key: impl Into<String>) -> Self {
        self.storage_key = Some(storage_key.into());
        self
    }

    pub fn build(self) -> Document {
        let storage_key = self.storage_key.unwrap_or_else(|| {
            format!("claims/{}/{}.pdf", self.claim_id.as_uuid(), DocumentId::new().as_uuid())
        });
        Document {
            id: DocumentId::new(),
            claim_id: self.claim_id,
            file_name: self.file_name,
            storage_key,
            mime_type: self.mime_type,
            extracted_data: None,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_builder_defaults() {
        let claim = ClaimBuilder::new().build();
        assert_eq!(claim.status, ClaimStatus::New);
        assert!(claim.eligibility.is_none());
        assert!(!claim.client_name.is_empty());
    }

    #[test]
    fn test_claim_builder_overrides() {
        let claim = ClaimBuilder::new()
            .owned_by("user_2abc")
            .status(ClaimStatus::Approved)
            .lender("Acme Finance")
            .build();
        assert_eq!(claim.user_id, "user_2abc");
        assert_eq!(claim.status, ClaimStatus::Approved);
        assert_eq!(claim.lender_name.as_deref(), Some("Acme Finance"));
    }

    #[test]
    fn test_document_builder_key_is_namespaced() {
        let claim_id = ClaimId::new();
        let document = DocumentBuilder::for_claim(claim_id).build();
        assert!(document
            .storage_key
            .starts_with(&format!("claims/{}/", claim_id.as_uuid())));
    }
}
