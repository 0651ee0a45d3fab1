//! Dashboard DTOs

use std::collections::BTreeMap;

use serde::Serialize;

use domain_claims::{ClaimStatus, Dashboard};

use crate::dto::claims::ClaimResponse;

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub total_claims: usize,
    /// One bucket per status, zero-filled
    pub claims_by_status: BTreeMap<ClaimStatus, usize>,
    pub recent_claims: Vec<ClaimResponse>,
}

impl From<Dashboard> for DashboardResponse {
    fn from(dashboard: Dashboard) -> Self {
        Self {
            total_claims: dashboard.total_claims,
            claims_by_status: dashboard.claims_by_status,
            recent_claims: dashboard
                .recent_claims
                .into_iter()
                .map(ClaimResponse::from)
                .collect(),
        }
    }
}
