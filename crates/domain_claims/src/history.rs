//! Claim status history

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, HistoryId};

use crate::claim::ClaimStatus;

/// One recorded status transition
///
/// The trail is append-only: one record per `set_status` call, never mutated
/// or deleted, even when `from` equals `to`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChange {
    /// Unique identifier
    pub id: HistoryId,
    /// The claim that changed
    pub claim_id: ClaimId,
    /// Status before the change
    pub from: ClaimStatus,
    /// Status after the change
    pub to: ClaimStatus,
    /// When the change was recorded
    pub changed_at: DateTime<Utc>,
}

impl StatusChange {
    /// Records a transition happening now
    pub fn new(claim_id: ClaimId, from: ClaimStatus, to: ClaimStatus) -> Self {
        Self {
            id: HistoryId::new(),
            claim_id,
            from,
            to,
            changed_at: Utc::now(),
        }
    }
}
