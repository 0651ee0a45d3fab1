//! Claims repository implementation
//!
//! PostgreSQL adapter for the `ClaimStore` port: claims, documents, and the
//! status history. Lookups that take an owner use one combined predicate so
//! a foreign claim and a missing claim produce the same result, and the
//! two-entity writes (status change, extraction) run in a transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use core_kernel::{ClaimId, DocumentId, DomainPort, HistoryId, PortError};
use domain_claims::{
    Claim, ClaimStatus, ClaimStore, Document, Eligibility, StatusChange,
};

use crate::error::DatabaseError;

const CLAIM_COLUMNS: &str = "claim_id, user_id, client_name, vehicle_reg, lender_name, \
     status, eligibility, ai_extracted_data, ai_summary, created_at, updated_at";

const DOCUMENT_COLUMNS: &str =
    "document_id, claim_id, file_name, storage_key, mime_type, extracted_data, created_at";

/// PostgreSQL-backed claim store
#[derive(Debug, Clone)]
pub struct PgClaimStore {
    pool: PgPool,
}

impl PgClaimStore {
    /// Creates a new store with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl DomainPort for PgClaimStore {}

#[async_trait]
impl ClaimStore for PgClaimStore {
    async fn create_claim(&self, claim: Claim) -> Result<Claim, PortError> {
        sqlx::query(
            "INSERT INTO claims (claim_id, user_id, client_name, vehicle_reg, lender_name, \
             status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(claim.id.as_uuid())
        .bind(&claim.user_id)
        .bind(&claim.client_name)
        .bind(&claim.vehicle_reg)
        .bind(&claim.lender_name)
        .bind(ClaimStatusDb::from(claim.status))
        .bind(claim.created_at)
        .bind(claim.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db)?;

        debug!(claim_id = %claim.id, "claim row inserted");
        Ok(claim)
    }

    async fn list_claims(&self, user_id: &str) -> Result<Vec<Claim>, PortError> {
        let rows: Vec<ClaimRow> = sqlx::query_as(&format!(
            "SELECT {CLAIM_COLUMNS} FROM claims WHERE user_id = $1 ORDER BY updated_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db)?;

        Ok(rows.into_iter().map(Claim::from).collect())
    }

    async fn find_claim(&self, user_id: &str, id: ClaimId) -> Result<Option<Claim>, PortError> {
        // Combined predicate: a claim owned by someone else is
        // indistinguishable from a missing one
        let row: Option<ClaimRow> = sqlx::query_as(&format!(
            "SELECT {CLAIM_COLUMNS} FROM claims WHERE claim_id = $1 AND user_id = $2"
        ))
        .bind(id.as_uuid())
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db)?;

        Ok(row.map(Claim::from))
    }

    async fn get_claim(&self, id: ClaimId) -> Result<Option<Claim>, PortError> {
        let row: Option<ClaimRow> =
            sqlx::query_as(&format!("SELECT {CLAIM_COLUMNS} FROM claims WHERE claim_id = $1"))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(map_db)?;

        Ok(row.map(Claim::from))
    }

    async fn documents_for_claim(&self, id: ClaimId) -> Result<Vec<Document>, PortError> {
        let rows: Vec<DocumentRow> = sqlx::query_as(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE claim_id = $1 ORDER BY created_at"
        ))
        .bind(id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db)?;

        Ok(rows.into_iter().map(Document::from).collect())
    }

    async fn update_status(
        &self,
        id: ClaimId,
        from: ClaimStatus,
        to: ClaimStatus,
    ) -> Result<Claim, PortError> {
        let mut tx = self.pool.begin().await.map_err(map_db)?;
        let now = Utc::now();

        let row: Option<ClaimRow> = sqlx::query_as(&format!(
            "UPDATE claims SET status = $2, updated_at = $3 WHERE claim_id = $1 \
             RETURNING {CLAIM_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(ClaimStatusDb::from(to))
        .bind(now)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db)?;

        let row = row.ok_or_else(|| PortError::not_found("Claim", id))?;

        sqlx::query(
            "INSERT INTO claim_status_history (history_id, claim_id, from_status, to_status, \
             changed_at) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(Uuid::new_v4())
        .bind(id.as_uuid())
        .bind(ClaimStatusDb::from(from))
        .bind(ClaimStatusDb::from(to))
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(map_db)?;

        tx.commit().await.map_err(map_db)?;
        Ok(Claim::from(row))
    }

    async fn status_history(&self, id: ClaimId) -> Result<Vec<StatusChange>, PortError> {
        let rows: Vec<HistoryRow> = sqlx::query_as(
            "SELECT history_id, claim_id, from_status, to_status, changed_at \
             FROM claim_status_history WHERE claim_id = $1 ORDER BY changed_at",
        )
        .bind(id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db)?;

        Ok(rows.into_iter().map(StatusChange::from).collect())
    }

    async fn create_document(&self, document: Document) -> Result<Document, PortError> {
        sqlx::query(
            "INSERT INTO documents (document_id, claim_id, file_name, storage_key, mime_type, \
             created_at) VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(document.id.as_uuid())
        .bind(document.claim_id.as_uuid())
        .bind(&document.file_name)
        .bind(&document.storage_key)
        .bind(&document.mime_type)
        .bind(document.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db)?;

        debug!(document_id = %document.id, claim_id = %document.claim_id, "document row inserted");
        Ok(document)
    }

    async fn get_document(&self, id: DocumentId) -> Result<Option<Document>, PortError> {
        let row: Option<DocumentRow> = sqlx::query_as(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE document_id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db)?;

        Ok(row.map(Document::from))
    }

    async fn record_extraction(
        &self,
        document_id: DocumentId,
        claim_id: ClaimId,
        data: Value,
    ) -> Result<(), PortError> {
        // Both writes commit together; a failed claim update leaves the
        // document row unchanged
        let mut tx = self.pool.begin().await.map_err(map_db)?;
        let now = Utc::now();

        let result = sqlx::query("UPDATE documents SET extracted_data = $2 WHERE document_id = $1")
            .bind(document_id.as_uuid())
            .bind(&data)
            .execute(&mut *tx)
            .await
            .map_err(map_db)?;
        if result.rows_affected() == 0 {
            return Err(PortError::not_found("Document", document_id));
        }

        let result = sqlx::query(
            "UPDATE claims SET ai_extracted_data = $2, updated_at = $3 WHERE claim_id = $1",
        )
        .bind(claim_id.as_uuid())
        .bind(&data)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(map_db)?;
        if result.rows_affected() == 0 {
            return Err(PortError::not_found("Claim", claim_id));
        }

        tx.commit().await.map_err(map_db)?;
        Ok(())
    }

    async fn set_summary(&self, id: ClaimId, summary: &str) -> Result<(), PortError> {
        let result =
            sqlx::query("UPDATE claims SET ai_summary = $2, updated_at = $3 WHERE claim_id = $1")
                .bind(id.as_uuid())
                .bind(summary)
                .bind(Utc::now())
                .execute(&self.pool)
                .await
                .map_err(map_db)?;
        if result.rows_affected() == 0 {
            return Err(PortError::not_found("Claim", id));
        }
        Ok(())
    }

    async fn set_eligibility(&self, id: ClaimId, eligibility: Eligibility) -> Result<(), PortError> {
        let result =
            sqlx::query("UPDATE claims SET eligibility = $2, updated_at = $3 WHERE claim_id = $1")
                .bind(id.as_uuid())
                .bind(EligibilityDb::from(eligibility))
                .bind(Utc::now())
                .execute(&self.pool)
                .await
                .map_err(map_db)?;
        if result.rows_affected() == 0 {
            return Err(PortError::not_found("Claim", id));
        }
        Ok(())
    }
}

fn map_db(error: sqlx::Error) -> PortError {
    PortError::from(DatabaseError::from(error))
}

/// Claim status as stored in Postgres
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "claim_status", rename_all = "snake_case")]
enum ClaimStatusDb {
    New,
    Review,
    Submitted,
    Approved,
    Rejected,
}

impl From<ClaimStatus> for ClaimStatusDb {
    fn from(status: ClaimStatus) -> Self {
        match status {
            ClaimStatus::New => ClaimStatusDb::New,
            ClaimStatus::Review => ClaimStatusDb::Review,
            ClaimStatus::Submitted => ClaimStatusDb::Submitted,
            ClaimStatus::Approved => ClaimStatusDb::Approved,
            ClaimStatus::Rejected => ClaimStatusDb::Rejected,
        }
    }
}

impl From<ClaimStatusDb> for ClaimStatus {
    fn from(status: ClaimStatusDb) -> Self {
        match status {
            ClaimStatusDb::New => ClaimStatus::New,
            ClaimStatusDb::Review => ClaimStatus::Review,
            ClaimStatusDb::Submitted => ClaimStatus::Submitted,
            ClaimStatusDb::Approved => ClaimStatus::Approved,
            ClaimStatusDb::Rejected => ClaimStatus::Rejected,
        }
    }
}

/// Eligibility as stored in Postgres
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "eligibility", rename_all = "snake_case")]
enum EligibilityDb {
    LikelyValid,
    NeedsReview,
    LikelyInvalid,
}

impl From<Eligibility> for EligibilityDb {
    fn from(eligibility: Eligibility) -> Self {
        match eligibility {
            Eligibility::LikelyValid => EligibilityDb::LikelyValid,
            Eligibility::NeedsReview => EligibilityDb::NeedsReview,
            Eligibility::LikelyInvalid => EligibilityDb::LikelyInvalid,
        }
    }
}

impl From<EligibilityDb> for Eligibility {
    fn from(eligibility: EligibilityDb) -> Self {
        match eligibility {
            EligibilityDb::LikelyValid => Eligibility::LikelyValid,
            EligibilityDb::NeedsReview => Eligibility::NeedsReview,
            EligibilityDb::LikelyInvalid => Eligibility::LikelyInvalid,
        }
    }
}

/// Database row for a claim
#[derive(Debug, Clone, sqlx::FromRow)]
struct ClaimRow {
    claim_id: Uuid,
    user_id: String,
    client_name: String,
    vehicle_reg: String,
    lender_name: Option<String>,
    status: ClaimStatusDb,
    eligibility: Option<EligibilityDb>,
    ai_extracted_data: Option<Value>,
    ai_summary: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ClaimRow> for Claim {
    fn from(row: ClaimRow) -> Self {
        Claim {
            id: ClaimId::from_uuid(row.claim_id),
            user_id: row.user_id,
            client_name: row.client_name,
            vehicle_reg: row.vehicle_reg,
            lender_name: row.lender_name,
            status: row.status.into(),
            eligibility: row.eligibility.map(Eligibility::from),
            ai_extracted_data: row.ai_extracted_data,
            ai_summary: row.ai_summary,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Database row for a document
#[derive(Debug, Clone, sqlx::FromRow)]
struct DocumentRow {
    document_id: Uuid,
    claim_id: Uuid,
    file_name: String,
    storage_key: String,
    mime_type: String,
    extracted_data: Option<Value>,
    created_at: DateTime<Utc>,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Document {
            id: DocumentId::from_uuid(row.document_id),
            claim_id: ClaimId::from_uuid(row.claim_id),
            file_name: row.file_name,
            storage_key: row.storage_key,
            mime_type: row.mime_type,
            extracted_data: row.extracted_data,
            created_at: row.created_at,
        }
    }
}

/// Database row for a status transition
#[derive(Debug, Clone, sqlx::FromRow)]
struct HistoryRow {
    history_id: Uuid,
    claim_id: Uuid,
    from_status: ClaimStatusDb,
    to_status: ClaimStatusDb,
    changed_at: DateTime<Utc>,
}

impl From<HistoryRow> for StatusChange {
    fn from(row: HistoryRow) -> Self {
        StatusChange {
            id: HistoryId::from_uuid(row.history_id),
            claim_id: ClaimId::from_uuid(row.claim_id),
            from: row.from_status.into(),
            to: row.to_status.into(),
            changed_at: row.changed_at,
        }
    }
}
