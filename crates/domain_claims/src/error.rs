//! Claims workflow errors

use thiserror::Error;

use core_kernel::{ClaimId, DocumentId, PortError};

/// Errors produced by the claims workflow
///
/// A claim that exists but is owned by another user is reported as
/// `ClaimNotFound`, indistinguishable from a missing id.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Claim not found: {0}")]
    ClaimNotFound(ClaimId),

    #[error("Document not found: {0}")]
    DocumentNotFound(DocumentId),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Model response error: {0}")]
    ModelResponse(String),

    #[error(transparent)]
    Port(#[from] PortError),
}
