//! Claims workflow domain
//!
//! This crate is the core of the claims system. It defines the claim,
//! document, and status-history entities, the port traits for every
//! collaborator the workflow depends on (persistence, blob storage, text
//! extraction, text completion), and the [`workflow::ClaimWorkflow`] service
//! that orchestrates claim lifecycle, document ingestion, and AI-derived
//! annotation.
//!
//! The crate performs no I/O of its own; adapters in `infra_db` and
//! `infra_external` implement the ports. In-memory mock adapters are
//! available behind the `mock` feature for tests.

pub mod claim;
pub mod document;
pub mod error;
pub mod history;
pub mod ports;
pub mod prompts;
pub mod workflow;

pub use claim::{Claim, ClaimStatus, ClaimWithDocuments, Eligibility, NewClaim};
pub use document::Document;
pub use error::WorkflowError;
pub use history::StatusChange;
pub use ports::{BlobStore, ClaimStore, TextExtractor, TextModel};
pub use workflow::{ClaimWorkflow, Dashboard, EligibilityAssessment, UploadSlot};
