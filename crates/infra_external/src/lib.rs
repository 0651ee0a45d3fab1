//! External-System Adapters
//!
//! Adapters backing the domain ports with remote systems:
//!
//! - [`GeminiTextModel`]: the `TextModel` port over the generateContent HTTP
//!   API
//! - [`S3BlobStore`]: the `BlobStore` port over S3-compatible object storage
//!   with presigned-URL upload
//! - [`PdfTextExtractor`]: the `TextExtractor` port using a pure-Rust PDF
//!   parser on the blocking pool
//!
//! All adapters are fail-fast: one attempt per call, transport timeouts
//! only, failures mapped into `core_kernel::PortError`.

pub mod gemini;
pub mod pdf;
pub mod storage;

pub use gemini::{GeminiConfig, GeminiTextModel};
pub use pdf::PdfTextExtractor;
pub use storage::{S3BlobStore, S3Config};
