//! PDF text extraction
//!
//! Implements the `TextExtractor` port with a pure-Rust PDF parser. Parsing
//! is CPU-bound, so it runs on the blocking pool rather than the async
//! executor.

use async_trait::async_trait;
use tracing::debug;

use core_kernel::{DomainPort, PortError};
use domain_claims::TextExtractor;

/// Text extractor for PDF bytes
#[derive(Debug, Clone, Default)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl DomainPort for PdfTextExtractor {}

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract_text(&self, bytes: Vec<u8>) -> Result<String, PortError> {
        let size = bytes.len();
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            .map_err(|e| PortError::internal(format!("extraction task failed: {}", e)))?
            .map_err(|e| {
                PortError::transformation(format!("could not extract text from PDF: {}", e))
            })?;

        debug!(pdf_bytes = size, text_bytes = text.len(), "PDF text extracted");
        Ok(text)
    }
}
