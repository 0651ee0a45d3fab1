//! Prompt construction for the text model
//!
//! Prompts are fixed-shape; the only variable parts are claim fields and
//! document text. Document text is capped before prompt assembly so a large
//! document set cannot produce an unbounded request.

use crate::claim::Claim;

/// Byte budget for concatenated document text embedded in a prompt.
/// Truncation happens on a character boundary.
pub const MAX_DOCUMENT_PROMPT_BYTES: usize = 64 * 1024;

/// Prompt asking the model to pull structured fields out of document text
pub fn extraction_prompt(text: &str) -> String {
    format!(
        "Extract the following information from the document text:\n\
         - agreementNumber\n\
         - lenderName\n\
         - contractDate\n\
         - potentialIssues (array of strings)\n\
         \n\
         Return the extracted data as a JSON object.\n\
         \n\
         Text:\n\
         {}",
        truncate_on_char_boundary(text, MAX_DOCUMENT_PROMPT_BYTES)
    )
}

/// Prompt asking the model for a short professional claim summary
pub fn summary_prompt(claim: &Claim, documents_text: &str) -> String {
    format!(
        "Provide a concise professional summary (3-5 lines) for the following \
         claim information and documents.\n\
         \n\
         Claim Details:\n\
         - Client Name: {}\n\
         - Vehicle Registration: {}\n\
         - Lender Name: {}\n\
         \n\
         Documents Text:\n\
         {}",
        claim.client_name,
        claim.vehicle_reg,
        claim.lender_name.as_deref().unwrap_or("Not provided"),
        truncate_on_char_boundary(documents_text, MAX_DOCUMENT_PROMPT_BYTES)
    )
}

/// Prompt asking the model to assess eligibility as a JSON object
pub fn eligibility_prompt(claim: &Claim) -> String {
    let extracted = claim
        .ai_extracted_data
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| "null".to_string());

    format!(
        "Based on the following claim information, assess the likely \
         eligibility and provide a brief explanation.\n\
         The eligibility should be one of: LIKELY_VALID, NEEDS_REVIEW, \
         LIKELY_INVALID.\n\
         Return the eligibility and a brief reason as a JSON object with keys \
         \"eligibility\" and \"reason\".\n\
         \n\
         Claim Details:\n\
         - Client Name: {}\n\
         - Vehicle Registration: {}\n\
         - Lender Name: {}\n\
         - Extracted Data: {}",
        claim.client_name,
        claim.vehicle_reg,
        claim.lender_name.as_deref().unwrap_or("Not provided"),
        extracted
    )
}

/// Truncates `text` to at most `max_bytes`, backing off to a character
/// boundary so the result stays valid UTF-8
pub fn truncate_on_char_boundary(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
