//! Canned payloads for tests
//!
//! Completions mirror what the text model actually returns for the fixed
//! prompts, including the fenced-code-block habit.

use serde_json::{json, Value};

/// A representative document extraction payload
pub fn extraction_payload() -> Value {
    json!({
        "agreementNumber": "HP-44781",
        "lenderName": "Acme Finance",
        "contractDate": "2018-06-02",
        "potentialIssues": ["undisclosed commission", "missing APR disclosure"],
    })
}

/// An eligibility completion with the given classification and reason
pub fn eligibility_completion(eligibility: &str, reason: &str) -> String {
    json!({ "eligibility": eligibility, "reason": reason }).to_string()
}

/// Wraps a completion body in a markdown code fence, the way models often do
pub fn fenced(body: &str) -> String {
    format!("```json\n{}\n```", body)
}
