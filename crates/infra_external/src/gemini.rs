//! Gemini text-model adapter
//!
//! Implements the `TextModel` port against the generateContent HTTP API.
//! One request per completion, no retries; HTTP failures are mapped into
//! `PortError`:
//!
//! - 401/403 -> `Unauthorized`
//! - 404 -> `NotFound`
//! - 429 -> `RateLimited`
//! - 5xx -> `ServiceUnavailable`
//! - client timeout -> `Timeout`
//! - unparseable body -> `Transformation`

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use core_kernel::{DomainPort, PortError};
use domain_claims::TextModel;

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration for the Gemini adapter
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key for authentication
    pub api_key: String,
    /// Model identifier, e.g. "gemini-1.5-flash"
    pub model: String,
    /// Base URL of the API; override for testing or proxies
    pub endpoint: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Text-model adapter for the generateContent API
#[derive(Debug, Clone)]
pub struct GeminiTextModel {
    client: Client,
    config: GeminiConfig,
}

impl GeminiTextModel {
    /// Creates a new adapter with its own connection pool
    pub fn new(config: GeminiConfig) -> Result<Self, PortError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PortError::internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn request_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model,
            self.config.api_key
        )
    }
}

impl DomainPort for GeminiTextModel {}

#[async_trait]
impl TextModel for GeminiTextModel {
    async fn complete(&self, prompt: &str) -> Result<String, PortError> {
        let payload = json!({
            "contents": [
                {
                    "parts": [
                        { "text": prompt }
                    ]
                }
            ]
        });

        debug!(model = %self.config.model, prompt_bytes = prompt.len(), "sending completion request");

        let response = self
            .client
            .post(self.request_url())
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PortError::Timeout {
                        operation: "generateContent".to_string(),
                        duration_ms: self.config.timeout_secs * 1000,
                    }
                } else {
                    PortError::Connection {
                        message: format!("text model request failed: {}", e),
                        source: Some(Box::new(e)),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(map_status(status, &response, &self.config.model));
        }

        let body: GenerateContentResponse = response.json().await.map_err(|e| {
            PortError::transformation(format!("completion body was not valid JSON: {}", e))
        })?;

        let text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(PortError::transformation("completion carried no text"));
        }

        Ok(text)
    }
}

fn map_status(status: StatusCode, response: &reqwest::Response, model: &str) -> PortError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PortError::Unauthorized {
            message: format!("text model rejected credentials ({})", status),
        },
        StatusCode::NOT_FOUND => PortError::not_found("Model", model),
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after_secs = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(60);
            PortError::RateLimited { retry_after_secs }
        }
        s if s.is_server_error() => PortError::ServiceUnavailable {
            service: format!("text model ({})", s),
        },
        s => PortError::internal(format!("text model returned unexpected status {}", s)),
    }
}

/// Response shape of the generateContent API
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}
