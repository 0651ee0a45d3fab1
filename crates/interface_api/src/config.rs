//! API configuration

use serde::Deserialize;

/// API configuration
///
/// Every field can be set from the environment with an `API_` prefix, e.g.
/// `API_PORT=8080`, `API_GEMINI_API_KEY=...`, `API_S3_BUCKET=...`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    #[serde(default = "defaults::host")]
    pub host: String,
    /// Server port
    #[serde(default = "defaults::port")]
    pub port: u16,
    /// JWT secret for authentication
    #[serde(default = "defaults::jwt_secret")]
    pub jwt_secret: String,
    /// JWT expiration in seconds
    #[serde(default = "defaults::jwt_expiration_secs")]
    pub jwt_expiration_secs: u64,
    /// Database URL
    #[serde(default = "defaults::database_url")]
    pub database_url: String,
    /// Log level
    #[serde(default = "defaults::log_level")]
    pub log_level: String,
    /// API key for the text model
    #[serde(default)]
    pub gemini_api_key: String,
    /// Text model identifier
    #[serde(default = "defaults::gemini_model")]
    pub gemini_model: String,
    /// Text model endpoint override
    #[serde(default)]
    pub gemini_endpoint: Option<String>,
    /// Bucket holding document blobs
    #[serde(default = "defaults::s3_bucket")]
    pub s3_bucket: String,
    /// Object-store region override
    #[serde(default)]
    pub s3_region: Option<String>,
    /// Object-store endpoint override, for S3-compatible stores
    #[serde(default)]
    pub s3_endpoint: Option<String>,
}

mod defaults {
    pub fn host() -> String {
        "0.0.0.0".to_string()
    }

    pub fn port() -> u16 {
        8080
    }

    pub fn jwt_secret() -> String {
        "change-me-in-production".to_string()
    }

    pub fn jwt_expiration_secs() -> u64 {
        3600
    }

    pub fn database_url() -> String {
        "postgres://localhost/claims".to_string()
    }

    pub fn log_level() -> String {
        "info".to_string()
    }

    pub fn gemini_model() -> String {
        "gemini-1.5-flash".to_string()
    }

    pub fn s3_bucket() -> String {
        "claims-documents".to_string()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        // Deserializing an empty source applies every serde default
        serde_json::from_value(serde_json::json!({})).expect("defaults are complete")
    }
}

impl ApiConfig {
    /// Loads configuration from environment variables with the `API_` prefix
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API"))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
