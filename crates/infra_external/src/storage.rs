//! S3 blob-store adapter
//!
//! Implements the `BlobStore` port against S3-compatible object storage.
//! Upload URLs are presigned PUTs bound to a key and content type; reads
//! fetch the whole object. Credentials and default region come from the
//! standard AWS environment; an explicit endpoint enables S3-compatible
//! stores outside AWS (path-style addressing is forced for those).

use std::time::Duration;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::Client;
use tracing::debug;

use core_kernel::{DomainPort, PortError};
use domain_claims::BlobStore;

/// Configuration for the S3 adapter
#[derive(Debug, Clone)]
pub struct S3Config {
    /// Bucket holding document blobs
    pub bucket: String,
    /// Region override; falls back to the environment when unset
    pub region: Option<String>,
    /// Endpoint override for S3-compatible stores
    pub endpoint_url: Option<String>,
}

/// Blob-store adapter over S3
#[derive(Debug, Clone)]
pub struct S3BlobStore {
    client: Client,
    bucket: String,
}

impl S3BlobStore {
    /// Connects using the standard AWS environment plus the given overrides
    pub async fn connect(config: S3Config) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = config.region.clone() {
            loader = loader.region(Region::new(region));
        }
        let shared = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = &config.endpoint_url {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket,
        }
    }

    /// Builds an adapter from an existing client, mainly for tests
    pub fn with_client(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

impl DomainPort for S3BlobStore {}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn signed_upload_url(
        &self,
        key: &str,
        content_type: &str,
        ttl: Duration,
    ) -> Result<String, PortError> {
        let presigning = PresigningConfig::expires_in(ttl)
            .map_err(|e| PortError::internal(format!("invalid presign expiry: {}", e)))?;

        let request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .presigned(presigning)
            .await
            .map_err(|e| map_sdk_error("presign upload", e))?;

        debug!(bucket = %self.bucket, key = %key, ttl_secs = ttl.as_secs(), "upload URL presigned");
        Ok(request.uri().to_string())
    }

    async fn get_object(&self, key: &str) -> Result<Vec<u8>, PortError> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if let SdkError::ServiceError(ref service_err) = e {
                    if service_err.err().is_no_such_key() {
                        return PortError::not_found("Object", key);
                    }
                }
                map_sdk_error("get object", e)
            })?;

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| PortError::internal(format!("failed to read object body: {}", e)))?;

        Ok(bytes.into_bytes().to_vec())
    }
}

fn map_sdk_error<E, R>(operation: &str, error: SdkError<E, R>) -> PortError
where
    E: std::fmt::Debug,
    R: std::fmt::Debug,
{
    match &error {
        SdkError::TimeoutError(_) => PortError::Timeout {
            operation: operation.to_string(),
            duration_ms: 0,
        },
        SdkError::DispatchFailure(_) => {
            PortError::connection(format!("{}: {:?}", operation, error))
        }
        _ => PortError::ServiceUnavailable {
            service: format!("object store ({}): {:?}", operation, error),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_applies_overrides() {
        let store = S3BlobStore::connect(S3Config {
            bucket: "claims-docs".to_string(),
            region: Some("eu-west-2".to_string()),
            endpoint_url: Some("http://localhost:9000".to_string()),
        })
        .await;

        assert_eq!(store.bucket, "claims-docs");
    }
}
