use crate::error::AppError;
use crate::models::{OperationKind, SignedUrlRequest};
use anyhow::Result;
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::presigning::PresigningConfig;

/// Produces time-limited signed URLs for a single object operation.
#[async_trait]
pub trait UrlSigner: Send + Sync {
    async fn sign(&self, request: &SignedUrlRequest) -> Result<String>;
}

/// Signs requests locally with the S3 SDK; no network round trip.
pub struct S3UrlSigner {
    client: Client,
}

impl S3UrlSigner {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UrlSigner for S3UrlSigner {
    async fn sign(&self, request: &SignedUrlRequest) -> Result<String> {
        let presigning_config = PresigningConfig::expires_in(request.expires_in)
            .map_err(|e| AppError::Signing(format!("invalid expiry: {}", e)))?;

        let presigned = match request.operation {
            OperationKind::Write => self
                .client
                .put_object()
                .bucket(&request.bucket)
                .key(&request.key)
                .presigned(presigning_config)
                .await
                .map_err(|e| AppError::Signing(format!("{:?}", e)))?,
            OperationKind::Read => self
                .client
                .get_object()
                .bucket(&request.bucket)
                .key(&request.key)
                .presigned(presigning_config)
                .await
                .map_err(|e| AppError::Signing(format!("{:?}", e)))?,
        };

        tracing::debug!(
            "🔏 Signed {} URL for {}/{} ({}s)",
            request.operation,
            request.bucket,
            request.key,
            request.expires_in.as_secs()
        );

        Ok(presigned.uri().to_string())
    }
}
