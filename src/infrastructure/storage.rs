use crate::config::StorageConfig;
use crate::services::signer::S3UrlSigner;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region, RequestChecksumCalculation};
use std::sync::Arc;
use tracing::info;

/// Build an S3 client for the configured endpoint with static credentials.
pub fn s3_client(config: &StorageConfig) -> aws_sdk_s3::Client {
    let s3_config = aws_sdk_s3::config::Builder::new()
        .behavior_version(BehaviorVersion::latest())
        .endpoint_url(&config.endpoint_url)
        .region(Region::new(config.region.clone()))
        .credentials_provider(Credentials::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            None,
            None,
            "static",
        ))
        .force_path_style(config.force_path_style)
        // Presigned PUTs must not pin a checksum of a body the SDK never sees
        .request_checksum_calculation(RequestChecksumCalculation::WhenRequired)
        .build();

    aws_sdk_s3::Client::from_conf(s3_config)
}

pub fn setup_signer(config: &StorageConfig) -> Arc<S3UrlSigner> {
    info!(
        "☁️  S3 Storage: {} (Bucket: {})",
        config.endpoint_url, config.bucket
    );

    Arc::new(S3UrlSigner::new(s3_client(config)))
}
