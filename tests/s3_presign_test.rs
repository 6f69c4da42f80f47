use r2_signed_transfer::config::{SIGNED_URL_EXPIRY, StorageConfig, r2_endpoint};
use r2_signed_transfer::error::AppError;
use r2_signed_transfer::infrastructure::storage::s3_client;
use r2_signed_transfer::models::{OperationKind, SignedUrlRequest};
use r2_signed_transfer::services::signer::{S3UrlSigner, UrlSigner};
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

fn signer(config: &StorageConfig) -> S3UrlSigner {
    S3UrlSigner::new(s3_client(config))
}

fn request(key: &str, operation: OperationKind) -> SignedUrlRequest {
    SignedUrlRequest {
        bucket: "uploads".to_string(),
        key: key.to_string(),
        operation,
        expires_in: SIGNED_URL_EXPIRY,
    }
}

fn query(url: &Url) -> HashMap<String, String> {
    url.query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

#[tokio::test]
async fn test_presigned_put_url() {
    let config = StorageConfig::local("http://127.0.0.1:9000", "uploads");
    let signed = signer(&config)
        .sign(&request("report.pdf", OperationKind::Write))
        .await
        .unwrap();

    let url = Url::parse(&signed).unwrap();
    assert_eq!(url.host_str(), Some("127.0.0.1"));
    assert_eq!(url.port(), Some(9000));
    assert_eq!(url.path(), "/uploads/report.pdf");

    let params = query(&url);
    assert_eq!(params.get("X-Amz-Expires").map(String::as_str), Some("3600"));
    assert_eq!(params.get("x-id").map(String::as_str), Some("PutObject"));
    assert!(params.contains_key("X-Amz-Signature"));
    assert!(params["X-Amz-Credential"].starts_with("minioadmin/"));
}

#[tokio::test]
async fn test_presigned_get_url() {
    let config = StorageConfig::local("http://127.0.0.1:9000", "uploads");
    let signed = signer(&config)
        .sign(&request("x.png", OperationKind::Read))
        .await
        .unwrap();

    let url = Url::parse(&signed).unwrap();
    assert_eq!(url.path(), "/uploads/x.png");

    let params = query(&url);
    assert_eq!(params.get("X-Amz-Expires").map(String::as_str), Some("3600"));
    assert_eq!(params.get("x-id").map(String::as_str), Some("GetObject"));
}

#[tokio::test]
async fn test_presigned_url_encodes_key() {
    let config = StorageConfig::local("http://127.0.0.1:9000", "uploads");
    let signed = signer(&config)
        .sign(&request("my report.pdf", OperationKind::Write))
        .await
        .unwrap();

    let url = Url::parse(&signed).unwrap();
    assert_eq!(url.path(), "/uploads/my%20report.pdf");
}

#[tokio::test]
async fn test_presigned_url_for_r2_account() {
    let mut config = StorageConfig::local(&r2_endpoint("0123abcd"), "media");
    config.region = "auto".to_string();

    let mut req = request("clip.mp4", OperationKind::Read);
    req.bucket = "media".to_string();

    let signed = signer(&config).sign(&req).await.unwrap();
    let url = Url::parse(&signed).unwrap();
    assert_eq!(url.scheme(), "https");
    assert_eq!(url.host_str(), Some("0123abcd.r2.cloudflarestorage.com"));
    assert_eq!(url.path(), "/media/clip.mp4");
    assert!(query(&url)["X-Amz-Credential"].contains("/auto/s3/aws4_request"));
}

#[tokio::test]
async fn test_expiry_beyond_a_week_is_rejected() {
    let config = StorageConfig::local("http://127.0.0.1:9000", "uploads");
    let mut req = request("report.pdf", OperationKind::Write);
    req.expires_in = Duration::from_secs(8 * 24 * 3600);

    let err = signer(&config).sign(&req).await.unwrap_err();
    assert!(
        matches!(err.downcast_ref::<AppError>(), Some(AppError::Signing(_))),
        "unexpected error: {:?}",
        err
    );
}
