use crate::error::AppError;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Lifetime of every signed URL handed out by the session (1 hour)
pub const SIGNED_URL_EXPIRY: Duration = Duration::from_secs(3600);

/// Object storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Target bucket (`R2_BUCKET_NAME`)
    pub bucket: String,

    /// S3-compatible endpoint URL (`R2_ENDPOINT`, or derived from `R2_ACCOUNT_ID`)
    pub endpoint_url: String,

    /// Access key id (`R2_ACCESS_KEY_ID`)
    pub access_key_id: String,

    /// Secret access key (`R2_SECRET_ACCESS_KEY`)
    pub secret_access_key: String,

    /// Signing region (default: "auto")
    pub region: String,

    /// Address objects as `<endpoint>/<bucket>/<key>` (default: true)
    pub force_path_style: bool,

    /// Directory downloads are saved into (default: ".")
    pub download_dir: PathBuf,
}

impl StorageConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, AppError> {
        let bucket = required("R2_BUCKET_NAME")?;

        let endpoint_url = match env::var("R2_ENDPOINT") {
            Ok(endpoint) if !endpoint.trim().is_empty() => endpoint,
            _ => {
                let account = env::var("R2_ACCOUNT_ID").map_err(|_| {
                    AppError::Config("either R2_ENDPOINT or R2_ACCOUNT_ID must be set".to_string())
                })?;
                r2_endpoint(&account)
            }
        };
        url::Url::parse(&endpoint_url)
            .map_err(|e| AppError::Config(format!("invalid endpoint '{}': {}", endpoint_url, e)))?;

        Ok(Self {
            bucket,
            endpoint_url,
            access_key_id: required("R2_ACCESS_KEY_ID")?,
            secret_access_key: required("R2_SECRET_ACCESS_KEY")?,
            region: env::var("R2_REGION").unwrap_or_else(|_| "auto".to_string()),
            force_path_style: env::var("R2_FORCE_PATH_STYLE")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true),
            download_dir: env::var("DOWNLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
        })
    }

    /// Config pointing at a local S3-compatible server (MinIO defaults)
    pub fn local(endpoint_url: &str, bucket: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            endpoint_url: endpoint_url.to_string(),
            access_key_id: "minioadmin".to_string(),
            secret_access_key: "minioadmin".to_string(),
            region: "us-east-1".to_string(),
            force_path_style: true,
            download_dir: PathBuf::from("."),
        }
    }
}

/// Cloudflare R2 account endpoint
pub fn r2_endpoint(account_id: &str) -> String {
    format!("https://{}.r2.cloudflarestorage.com", account_id.trim())
}

fn required(name: &str) -> Result<String, AppError> {
    match env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::Config(format!("{} must be set", name))),
    }
}
