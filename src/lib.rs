pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod utils;

use crate::config::StorageConfig;
use crate::handlers::TransferSession;
use crate::services::document::DownloadDocument;
use crate::services::transport::ReqwestTransport;
use std::path::PathBuf;
use std::sync::Arc;

/// Collaborators shared by every session the process opens.
#[derive(Clone)]
pub struct AppState {
    pub config: StorageConfig,
    pub signer: Arc<dyn services::signer::UrlSigner>,
    pub transport: Arc<dyn services::transport::ObjectTransport>,
    pub document: Arc<DownloadDocument>,
}

impl AppState {
    /// Wire the real S3 signer, HTTP transport and download document.
    pub fn from_config(config: StorageConfig, download_dir: Option<PathBuf>) -> Self {
        let http = reqwest::Client::new();
        let download_dir = download_dir.unwrap_or_else(|| config.download_dir.clone());

        Self {
            signer: infrastructure::storage::setup_signer(&config),
            transport: Arc::new(ReqwestTransport::new(http.clone())),
            document: Arc::new(DownloadDocument::new(http, download_dir)),
            config,
        }
    }

    pub fn new_session(&self) -> TransferSession {
        TransferSession::new(
            self.config.bucket.clone(),
            self.signer.clone(),
            self.transport.clone(),
            self.document.clone(),
        )
    }
}
