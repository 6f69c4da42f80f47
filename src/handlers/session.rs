use crate::config::SIGNED_URL_EXPIRY;
use crate::models::{
    OperationKind, OperationState, SelectedFile, SessionReport, SignedUrlRequest, StatusMessage,
};
use crate::services::document::Document;
use crate::services::signer::UrlSigner;
use crate::services::transport::ObjectTransport;
use std::sync::Arc;

/// State behind one interactive transfer page: the selected file plus the
/// latest upload and download status.
///
/// Actions take `&mut self`, so a session runs one action at a time. Nothing
/// coordinates separate sessions working on the same key.
pub struct TransferSession {
    bucket: String,
    pub(crate) signer: Arc<dyn UrlSigner>,
    pub(crate) transport: Arc<dyn ObjectTransport>,
    pub(crate) document: Arc<dyn Document>,
    pub(crate) selected: Option<SelectedFile>,
    upload_status: StatusMessage,
    download_status: StatusMessage,
}

impl TransferSession {
    pub fn new(
        bucket: impl Into<String>,
        signer: Arc<dyn UrlSigner>,
        transport: Arc<dyn ObjectTransport>,
        document: Arc<dyn Document>,
    ) -> Self {
        Self {
            bucket: bucket.into(),
            signer,
            transport,
            document,
            selected: None,
            upload_status: StatusMessage::default(),
            download_status: StatusMessage::default(),
        }
    }

    /// Replace the selected file and reset both statuses.
    ///
    /// `None` is a cancelled pick and leaves everything as it was.
    pub fn select_file(&mut self, file: Option<SelectedFile>) {
        let Some(file) = file else {
            tracing::debug!("File selection cancelled, keeping current state");
            return;
        };

        tracing::info!(
            "📄 Selected '{}' ({} bytes, {})",
            file.name,
            file.size(),
            file.content_type
        );
        self.selected = Some(file);
        self.upload_status.clear();
        self.download_status.clear();
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    /// Whether upload/download should be offered at all.
    pub fn actions_enabled(&self) -> bool {
        self.selected.is_some()
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn upload_status(&self) -> &StatusMessage {
        &self.upload_status
    }

    pub fn download_status(&self) -> &StatusMessage {
        &self.download_status
    }

    pub fn report(&self) -> SessionReport {
        SessionReport {
            selected_file: self.selected.as_ref().map(|f| f.name.clone()),
            upload: self.upload_status.clone(),
            download: self.download_status.clone(),
        }
    }

    pub(crate) fn signed_url_request(
        &self,
        file: &SelectedFile,
        operation: OperationKind,
    ) -> SignedUrlRequest {
        SignedUrlRequest {
            bucket: self.bucket.clone(),
            key: file.object_key().to_string(),
            operation,
            expires_in: SIGNED_URL_EXPIRY,
        }
    }

    pub(crate) fn set_upload_status(&mut self, state: OperationState, text: impl Into<String>) {
        self.upload_status.set(state, text);
        log_status("upload", &self.upload_status);
    }

    pub(crate) fn set_download_status(&mut self, state: OperationState, text: impl Into<String>) {
        self.download_status.set(state, text);
        log_status("download", &self.download_status);
    }
}

fn log_status(action: &str, status: &StatusMessage) {
    match status.state {
        OperationState::InProgress => tracing::debug!("[{}] {}", action, status.text),
        _ => tracing::info!("[{}] {}", action, status.text),
    }
}
