use super::session::TransferSession;
use crate::models::{OperationKind, OperationState, StatusMessage};

pub const SELECT_FILE_FIRST: &str = "Please select a file first.";
pub const GENERATING_UPLOAD_URL: &str = "Generating signed URL for upload...";
pub const UPLOADING: &str = "Uploading file...";
pub const UPLOAD_SIGNING_FAILED: &str = "❌ Error creating signed URL.";

pub fn upload_succeeded(name: &str) -> String {
    format!("✅ File '{}' uploaded successfully!", name)
}

pub fn upload_failed(reason: &str) -> String {
    format!("❌ Upload failed: {}", reason)
}

impl TransferSession {
    /// Sign a write URL for the selected file and `PUT` its bytes there.
    pub async fn upload(&mut self) -> &StatusMessage {
        let Some(file) = self.selected.clone() else {
            self.set_upload_status(OperationState::Failed, SELECT_FILE_FIRST);
            return self.upload_status();
        };

        self.set_upload_status(OperationState::InProgress, GENERATING_UPLOAD_URL);

        let request = self.signed_url_request(&file, OperationKind::Write);
        let signed = self.signer.sign(&request).await;
        let signed_url = match signed {
            Ok(url) => url,
            Err(e) => {
                tracing::error!("Error creating signed upload URL for '{}': {:#}", file.name, e);
                self.set_upload_status(OperationState::Failed, UPLOAD_SIGNING_FAILED);
                return self.upload_status();
            }
        };

        self.set_upload_status(OperationState::InProgress, UPLOADING);

        let response = self
            .transport
            .put(&signed_url, file.bytes.clone(), &file.content_type)
            .await;

        match response {
            Ok(response) if response.is_success() => {
                self.set_upload_status(OperationState::Succeeded, upload_succeeded(&file.name));
            }
            Ok(response) => {
                self.set_upload_status(
                    OperationState::Failed,
                    upload_failed(&response.status_text()),
                );
            }
            Err(e) => {
                tracing::error!("Error uploading '{}': {:#}", file.name, e);
                self.set_upload_status(OperationState::Failed, upload_failed(&e.to_string()));
            }
        }

        self.upload_status()
    }
}
