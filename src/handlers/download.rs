use super::session::TransferSession;
use crate::models::{DownloadLink, OperationKind, OperationState, StatusMessage};

pub const UPLOAD_FILE_FIRST: &str = "Please upload a file first to download it.";
pub const GENERATING_DOWNLOAD_URL: &str = "Generating signed URL for download...";
pub const STARTING_DOWNLOAD: &str = "URL generated. Starting download...";
pub const DOWNLOAD_SIGNING_FAILED: &str = "❌ Error creating signed URL for download.";

pub fn download_activated(name: &str) -> String {
    format!("✅ Download link for '{}' was activated.", name)
}

impl TransferSession {
    /// Sign a read URL for the selected file's key and hand it to the document
    /// as a one-shot download link.
    ///
    /// Success means the link was clicked, not that any bytes arrived.
    pub async fn download(&mut self) -> &StatusMessage {
        let Some(file) = self.selected.clone() else {
            self.set_download_status(OperationState::Failed, UPLOAD_FILE_FIRST);
            return self.download_status();
        };

        self.set_download_status(OperationState::InProgress, GENERATING_DOWNLOAD_URL);

        let request = self.signed_url_request(&file, OperationKind::Read);
        let signed = self.signer.sign(&request).await;
        let signed_url = match signed {
            Ok(url) => url,
            Err(e) => {
                tracing::error!(
                    "Error creating signed download URL for '{}': {:#}",
                    file.name,
                    e
                );
                self.set_download_status(OperationState::Failed, DOWNLOAD_SIGNING_FAILED);
                return self.download_status();
            }
        };

        self.set_download_status(OperationState::InProgress, STARTING_DOWNLOAD);

        let link_id = self.document.append_link(DownloadLink {
            href: signed_url,
            download: file.name.clone(),
        });
        self.document.click(link_id);
        self.document.remove_link(link_id);

        self.set_download_status(OperationState::Succeeded, download_activated(&file.name));
        self.download_status()
    }
}
