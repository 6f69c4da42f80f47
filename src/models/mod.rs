use crate::error::{AppError, AppResult};
use crate::utils::files::{detect_content_type, file_name_of};
use bytes::Bytes;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// The one file a session works on. Never persisted.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let name = name.into();
        let bytes = bytes.into();
        let content_type = detect_content_type(&name, &bytes);
        Self {
            name,
            content_type,
            bytes,
        }
    }

    /// Read a local file; the name is its final path component.
    pub async fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let name = file_name_of(path).ok_or_else(|| {
            AppError::InvalidFile(format!("'{}' has no file name", path.display()))
        })?;
        let bytes = tokio::fs::read(path).await?;
        Ok(Self::new(name, bytes))
    }

    /// Objects are keyed by the file name, verbatim.
    pub fn object_key(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Read,
    Write,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Read => write!(f, "read"),
            OperationKind::Write => write!(f, "write"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedUrlRequest {
    pub bucket: String,
    pub key: String,
    pub operation: OperationKind,
    pub expires_in: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationState {
    #[default]
    Idle,
    InProgress,
    Succeeded,
    Failed,
}

/// Latest outcome of one kind of action. Overwritten on every update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    pub state: OperationState,
    pub text: String,
}

impl StatusMessage {
    pub fn set(&mut self, state: OperationState, text: impl Into<String>) {
        self.state = state;
        self.text = text.into();
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A transient anchor: `href` to navigate to, `download` as the suggested name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    pub href: String,
    pub download: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub selected_file: Option<String>,
    pub upload: StatusMessage,
    pub download: StatusMessage,
}
