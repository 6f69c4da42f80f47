use crate::models::DownloadLink;
use crate::utils::files::sanitize_filename;
use anyhow::{Result, bail};
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tokio::task::JoinHandle;

pub type LinkId = u64;

/// Where transient download links live while they are being clicked.
///
/// Clicking hands the navigation to the document; callers get no result back.
pub trait Document: Send + Sync {
    fn append_link(&self, link: DownloadLink) -> LinkId;
    fn click(&self, id: LinkId);
    fn remove_link(&self, id: LinkId);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    pub completed: usize,
    pub failed: usize,
}

/// Outcomes of downloads that finished since the last `wait_for_downloads`
#[derive(Debug, Default)]
struct DownloadTally {
    completed: AtomicUsize,
    failed: AtomicUsize,
}

impl DownloadTally {
    fn take(&self) -> DownloadSummary {
        DownloadSummary {
            completed: self.completed.swap(0, Ordering::AcqRel),
            failed: self.failed.swap(0, Ordering::AcqRel),
        }
    }
}

/// Saves clicked links into a directory, one detached task per click.
pub struct DownloadDocument {
    client: reqwest::Client,
    download_dir: PathBuf,
    links: DashMap<LinkId, DownloadLink>,
    next_id: AtomicU64,
    tally: Arc<DownloadTally>,
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl DownloadDocument {
    pub fn new(client: reqwest::Client, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            download_dir: download_dir.into(),
            links: DashMap::new(),
            next_id: AtomicU64::new(1),
            tally: Arc::new(DownloadTally::default()),
            pending: Mutex::new(Vec::new()),
        }
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Number of links currently attached
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Downloads started but not yet reaped
    pub fn pending_count(&self) -> usize {
        match self.pending.lock() {
            Ok(pending) => pending.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// Wait for every download started so far.
    pub async fn wait_for_downloads(&self) -> DownloadSummary {
        let handles = match self.pending.lock() {
            Ok(mut pending) => std::mem::take(&mut *pending),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        };

        let mut panicked = 0;
        for handle in handles {
            if let Err(e) = handle.await {
                tracing::error!("Download task panicked: {}", e);
                panicked += 1;
            }
        }

        let mut summary = self.tally.take();
        summary.failed += panicked;
        summary
    }
}

impl Document for DownloadDocument {
    fn append_link(&self, link: DownloadLink) -> LinkId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.links.insert(id, link);
        id
    }

    fn click(&self, id: LinkId) {
        let Some(link) = self.links.get(&id).map(|l| l.value().clone()) else {
            tracing::warn!("Click on detached link {}", id);
            return;
        };

        let dir = self.download_dir.clone();
        let target = dir.join(sanitize_filename(&link.download));
        let client = self.client.clone();
        let tally = self.tally.clone();

        let handle = tokio::spawn(async move {
            match save_link(&client, &link.href, &dir, &target).await {
                Ok(written) => {
                    tracing::info!("📥 Saved {} bytes to {}", written, target.display());
                    tally.completed.fetch_add(1, Ordering::AcqRel);
                }
                Err(e) => {
                    tracing::error!("❌ Download of '{}' failed: {:#}", link.download, e);
                    tally.failed.fetch_add(1, Ordering::AcqRel);
                }
            }
        });

        // Finished tasks already recorded their outcome in the tally
        let mut pending = match self.pending.lock() {
            Ok(pending) => pending,
            Err(poisoned) => poisoned.into_inner(),
        };
        pending.retain(|h| !h.is_finished());
        pending.push(handle);
    }

    fn remove_link(&self, id: LinkId) {
        self.links.remove(&id);
    }
}

/// Stream `href` into a temp file next to `target`; `target` is only
/// replaced once the whole body has arrived.
async fn save_link(client: &reqwest::Client, href: &str, dir: &Path, target: &Path) -> Result<u64> {
    let mut response = client.get(href).send().await?;
    if !response.status().is_success() {
        bail!("server responded with {}", response.status());
    }

    let (std_file, temp_path) = NamedTempFile::new_in(dir)?.into_parts();
    let mut file = tokio::fs::File::from_std(std_file);
    let mut written = 0u64;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    drop(file);

    temp_path.persist(target)?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;
    use tokio::time::{Duration, sleep};

    fn link(name: &str) -> DownloadLink {
        DownloadLink {
            href: "http://127.0.0.1:9/never".to_string(),
            download: name.to_string(),
        }
    }

    /// Serves one response that promises more body than it sends, then hangs up.
    async fn spawn_truncating_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 1000\r\n\r\n0123456789")
                .await
                .unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://{}/x.bin", addr)
    }

    #[test]
    fn test_append_and_remove_links() {
        let document = DownloadDocument::new(reqwest::Client::new(), ".");
        let a = document.append_link(link("a.txt"));
        let b = document.append_link(link("b.txt"));
        assert_ne!(a, b);
        assert_eq!(document.link_count(), 2);

        document.remove_link(a);
        document.remove_link(b);
        document.remove_link(b);
        assert_eq!(document.link_count(), 0);
    }

    #[tokio::test]
    async fn test_click_on_removed_link_starts_nothing() {
        let document = DownloadDocument::new(reqwest::Client::new(), ".");
        let id = document.append_link(link("a.txt"));
        document.remove_link(id);
        document.click(id);

        assert_eq!(document.wait_for_downloads().await, DownloadSummary::default());
    }

    #[tokio::test]
    async fn test_unreachable_download_counts_as_failed() {
        let dir = tempfile::tempdir().unwrap();
        let document = DownloadDocument::new(reqwest::Client::new(), dir.path());
        let id = document.append_link(link("a.txt"));
        document.click(id);
        document.remove_link(id);

        let summary = document.wait_for_downloads().await;
        assert_eq!(summary.completed, 0);
        assert_eq!(summary.failed, 1);
        assert!(!dir.path().join("a.txt").exists());
    }

    #[tokio::test]
    async fn test_truncated_body_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("x.bin");
        tokio::fs::write(&target, b"original contents").await.unwrap();

        let document = DownloadDocument::new(reqwest::Client::new(), dir.path());
        let id = document.append_link(DownloadLink {
            href: spawn_truncating_server().await,
            download: "x.bin".to_string(),
        });
        document.click(id);
        document.remove_link(id);

        let summary = document.wait_for_downloads().await;
        assert_eq!(summary, DownloadSummary { completed: 0, failed: 1 });
        assert_eq!(tokio::fs::read(&target).await.unwrap(), b"original contents");

        // No temp file left behind next to it
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[tokio::test]
    async fn test_finished_downloads_are_pruned_on_click() {
        let dir = tempfile::tempdir().unwrap();
        let document = DownloadDocument::new(reqwest::Client::new(), dir.path());

        for name in ["a.txt", "b.txt", "c.txt"] {
            let id = document.append_link(link(name));
            document.click(id);
            document.remove_link(id);
        }
        assert_eq!(document.pending_count(), 3);

        for _ in 0..100 {
            if document.tally.failed.load(Ordering::Acquire) == 3 {
                break;
            }
            sleep(Duration::from_millis(50)).await;
        }
        // Let the tasks return after recording their outcome
        for _ in 0..100 {
            let all_done = document.pending.lock().unwrap().iter().all(|h| h.is_finished());
            if all_done {
                break;
            }
            sleep(Duration::from_millis(10)).await;
        }

        let id = document.append_link(link("d.txt"));
        document.click(id);
        document.remove_link(id);
        assert_eq!(document.pending_count(), 1);

        let summary = document.wait_for_downloads().await;
        assert_eq!(summary, DownloadSummary { completed: 0, failed: 4 });
        assert_eq!(document.pending_count(), 0);
    }
}
