//! Preview image download into the customer's media library.
//!
//! The body is streamed into a staging file next to the library. The staging
//! file is removed on every exit path, so a failed download never leaves a
//! half-written image behind.

use async_trait::async_trait;
use revo_sdk::client::{BackendClient, ClientError};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

const DEFAULT_FILE_NAME: &str = "design.jpg";

/// Where downloaded designs end up (gallery, downloads folder, …).
#[async_trait]
pub trait MediaLibrary: Send + Sync {
    /// Ask for permission to write. `false` means the user declined.
    async fn request_write_permission(&self) -> std::io::Result<bool>;

    /// Directory for in-progress downloads. Should be on the same volume
    /// as the library so [`save`](MediaLibrary::save) can rename.
    fn staging_dir(&self) -> PathBuf;

    /// Move a finished file into the library, returning its final location.
    async fn save(&self, staged: &Path, file_name: &str) -> std::io::Result<PathBuf>;
}

/// Bytes received so far and the expected total, if the server sent one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadProgress {
    pub received: u64,
    pub total: Option<u64>,
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("storage permission denied")]
    PermissionDenied,

    #[error("download failed: {0}")]
    Request(#[from] ClientError),

    #[error("failed to write download: {0}")]
    Io(#[from] std::io::Error),
}

/// Removes the staging file when dropped.
struct StagedFile {
    path: PathBuf,
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Removed staging file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "Failed to remove staging file"),
        }
    }
}

/// File name for a downloaded design: the last URL path segment.
pub(crate) fn file_name_for(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| DEFAULT_FILE_NAME.to_owned())
}

/// Download `url` and store it in `library`.
///
/// Permission is requested before anything is written. `progress` is called
/// after every received chunk.
pub async fn download_to_library(
    client: &BackendClient,
    url: Url,
    library: &dyn MediaLibrary,
    mut progress: impl FnMut(DownloadProgress) + Send,
) -> Result<PathBuf, DownloadError> {
    if !library.request_write_permission().await? {
        return Err(DownloadError::PermissionDenied);
    }

    let file_name = file_name_for(&url);
    let staging_dir = library.staging_dir();
    tokio::fs::create_dir_all(&staging_dir).await?;
    let staged = StagedFile {
        path: staging_dir.join(format!(".{}.part", Uuid::new_v4())),
    };

    let mut response = client.download(url.clone()).await?;
    let total = response.content_length();
    let mut file = tokio::fs::File::create(&staged.path).await?;
    let mut received = 0u64;

    while let Some(chunk) = response.chunk().await.map_err(ClientError::from)? {
        file.write_all(&chunk).await?;
        received += chunk.len() as u64;
        progress(DownloadProgress { received, total });
    }
    file.flush().await?;
    drop(file);

    let saved = library.save(&staged.path, &file_name).await?;
    info!(url = %url, path = %saved.display(), bytes = received, "Preview image saved");
    Ok(saved)
}
