//! Loading local files into multipart parts.

use bytes::Bytes;
use revo_sdk::objects::FilePart;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A local attachment could not be read.
#[derive(Debug, Error)]
#[error("failed to read attachment {}: {source}", path.display())]
pub struct AttachmentError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Read `path` fully into a [`FilePart`].
pub async fn read_file_part(path: &Path, mime: &str) -> Result<FilePart, AttachmentError> {
    let content = tokio::fs::read(path).await.map_err(|source| AttachmentError {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(FilePart {
        file_name: file_name(path),
        mime: mime.to_owned(),
        content: Bytes::from(content),
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "attachment".to_owned())
}
