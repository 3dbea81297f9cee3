//! Media library backed by a plain directory.

use async_trait::async_trait;
use revo_core::status::MediaLibrary;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub struct DirectoryLibrary {
    dir: PathBuf,
}

impl DirectoryLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// First free name for `file_name`: `logo.png`, `logo-1.png`, ...
    fn free_path(&self, file_name: &str) -> PathBuf {
        let candidate = self.dir.join(file_name);
        if !candidate.exists() {
            return candidate;
        }

        let path = Path::new(file_name);
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("design");
        let ext = path.extension().and_then(|e| e.to_str());
        (1..)
            .map(|n| match ext {
                Some(ext) => self.dir.join(format!("{stem}-{n}.{ext}")),
                None => self.dir.join(format!("{stem}-{n}")),
            })
            .find(|p| !p.exists())
            .unwrap_or(candidate)
    }
}

#[async_trait]
impl MediaLibrary for DirectoryLibrary {
    async fn request_write_permission(&self) -> std::io::Result<bool> {
        match tokio::fs::create_dir_all(&self.dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::PermissionDenied => return Ok(false),
            Err(e) => return Err(e),
        }
        let metadata = tokio::fs::metadata(&self.dir).await?;
        Ok(!metadata.permissions().readonly())
    }

    fn staging_dir(&self) -> PathBuf {
        self.dir.join(".partial")
    }

    async fn save(&self, staged: &Path, file_name: &str) -> std::io::Result<PathBuf> {
        let target = self.free_path(file_name);
        tokio::fs::rename(staged, &target).await?;
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_never_overwrites() {
        let root = tempfile::tempdir().unwrap();
        let library = DirectoryLibrary::new(root.path().join("designs"));
        assert!(library.request_write_permission().await.unwrap());

        let staging = library.staging_dir();
        std::fs::create_dir_all(&staging).unwrap();

        let mut saved = Vec::new();
        for content in ["first", "second"] {
            let staged = staging.join(format!("{content}.part"));
            std::fs::write(&staged, content).unwrap();
            saved.push(library.save(&staged, "logo.png").await.unwrap());
        }

        assert_eq!(saved[0].file_name().unwrap(), "logo.png");
        assert_eq!(saved[1].file_name().unwrap(), "logo-1.png");
        assert_eq!(std::fs::read_to_string(&saved[0]).unwrap(), "first");
        assert_eq!(std::fs::read_to_string(&saved[1]).unwrap(), "second");
    }
}
