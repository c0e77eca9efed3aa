use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;
use wax_common::{Result, WaxError};
use wax_config::ContentSource;

use super::ContentResolver;

/// Reads content directly from a base directory.
pub struct FileSystemResolver {
    base_dir: PathBuf,
}

impl FileSystemResolver {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Canonical on-disk path for `path`, or `None` if it is missing or
    /// escapes the base directory (including through symlinks).
    async fn locate(&self, path: &str) -> Option<PathBuf> {
        let clean = path.trim_start_matches('/');
        let canonical_base = tokio::fs::canonicalize(&self.base_dir).await.ok()?;
        let canonical_file = tokio::fs::canonicalize(self.base_dir.join(clean))
            .await
            .ok()?;
        if !canonical_file.starts_with(&canonical_base) {
            debug!(path, "path resolves outside content root");
            return None;
        }
        Some(canonical_file)
    }
}

#[async_trait]
impl ContentResolver for FileSystemResolver {
    async fn exists(&self, path: &str) -> bool {
        match self.locate(path).await {
            Some(file) => tokio::fs::metadata(&file)
                .await
                .map(|m| m.is_file())
                .unwrap_or(false),
            None => false,
        }
    }

    async fn read_all(&self, path: &str) -> Result<Vec<u8>> {
        let file = self
            .locate(path)
            .await
            .ok_or_else(|| WaxError::NotFound(path.to_string()))?;
        Ok(tokio::fs::read(&file).await?)
    }

    fn kind(&self) -> ContentSource {
        ContentSource::FileSystem
    }
}
