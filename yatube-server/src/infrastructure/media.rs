use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::warn;
use uuid::Uuid;

use crate::data::media_store::MediaStore;
use crate::domain::error::DomainError;
use crate::domain::image::ImageUpload;

const POSTS_DIR: &str = "posts";

/// Stores uploaded images on the local filesystem under `MEDIA_ROOT`.
#[derive(Debug, Clone)]
pub(crate) struct LocalMediaStorage {
    root: PathBuf,
}

impl LocalMediaStorage {
    pub(crate) fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub(crate) fn root(&self) -> &Path {
        &self.root
    }

    /// Relative paths never escape the media root.
    fn resolve(&self, relative: &str) -> Option<PathBuf> {
        let relative = Path::new(relative);
        let safe = relative
            .components()
            .all(|c| matches!(c, std::path::Component::Normal(_)));
        safe.then(|| self.root.join(relative))
    }
}

#[async_trait]
impl MediaStore for LocalMediaStorage {
    async fn save_image(&self, upload: ImageUpload) -> Result<String, DomainError> {
        let dir = self.root.join(POSTS_DIR);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|err| DomainError::Unexpected(format!("media dir: {err}")))?;

        let file_name = format!("{}.{}", Uuid::new_v4().simple(), upload.extension);
        tokio::fs::write(dir.join(&file_name), &upload.bytes)
            .await
            .map_err(|err| DomainError::Unexpected(format!("media write: {err}")))?;

        Ok(format!("{POSTS_DIR}/{file_name}"))
    }

    async fn discard(&self, path: &str) {
        let Some(full) = self.resolve(path) else {
            warn!(path, "refusing to discard media outside of root");
            return;
        };
        if let Err(err) = tokio::fs::remove_file(&full).await {
            warn!(path, error = %err, "failed to discard media file");
        }
    }
}

/// Builds the public URL of a stored file.
pub(crate) fn media_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
