use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::image::ImageUpload;

#[async_trait]
pub(crate) trait MediaStore: Send + Sync {
    /// Persists the image and returns its path relative to the media root.
    async fn save_image(&self, upload: ImageUpload) -> Result<String, DomainError>;
    /// Best effort removal of a previously saved file.
    async fn discard(&self, path: &str);
}
