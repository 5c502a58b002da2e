use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::follow::Follow;

#[async_trait]
pub(crate) trait FollowRepository: Send + Sync {
    /// Fails with `AlreadyExists` when the pair is already stored.
    async fn create_follow(&self, user_id: i64, following_id: i64) -> Result<Follow, DomainError>;
    async fn list_follows(
        &self,
        user_id: i64,
        search: Option<&str>,
    ) -> Result<Vec<Follow>, DomainError>;
}
