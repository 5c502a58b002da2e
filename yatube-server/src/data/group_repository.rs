use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::group::Group;

#[derive(Debug, Clone)]
pub(crate) struct NewGroup {
    pub(crate) title: String,
    pub(crate) slug: String,
    pub(crate) description: String,
}

#[async_trait]
pub(crate) trait GroupRepository: Send + Sync {
    async fn create_group(&self, input: NewGroup) -> Result<Group, DomainError>;
    async fn get_group(&self, id: i64) -> Result<Option<Group>, DomainError>;
    async fn list_groups(&self) -> Result<Vec<Group>, DomainError>;
    /// Posts of the removed group stay, with their group cleared.
    async fn delete_group(&self, slug: &str) -> Result<bool, DomainError>;
}
