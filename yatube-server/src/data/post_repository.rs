use async_trait::async_trait;

use super::Pagination;
use crate::domain::error::DomainError;
use crate::domain::post::Post;

#[derive(Debug, Clone)]
pub(crate) struct NewPost {
    pub(crate) text: String,
    pub(crate) author_id: i64,
    pub(crate) group_id: Option<i64>,
    pub(crate) image: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PostPatch {
    pub(crate) text: Option<String>,
    pub(crate) group_id: Option<Option<i64>>,
    pub(crate) image: Option<Option<String>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum PostOrdering {
    #[default]
    Id,
    Author,
    AuthorDesc,
    Username,
    UsernameDesc,
}

impl PostOrdering {
    /// Unknown fields fall back to the default order instead of failing.
    pub(crate) fn parse(raw: &str) -> Self {
        match raw.trim() {
            "author" => Self::Author,
            "-author" => Self::AuthorDesc,
            "username" => Self::Username,
            "-username" => Self::UsernameDesc,
            _ => Self::Id,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PostFilter {
    pub(crate) group_id: Option<i64>,
    pub(crate) search: Option<String>,
    pub(crate) ordering: PostOrdering,
}

#[async_trait]
pub(crate) trait PostRepository: Send + Sync {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError>;
    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError>;
    async fn update_post(&self, id: i64, patch: PostPatch) -> Result<Option<Post>, DomainError>;
    async fn delete_post(&self, id: i64) -> Result<bool, DomainError>;
    async fn list_posts(
        &self,
        filter: &PostFilter,
        pagination: Option<Pagination>,
    ) -> Result<Vec<Post>, DomainError>;
    async fn count_posts(&self, filter: &PostFilter) -> Result<i64, DomainError>;
}
