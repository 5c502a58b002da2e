use async_trait::async_trait;

use super::Pagination;
use crate::domain::comment::Comment;
use crate::domain::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct NewComment {
    pub(crate) post_id: i64,
    pub(crate) author_id: i64,
    pub(crate) text: String,
}

#[async_trait]
pub(crate) trait CommentRepository: Send + Sync {
    async fn create_comment(&self, input: NewComment) -> Result<Comment, DomainError>;
    /// Looks a comment up inside its parent post only.
    async fn get_comment(&self, post_id: i64, id: i64) -> Result<Option<Comment>, DomainError>;
    async fn update_comment(&self, id: i64, text: Option<String>)
    -> Result<Option<Comment>, DomainError>;
    async fn delete_comment(&self, id: i64) -> Result<bool, DomainError>;
    async fn list_comments(
        &self,
        post_id: i64,
        pagination: Option<Pagination>,
    ) -> Result<Vec<Comment>, DomainError>;
    async fn count_comments(&self, post_id: i64) -> Result<i64, DomainError>;
}
