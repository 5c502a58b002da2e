use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::{FOREIGN_KEY_VIOLATION, limit_offset, violated_constraint};
use crate::data::Pagination;
use crate::data::comment_repository::{CommentRepository, NewComment};
use crate::domain::comment::Comment;
use crate::domain::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct PostgresCommentRepository {
    pool: PgPool,
}

impl PostgresCommentRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: i64,
    author_id: i64,
    author: String,
    post_id: i64,
    text: String,
    created: DateTime<Utc>,
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn create_comment(&self, input: NewComment) -> Result<Comment, DomainError> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            WITH c AS (
                INSERT INTO comments (author_id, post_id, text)
                VALUES ($1, $2, $3)
                RETURNING id, author_id, post_id, text, created
            )
            SELECT c.id, c.author_id, u.username AS author, c.post_id, c.text, c.created
            FROM c
            JOIN users u ON u.id = c.author_id
            "#,
        )
        .bind(input.author_id)
        .bind(input.post_id)
        .bind(&input.text)
        .fetch_one(&self.pool)
        .await
        .map_err(map_comment_db_error)?;

        map_row_to_comment(row)
    }

    async fn get_comment(&self, post_id: i64, id: i64) -> Result<Option<Comment>, DomainError> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT c.id, c.author_id, u.username AS author, c.post_id, c.text, c.created
            FROM comments c
            JOIN users u ON u.id = c.author_id
            WHERE c.id = $1 AND c.post_id = $2
            "#,
        )
        .bind(id)
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_comment_db_error)?;

        row.map(map_row_to_comment).transpose()
    }

    async fn update_comment(
        &self,
        id: i64,
        text: Option<String>,
    ) -> Result<Option<Comment>, DomainError> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            WITH c AS (
                UPDATE comments
                SET text = COALESCE($2, text)
                WHERE id = $1
                RETURNING id, author_id, post_id, text, created
            )
            SELECT c.id, c.author_id, u.username AS author, c.post_id, c.text, c.created
            FROM c
            JOIN users u ON u.id = c.author_id
            "#,
        )
        .bind(id)
        .bind(text)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_comment_db_error)?;

        row.map(map_row_to_comment).transpose()
    }

    async fn delete_comment(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_comment_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_comments(
        &self,
        post_id: i64,
        pagination: Option<Pagination>,
    ) -> Result<Vec<Comment>, DomainError> {
        let (limit, offset) = limit_offset(pagination);
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT c.id, c.author_id, u.username AS author, c.post_id, c.text, c.created
            FROM comments c
            JOIN users u ON u.id = c.author_id
            WHERE c.post_id = $1
            ORDER BY c.id ASC
            LIMIT $2
            OFFSET $3
            "#,
        )
        .bind(post_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_comment_db_error)?;

        rows.into_iter().map(map_row_to_comment).collect()
    }

    async fn count_comments(&self, post_id: i64) -> Result<i64, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_comment_db_error)?;

        Ok(count)
    }
}

fn map_row_to_comment(row: CommentRow) -> Result<Comment, DomainError> {
    Comment::new(
        row.id,
        row.author_id,
        row.author,
        row.post_id,
        row.text,
        row.created,
    )
    .map_err(|err| DomainError::Unexpected(err.to_string()))
}

fn map_comment_db_error(err: sqlx::Error) -> DomainError {
    match violated_constraint(&err, FOREIGN_KEY_VIOLATION) {
        Some(constraint) => foreign_key_error(&constraint, err),
        None => DomainError::Unexpected(err.to_string()),
    }
}

fn foreign_key_error(constraint: &str, err: sqlx::Error) -> DomainError {
    match constraint {
        // the parent post may disappear between resolution and insert
        "comments_post_id_fkey" => DomainError::NotFound("post".to_string()),
        "comments_author_id_fkey" => DomainError::Unauthenticated,
        _ => DomainError::Unexpected(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::foreign_key_error;
    use crate::domain::error::DomainError;

    #[test]
    fn foreign_keys_map_to_parent_or_stale_author() {
        assert!(matches!(
            foreign_key_error("comments_post_id_fkey", sqlx::Error::RowNotFound),
            DomainError::NotFound(_)
        ));
        assert!(matches!(
            foreign_key_error("comments_author_id_fkey", sqlx::Error::RowNotFound),
            DomainError::Unauthenticated
        ));
    }
}
