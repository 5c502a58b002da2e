use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::{FOREIGN_KEY_VIOLATION, like_pattern, limit_offset, violated_constraint};
use crate::data::Pagination;
use crate::data::post_repository::{NewPost, PostFilter, PostOrdering, PostPatch, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::post::Post;

const POST_COLUMNS: &str = r#"
    p.id,
    p.text,
    p.pub_date,
    p.author_id,
    u.username AS author,
    p.group_id,
    p.image
"#;

#[derive(Debug, Clone)]
pub(crate) struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: i64,
    text: String,
    pub_date: DateTime<Utc>,
    author_id: i64,
    author: String,
    group_id: Option<i64>,
    image: Option<String>,
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let query = format!(
            r#"
            WITH p AS (
                INSERT INTO posts (text, author_id, group_id, image)
                VALUES ($1, $2, $3, $4)
                RETURNING id, text, pub_date, author_id, group_id, image
            )
            SELECT {POST_COLUMNS}
            FROM p
            JOIN users u ON u.id = p.author_id
            "#
        );

        let row = sqlx::query_as::<_, PostRow>(&query)
            .bind(&input.text)
            .bind(input.author_id)
            .bind(input.group_id)
            .bind(&input.image)
            .fetch_one(&self.pool)
            .await
            .map_err(map_post_db_error)?;

        map_row_to_post(row)
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let query = format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts p
            JOIN users u ON u.id = p.author_id
            WHERE p.id = $1
            "#
        );

        let row = sqlx::query_as::<_, PostRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_post_db_error)?;

        row.map(map_row_to_post).transpose()
    }

    async fn update_post(&self, id: i64, patch: PostPatch) -> Result<Option<Post>, DomainError> {
        // pub_date and author_id are never part of the SET list
        let query = format!(
            r#"
            WITH p AS (
                UPDATE posts
                SET text = COALESCE($2, text),
                    group_id = CASE WHEN $3 THEN $4 ELSE group_id END,
                    image = CASE WHEN $5 THEN $6 ELSE image END
                WHERE id = $1
                RETURNING id, text, pub_date, author_id, group_id, image
            )
            SELECT {POST_COLUMNS}
            FROM p
            JOIN users u ON u.id = p.author_id
            "#
        );

        let row = sqlx::query_as::<_, PostRow>(&query)
            .bind(id)
            .bind(&patch.text)
            .bind(patch.group_id.is_some())
            .bind(patch.group_id.flatten())
            .bind(patch.image.is_some())
            .bind(patch.image.flatten())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_post_db_error)?;

        row.map(map_row_to_post).transpose()
    }

    async fn delete_post(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            DELETE FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_posts(
        &self,
        filter: &PostFilter,
        pagination: Option<Pagination>,
    ) -> Result<Vec<Post>, DomainError> {
        let (limit, offset) = limit_offset(pagination);
        let query = format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts p
            JOIN users u ON u.id = p.author_id
            WHERE ($1::BIGINT IS NULL OR p.group_id = $1)
              AND ($2::TEXT IS NULL OR p.text ILIKE $2)
            ORDER BY {}
            LIMIT $3
            OFFSET $4
            "#,
            order_clause(filter.ordering)
        );

        let rows = sqlx::query_as::<_, PostRow>(&query)
            .bind(filter.group_id)
            .bind(filter.search.as_deref().and_then(like_pattern))
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(map_post_db_error)?;

        rows.into_iter().map(map_row_to_post).collect()
    }

    async fn count_posts(&self, filter: &PostFilter) -> Result<i64, DomainError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM posts p
            WHERE ($1::BIGINT IS NULL OR p.group_id = $1)
              AND ($2::TEXT IS NULL OR p.text ILIKE $2)
            "#,
        )
        .bind(filter.group_id)
        .bind(filter.search.as_deref().and_then(like_pattern))
        .fetch_one(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        Ok(count)
    }
}

fn order_clause(ordering: PostOrdering) -> &'static str {
    match ordering {
        PostOrdering::Id => "p.id ASC",
        PostOrdering::Author => "p.author_id ASC, p.id ASC",
        PostOrdering::AuthorDesc => "p.author_id DESC, p.id ASC",
        PostOrdering::Username => "u.username ASC, p.id ASC",
        PostOrdering::UsernameDesc => "u.username DESC, p.id ASC",
    }
}

fn map_row_to_post(row: PostRow) -> Result<Post, DomainError> {
    Post::new(
        row.id,
        row.text,
        row.pub_date,
        row.author_id,
        row.author,
        row.group_id,
        row.image,
    )
    .map_err(|err| DomainError::Unexpected(err.to_string()))
}

fn map_post_db_error(err: sqlx::Error) -> DomainError {
    match violated_constraint(&err, FOREIGN_KEY_VIOLATION) {
        Some(constraint) => foreign_key_error(&constraint, err),
        None => DomainError::Unexpected(err.to_string()),
    }
}

fn foreign_key_error(constraint: &str, err: sqlx::Error) -> DomainError {
    match constraint {
        "posts_group_id_fkey" => DomainError::Validation {
            field: "group",
            message: "group does not exist",
        },
        // token outlived its account
        "posts_author_id_fkey" => DomainError::Unauthenticated,
        _ => DomainError::Unexpected(err.to_string()),
    }
}
