use async_trait::async_trait;
use sqlx::PgPool;

use super::{FOREIGN_KEY_VIOLATION, UNIQUE_VIOLATION, like_pattern, violated_constraint};
use crate::data::follow_repository::FollowRepository;
use crate::domain::error::DomainError;
use crate::domain::follow::Follow;

#[derive(Debug, Clone)]
pub(crate) struct PostgresFollowRepository {
    pool: PgPool,
}

impl PostgresFollowRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct FollowRow {
    user_id: i64,
    user_name: String,
    following_id: i64,
    following_name: String,
}

impl From<FollowRow> for Follow {
    fn from(row: FollowRow) -> Self {
        Self {
            user_id: row.user_id,
            user: row.user_name,
            following_id: row.following_id,
            following: row.following_name,
        }
    }
}

#[async_trait]
impl FollowRepository for PostgresFollowRepository {
    async fn create_follow(&self, user_id: i64, following_id: i64) -> Result<Follow, DomainError> {
        let row = sqlx::query_as::<_, FollowRow>(
            r#"
            WITH f AS (
                INSERT INTO follows (user_id, following_id)
                VALUES ($1, $2)
                RETURNING user_id, following_id
            )
            SELECT
                f.user_id,
                u.username AS user_name,
                f.following_id,
                t.username AS following_name
            FROM f
            JOIN users u ON u.id = f.user_id
            JOIN users t ON t.id = f.following_id
            "#,
        )
        .bind(user_id)
        .bind(following_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_follow_db_error)?;

        Ok(row.into())
    }

    async fn list_follows(
        &self,
        user_id: i64,
        search: Option<&str>,
    ) -> Result<Vec<Follow>, DomainError> {
        let rows = sqlx::query_as::<_, FollowRow>(
            r#"
            SELECT
                f.user_id,
                u.username AS user_name,
                f.following_id,
                t.username AS following_name
            FROM follows f
            JOIN users u ON u.id = f.user_id
            JOIN users t ON t.id = f.following_id
            WHERE f.user_id = $1
              AND ($2::TEXT IS NULL OR t.username ILIKE $2)
            ORDER BY f.id ASC
            "#,
        )
        .bind(user_id)
        .bind(search.and_then(like_pattern))
        .fetch_all(&self.pool)
        .await
        .map_err(map_follow_db_error)?;

        Ok(rows.into_iter().map(Follow::from).collect())
    }
}

fn map_follow_db_error(err: sqlx::Error) -> DomainError {
    if violated_constraint(&err, UNIQUE_VIOLATION).is_some() {
        return DomainError::AlreadyExists("follow".to_string());
    }
    match violated_constraint(&err, FOREIGN_KEY_VIOLATION) {
        Some(constraint) => foreign_key_error(&constraint, err),
        None => DomainError::Unexpected(err.to_string()),
    }
}

fn foreign_key_error(constraint: &str, err: sqlx::Error) -> DomainError {
    match constraint {
        "follows_user_id_fkey" => DomainError::Unauthenticated,
        "follows_following_id_fkey" => DomainError::Validation {
            field: "following",
            message: "user does not exist",
        },
        _ => DomainError::Unexpected(err.to_string()),
    }
}
