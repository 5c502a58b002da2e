use async_trait::async_trait;
use sqlx::PgPool;

use super::{UNIQUE_VIOLATION, violated_constraint};
use crate::data::group_repository::{GroupRepository, NewGroup};
use crate::domain::error::DomainError;
use crate::domain::group::Group;

#[derive(Debug, Clone)]
pub(crate) struct PostgresGroupRepository {
    pool: PgPool,
}

impl PostgresGroupRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct GroupRow {
    id: i64,
    title: String,
    slug: String,
    description: String,
}

impl From<GroupRow> for Group {
    fn from(row: GroupRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            slug: row.slug,
            description: row.description,
        }
    }
}

#[async_trait]
impl GroupRepository for PostgresGroupRepository {
    async fn create_group(&self, input: NewGroup) -> Result<Group, DomainError> {
        let row = sqlx::query_as::<_, GroupRow>(
            r#"
            INSERT INTO groups (title, slug, description)
            VALUES ($1, $2, $3)
            RETURNING id, title, slug, description
            "#,
        )
        .bind(&input.title)
        .bind(&input.slug)
        .bind(&input.description)
        .fetch_one(&self.pool)
        .await
        .map_err(map_group_db_error)?;

        Ok(row.into())
    }

    async fn get_group(&self, id: i64) -> Result<Option<Group>, DomainError> {
        let row = sqlx::query_as::<_, GroupRow>(
            r#"
            SELECT id, title, slug, description
            FROM groups
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_group_db_error)?;

        Ok(row.map(Group::from))
    }

    async fn list_groups(&self) -> Result<Vec<Group>, DomainError> {
        let rows = sqlx::query_as::<_, GroupRow>(
            r#"
            SELECT id, title, slug, description
            FROM groups
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_group_db_error)?;

        Ok(rows.into_iter().map(Group::from).collect())
    }

    async fn delete_group(&self, slug: &str) -> Result<bool, DomainError> {
        // posts.group_id is reset by ON DELETE SET NULL
        let result = sqlx::query("DELETE FROM groups WHERE slug = $1")
            .bind(slug)
            .execute(&self.pool)
            .await
            .map_err(map_group_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}

fn map_group_db_error(err: sqlx::Error) -> DomainError {
    if violated_constraint(&err, UNIQUE_VIOLATION).is_some() {
        return DomainError::AlreadyExists("group slug".to_string());
    }
    DomainError::Unexpected(err.to_string())
}
