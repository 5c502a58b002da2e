use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::group::Group;
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::middleware::auth::AuthenticatedUser;

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct GroupDto {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) slug: String,
    pub(crate) description: String,
}

impl From<Group> for GroupDto {
    fn from(group: Group) -> Self {
        Self {
            id: group.id,
            title: group.title,
            slug: group.slug,
            description: group.description,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/groups/",
    tag = "groups",
    responses(
        (status = 200, description = "Groups listed", body = Vec<GroupDto>),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_groups(
    State(state): State<AppState>,
    user: Option<AuthenticatedUser>,
) -> AppResult<Json<Vec<GroupDto>>> {
    let groups = state.group_service.list_groups(user.into()).await?;
    Ok(Json(groups.into_iter().map(GroupDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/groups/{id}/",
    tag = "groups",
    params(
        ("id" = i64, Path, description = "Group id")
    ),
    responses(
        (status = 200, description = "Group found", body = GroupDto),
        (status = 404, description = "Group not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_group(
    State(state): State<AppState>,
    user: Option<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<GroupDto>> {
    let group = state.group_service.get_group(user.into(), id).await?;
    Ok(Json(group.into()))
}
