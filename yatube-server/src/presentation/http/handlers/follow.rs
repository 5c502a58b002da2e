use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::follow::{CreateFollowRequest, Follow};
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct CreateFollowDto {
    /// Username of the author to follow.
    #[validate(length(min = 1, max = 64))]
    pub(crate) following: String,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct FollowListQuery {
    /// Case-insensitive substring of the followed username.
    pub(crate) search: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct FollowDto {
    pub(crate) user: String,
    pub(crate) following: String,
}

impl From<Follow> for FollowDto {
    fn from(follow: Follow) -> Self {
        Self {
            user: follow.user,
            following: follow.following,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/follow/",
    tag = "follow",
    security(
        ("bearer_auth" = [])
    ),
    params(FollowListQuery),
    responses(
        (status = 200, description = "Subscriptions of the current user", body = Vec<FollowDto>),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_follows(
    State(state): State<AppState>,
    user: Option<AuthenticatedUser>,
    query: Result<Query<FollowListQuery>, QueryRejection>,
) -> AppResult<Json<Vec<FollowDto>>> {
    let Query(query) = query?;
    let follows = state
        .follow_service
        .list_follows(user.into(), query.search.as_deref())
        .await?;
    Ok(Json(follows.into_iter().map(FollowDto::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/v1/follow/",
    tag = "follow",
    security(
        ("bearer_auth" = [])
    ),
    request_body = CreateFollowDto,
    responses(
        (status = 201, description = "Subscribed", body = FollowDto),
        (status = 400, description = "Unknown user, self-follow or duplicate subscription"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn create_follow(
    State(state): State<AppState>,
    user: Option<AuthenticatedUser>,
    payload: Result<Json<CreateFollowDto>, JsonRejection>,
) -> AppResult<(StatusCode, Json<FollowDto>)> {
    let grant = state.follow_service.authorize_create(user.into())?;

    let Json(dto) = payload?;
    dto.validate()?;

    let follow = state
        .follow_service
        .create_follow(
            grant,
            CreateFollowRequest {
                following: dto.following,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(follow.into())))
}
