use axum::{
    Json,
    extract::{Path, Query, State},
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::comment::{Comment, CreateCommentRequest, UpdateCommentRequest};
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::middleware::auth::AuthenticatedUser;
use crate::presentation::http::pagination::{Listing, PaginationQuery};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct CommentTextDto {
    #[validate(length(min = 1))]
    pub(crate) text: String,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub(crate) struct PatchCommentDto {
    #[validate(length(min = 1))]
    pub(crate) text: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CommentDto {
    pub(crate) id: i64,
    /// Author username.
    pub(crate) author: String,
    /// Parent post id.
    pub(crate) post: i64,
    pub(crate) text: String,
    pub(crate) created: DateTime<Utc>,
}

impl From<Comment> for CommentDto {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            author: comment.author,
            post: comment.post_id,
            text: comment.text,
            created: comment.created,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/posts/{post_id}/comments/",
    tag = "comments",
    params(
        ("post_id" = i64, Path, description = "Parent post id"),
        PaginationQuery
    ),
    responses(
        (status = 200, description = "Comments of the post; an envelope {count, limit, offset, results} when `limit` is set", body = Vec<CommentDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_comments(
    State(state): State<AppState>,
    user: Option<AuthenticatedUser>,
    Path(post_id): Path<i64>,
    query: Result<Query<PaginationQuery>, QueryRejection>,
) -> AppResult<Listing<CommentDto>> {
    let Query(query) = query?;
    query.validate()?;

    let page = state
        .comment_service
        .list_comments(user.into(), post_id, query.pagination())
        .await?;

    Ok(Listing::from_page(page, CommentDto::from))
}

#[utoipa::path(
    get,
    path = "/api/v1/posts/{post_id}/comments/{id}/",
    tag = "comments",
    params(
        ("post_id" = i64, Path, description = "Parent post id"),
        ("id" = i64, Path, description = "Comment id")
    ),
    responses(
        (status = 200, description = "Comment found", body = CommentDto),
        (status = 404, description = "Post or comment not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_comment(
    State(state): State<AppState>,
    user: Option<AuthenticatedUser>,
    Path((post_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<CommentDto>> {
    let comment = state
        .comment_service
        .get_comment(user.into(), post_id, id)
        .await?;
    Ok(Json(comment.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/posts/{post_id}/comments/",
    tag = "comments",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("post_id" = i64, Path, description = "Parent post id")
    ),
    request_body = CommentTextDto,
    responses(
        (status = 201, description = "Comment created", body = CommentDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn create_comment(
    State(state): State<AppState>,
    user: Option<AuthenticatedUser>,
    Path(post_id): Path<i64>,
    payload: Result<Json<CommentTextDto>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CommentDto>)> {
    let grant = state
        .comment_service
        .authorize_create(user.into(), post_id)
        .await?;

    let Json(dto) = payload?;
    dto.validate()?;

    let comment = state
        .comment_service
        .create_comment(grant, CreateCommentRequest { text: dto.text })
        .await?;
    Ok((StatusCode::CREATED, Json(comment.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/posts/{post_id}/comments/{id}/",
    tag = "comments",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("post_id" = i64, Path, description = "Parent post id"),
        ("id" = i64, Path, description = "Comment id")
    ),
    request_body = CommentTextDto,
    responses(
        (status = 200, description = "Comment updated", body = CommentDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Post or comment not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn put_comment(
    State(state): State<AppState>,
    user: Option<AuthenticatedUser>,
    Path((post_id, id)): Path<(i64, i64)>,
    payload: Result<Json<CommentTextDto>, JsonRejection>,
) -> AppResult<Json<CommentDto>> {
    let grant = state
        .comment_service
        .authorize_update(user.into(), post_id, id)
        .await?;

    let Json(dto) = payload?;
    dto.validate()?;

    let req = UpdateCommentRequest {
        text: Some(dto.text),
    };
    let comment = state.comment_service.update_comment(grant, req).await?;
    Ok(Json(comment.into()))
}

#[utoipa::path(
    patch,
    path = "/api/v1/posts/{post_id}/comments/{id}/",
    tag = "comments",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("post_id" = i64, Path, description = "Parent post id"),
        ("id" = i64, Path, description = "Comment id")
    ),
    request_body = PatchCommentDto,
    responses(
        (status = 200, description = "Comment updated", body = CommentDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Post or comment not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn patch_comment(
    State(state): State<AppState>,
    user: Option<AuthenticatedUser>,
    Path((post_id, id)): Path<(i64, i64)>,
    payload: Result<Json<PatchCommentDto>, JsonRejection>,
) -> AppResult<Json<CommentDto>> {
    let grant = state
        .comment_service
        .authorize_update(user.into(), post_id, id)
        .await?;

    let Json(dto) = payload?;
    dto.validate()?;

    let req = UpdateCommentRequest { text: dto.text };
    let comment = state.comment_service.update_comment(grant, req).await?;
    Ok(Json(comment.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/posts/{post_id}/comments/{id}/",
    tag = "comments",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("post_id" = i64, Path, description = "Parent post id"),
        ("id" = i64, Path, description = "Comment id")
    ),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Post or comment not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn delete_comment(
    State(state): State<AppState>,
    user: Option<AuthenticatedUser>,
    Path((post_id, id)): Path<(i64, i64)>,
) -> AppResult<StatusCode> {
    state
        .comment_service
        .delete_comment(user.into(), post_id, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
