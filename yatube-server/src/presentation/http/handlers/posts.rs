use axum::{
    Json,
    extract::{Path, Query, State},
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::double_option;
use crate::data::Pagination;
use crate::data::post_repository::{PostFilter, PostOrdering};
use crate::domain::image::ImageUpload;
use crate::domain::post::{CreatePostRequest, Post, UpdatePostRequest};
use crate::infrastructure::media::media_url;
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::middleware::auth::AuthenticatedUser;
use crate::presentation::http::pagination::{Listing, PaginationQuery};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct CreatePostDto {
    #[validate(length(min = 1))]
    pub(crate) text: String,
    /// Group id.
    pub(crate) group: Option<i64>,
    /// Base64 data URI, e.g. `data:image/png;base64,...`.
    pub(crate) image: Option<String>,
}

/// Full update. Omitted `group`/`image` keep their values, `null` clears them.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct PutPostDto {
    #[validate(length(min = 1))]
    pub(crate) text: String,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i64>)]
    pub(crate) group: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub(crate) image: Option<Option<String>>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub(crate) struct PatchPostDto {
    #[validate(length(min = 1))]
    pub(crate) text: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i64>)]
    pub(crate) group: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub(crate) image: Option<Option<String>>,
}

#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct PostListQuery {
    /// Only posts of this group.
    pub(crate) group: Option<i64>,
    /// Case-insensitive substring of the post text.
    pub(crate) search: Option<String>,
    /// One of `author`, `-author`, `username`, `-username`.
    pub(crate) ordering: Option<String>,
    #[validate(range(min = 1, max = 100))]
    pub(crate) limit: Option<u32>,
    pub(crate) offset: Option<u32>,
}

impl PostListQuery {
    fn into_parts(self) -> (PostFilter, Option<Pagination>) {
        let pagination = PaginationQuery {
            limit: self.limit,
            offset: self.offset,
        }
        .pagination();
        let filter = PostFilter {
            group_id: self.group,
            search: self.search,
            ordering: self
                .ordering
                .as_deref()
                .map(PostOrdering::parse)
                .unwrap_or_default(),
        };
        (filter, pagination)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostDto {
    pub(crate) id: i64,
    pub(crate) text: String,
    pub(crate) pub_date: DateTime<Utc>,
    /// Author username.
    pub(crate) author: String,
    pub(crate) group: Option<i64>,
    /// Public image URL.
    pub(crate) image: Option<String>,
}

impl PostDto {
    pub(crate) fn from_post(post: Post, base_media_url: &str) -> Self {
        Self {
            id: post.id,
            text: post.text,
            pub_date: post.pub_date,
            author: post.author,
            group: post.group_id,
            image: post.image.map(|path| media_url(base_media_url, &path)),
        }
    }
}

fn decode_image(raw: Option<String>) -> AppResult<Option<ImageUpload>> {
    Ok(raw
        .as_deref()
        .map(ImageUpload::from_data_uri)
        .transpose()?)
}

fn decode_image_change(raw: Option<Option<String>>) -> AppResult<Option<Option<ImageUpload>>> {
    match raw {
        Some(value) => Ok(Some(decode_image(value)?)),
        None => Ok(None),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/posts/",
    tag = "posts",
    params(PostListQuery),
    responses(
        (status = 200, description = "Posts listed; an envelope {count, limit, offset, results} when `limit` is set", body = Vec<PostDto>),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_posts(
    State(state): State<AppState>,
    user: Option<AuthenticatedUser>,
    query: Result<Query<PostListQuery>, QueryRejection>,
) -> AppResult<Listing<PostDto>> {
    let Query(query) = query?;
    query.validate()?;
    let (filter, pagination) = query.into_parts();

    let page = state
        .post_service
        .list_posts(user.into(), filter, pagination)
        .await?;

    Ok(Listing::from_page(page, |post| {
        PostDto::from_post(post, &state.media_url)
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}/",
    tag = "posts",
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Post found", body = PostDto),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_post(
    State(state): State<AppState>,
    user: Option<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<PostDto>> {
    let post = state.post_service.get_post(user.into(), id).await?;
    Ok(Json(PostDto::from_post(post, &state.media_url)))
}

#[utoipa::path(
    post,
    path = "/api/v1/posts/",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    request_body = CreatePostDto,
    responses(
        (status = 201, description = "Post created", body = PostDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn create_post(
    State(state): State<AppState>,
    user: Option<AuthenticatedUser>,
    payload: Result<Json<CreatePostDto>, JsonRejection>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    let grant = state.post_service.authorize_create(user.into())?;

    let Json(dto) = payload?;
    dto.validate()?;
    let req = CreatePostRequest {
        text: dto.text,
        group_id: dto.group,
        image: decode_image(dto.image)?,
    };

    let post = state.post_service.create_post(grant, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(PostDto::from_post(post, &state.media_url)),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/posts/{id}/",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    request_body = PutPostDto,
    responses(
        (status = 200, description = "Post updated", body = PostDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn put_post(
    State(state): State<AppState>,
    user: Option<AuthenticatedUser>,
    Path(id): Path<i64>,
    payload: Result<Json<PutPostDto>, JsonRejection>,
) -> AppResult<Json<PostDto>> {
    let grant = state.post_service.authorize_update(user.into(), id).await?;

    let Json(dto) = payload?;
    dto.validate()?;
    let req = UpdatePostRequest {
        text: Some(dto.text),
        group_id: dto.group,
        image: decode_image_change(dto.image)?,
    };

    let post = state.post_service.update_post(grant, req).await?;
    Ok(Json(PostDto::from_post(post, &state.media_url)))
}

#[utoipa::path(
    patch,
    path = "/api/v1/posts/{id}/",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    request_body = PatchPostDto,
    responses(
        (status = 200, description = "Post updated", body = PostDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn patch_post(
    State(state): State<AppState>,
    user: Option<AuthenticatedUser>,
    Path(id): Path<i64>,
    payload: Result<Json<PatchPostDto>, JsonRejection>,
) -> AppResult<Json<PostDto>> {
    let grant = state.post_service.authorize_update(user.into(), id).await?;

    let Json(dto) = payload?;
    dto.validate()?;
    let req = UpdatePostRequest {
        text: dto.text,
        group_id: dto.group,
        image: decode_image_change(dto.image)?,
    };

    let post = state.post_service.update_post(grant, req).await?;
    Ok(Json(PostDto::from_post(post, &state.media_url)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/posts/{id}/",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 204, description = "Post and its comments deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn delete_post(
    State(state): State<AppState>,
    user: Option<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.post_service.delete_post(user.into(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
