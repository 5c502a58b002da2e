use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::auth_service::AuthResult;
use crate::domain::user::{Credentials, Registration};
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::handlers::users::UserDto;

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct RegisterDto {
    #[schema(min_length = 3, max_length = 64)]
    username: String,
    email: String,
    #[schema(min_length = 8, max_length = 128)]
    password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct LoginDto {
    username: String,
    password: String,
}

/// Body of both register and login; the client keeps `access_token` as its bearer.
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct AuthResponseDto {
    access_token: String,
    user: UserDto,
}

impl From<AuthResult> for AuthResponseDto {
    fn from(result: AuthResult) -> Self {
        Self {
            access_token: result.access_token,
            user: result.user.into(),
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "auth",
    request_body = RegisterDto,
    responses(
        (status = 201, description = "Registered successfully", body = AuthResponseDto),
        (status = 400, description = "Validation error or user already exists"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterDto>, JsonRejection>,
) -> AppResult<(StatusCode, Json<AuthResponseDto>)> {
    let Json(dto) = payload?;
    let registration = Registration::parse(&dto.username, &dto.email, dto.password)?;

    let result = state.auth_service.register(registration).await?;
    Ok((StatusCode::CREATED, Json(result.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginDto,
    responses(
        (status = 200, description = "Login successful", body = AuthResponseDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginDto>, JsonRejection>,
) -> AppResult<Json<AuthResponseDto>> {
    let Json(dto) = payload?;
    let credentials = Credentials::parse(&dto.username, dto.password)?;

    let result = state.auth_service.login(credentials).await?;
    Ok(Json(result.into()))
}
