use axum::{Json, Router, middleware, routing::MethodRouter, routing::get};
use serde::Serialize;

use crate::presentation::AppState;
use crate::presentation::http::middleware::auth::jwt_auth_middleware;

pub(crate) mod auth;
pub(crate) mod follow;
pub(crate) mod groups;
pub(crate) mod posts;
pub(crate) mod users;

pub(crate) const API_PREFIX: &str = "/api/v1";

pub(crate) fn router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .merge(posts::router())
        .merge(groups::router())
        .merge(follow::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_middleware,
        ));

    Router::new()
        .route("/healthz", get(health_handler))
        .nest(API_PREFIX, api)
        .with_state(state)
}

/// Registers `path` both with and without a trailing slash.
pub(crate) fn route_with_slash(
    router: Router<AppState>,
    path: &str,
    method_router: MethodRouter<AppState>,
) -> Router<AppState> {
    let trimmed = path.trim_end_matches('/');
    router
        .route(trimmed, method_router.clone())
        .route(&format!("{trimmed}/"), method_router)
}

#[derive(Debug, Serialize)]
struct HealthzResponse {
    status: &'static str,
}

async fn health_handler() -> Json<HealthzResponse> {
    Json(HealthzResponse { status: "ok" })
}
