use axum::{Router, routing::post};

use super::route_with_slash;
use crate::presentation::AppState;
use crate::presentation::http::handlers::auth::{login, register};

pub(crate) fn router() -> Router<AppState> {
    let router = route_with_slash(Router::new(), "/register", post(register));
    route_with_slash(router, "/login", post(login))
}
