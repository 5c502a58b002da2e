use axum::{Router, routing::get};

use super::route_with_slash;
use crate::presentation::AppState;
use crate::presentation::http::handlers::groups::{get_group, list_groups};

pub(crate) fn router() -> Router<AppState> {
    let router = route_with_slash(Router::new(), "/groups", get(list_groups));
    route_with_slash(router, "/groups/{id}", get(get_group))
}
