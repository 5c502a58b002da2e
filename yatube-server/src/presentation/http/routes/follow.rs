use axum::{Router, routing::get};

use super::route_with_slash;
use crate::presentation::AppState;
use crate::presentation::http::handlers::follow::{create_follow, list_follows};

pub(crate) fn router() -> Router<AppState> {
    route_with_slash(Router::new(), "/follow", get(list_follows).post(create_follow))
}
