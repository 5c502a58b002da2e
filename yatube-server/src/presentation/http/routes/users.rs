use axum::{Router, routing::get};

use super::route_with_slash;
use crate::presentation::AppState;
use crate::presentation::http::handlers::users::{delete_me, get_me};

pub(crate) fn router() -> Router<AppState> {
    route_with_slash(Router::new(), "/me", get(get_me).delete(delete_me))
}
