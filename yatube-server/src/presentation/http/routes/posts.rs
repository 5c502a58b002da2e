use axum::{Router, routing::get};

use super::route_with_slash;
use crate::presentation::AppState;
use crate::presentation::http::handlers::comments::{
    create_comment, delete_comment, get_comment, list_comments, patch_comment, put_comment,
};
use crate::presentation::http::handlers::posts::{
    create_post, delete_post, get_post, list_posts, patch_post, put_post,
};

pub(crate) fn router() -> Router<AppState> {
    let router = route_with_slash(Router::new(), "/posts", get(list_posts).post(create_post));
    let router = route_with_slash(
        router,
        "/posts/{post_id}",
        get(get_post)
            .put(put_post)
            .patch(patch_post)
            .delete(delete_post),
    );
    let router = route_with_slash(
        router,
        "/posts/{post_id}/comments",
        get(list_comments).post(create_comment),
    );
    route_with_slash(
        router,
        "/posts/{post_id}/comments/{id}",
        get(get_comment)
            .put(put_comment)
            .patch(patch_comment)
            .delete(delete_comment),
    )
}
