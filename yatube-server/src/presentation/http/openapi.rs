use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::presentation::http::handlers::auth::{AuthResponseDto, LoginDto, RegisterDto};
use crate::presentation::http::handlers::comments::{CommentDto, CommentTextDto, PatchCommentDto};
use crate::presentation::http::handlers::follow::{CreateFollowDto, FollowDto};
use crate::presentation::http::handlers::groups::GroupDto;
use crate::presentation::http::handlers::posts::{CreatePostDto, PatchPostDto, PostDto, PutPostDto};
use crate::presentation::http::handlers::users::UserDto;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::http::handlers::auth::register,
        crate::presentation::http::handlers::auth::login,
        crate::presentation::http::handlers::users::get_me,
        crate::presentation::http::handlers::users::delete_me,
        crate::presentation::http::handlers::posts::list_posts,
        crate::presentation::http::handlers::posts::get_post,
        crate::presentation::http::handlers::posts::create_post,
        crate::presentation::http::handlers::posts::put_post,
        crate::presentation::http::handlers::posts::patch_post,
        crate::presentation::http::handlers::posts::delete_post,
        crate::presentation::http::handlers::comments::list_comments,
        crate::presentation::http::handlers::comments::get_comment,
        crate::presentation::http::handlers::comments::create_comment,
        crate::presentation::http::handlers::comments::put_comment,
        crate::presentation::http::handlers::comments::patch_comment,
        crate::presentation::http::handlers::comments::delete_comment,
        crate::presentation::http::handlers::groups::list_groups,
        crate::presentation::http::handlers::groups::get_group,
        crate::presentation::http::handlers::follow::list_follows,
        crate::presentation::http::handlers::follow::create_follow
    ),
    components(
        schemas(
            RegisterDto,
            LoginDto,
            AuthResponseDto,
            UserDto,
            CreatePostDto,
            PutPostDto,
            PatchPostDto,
            PostDto,
            CommentTextDto,
            PatchCommentDto,
            CommentDto,
            GroupDto,
            CreateFollowDto,
            FollowDto
        )
    ),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "users", description = "Current account"),
        (name = "posts", description = "Posts"),
        (name = "comments", description = "Comments under a post"),
        (name = "groups", description = "Read-only communities"),
        (name = "follow", description = "Subscriptions of the current user")
    ),
    modifiers(&SecurityAddon)
)]
pub(crate) struct ApiDoc;

pub(crate) struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let mut components = openapi.components.take().unwrap_or_default();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        openapi.components = Some(components);
    }
}

#[cfg(test)]
mod tests {
    use utoipa::OpenApi;

    use super::ApiDoc;

    #[test]
    fn openapi_documents_every_resource() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/auth/register",
            "/api/v1/users/me",
            "/api/v1/posts/",
            "/api/v1/posts/{id}/",
            "/api/v1/posts/{post_id}/comments/{id}/",
            "/api/v1/groups/",
            "/api/v1/follow/",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
        let components = doc.components.expect("components must be present");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
