use sqlx::PgPool;
use std::sync::Arc;

use crate::application::auth_service::AuthService;
use crate::application::comment_service::CommentService;
use crate::application::follow_service::FollowService;
use crate::application::group_service::GroupService;
use crate::application::post_service::PostService;
use crate::data::repositories::postgres::comment_repository::PostgresCommentRepository;
use crate::data::repositories::postgres::follow_repository::PostgresFollowRepository;
use crate::data::repositories::postgres::group_repository::PostgresGroupRepository;
use crate::data::repositories::postgres::post_repository::PostgresPostRepository;
use crate::data::repositories::postgres::user_repository::PostgresUserRepository;
use crate::infrastructure::jwt::JwtService;
use crate::infrastructure::media::LocalMediaStorage;
use crate::infrastructure::settings::Settings;

pub(crate) mod http;

pub(crate) type AppPostService = PostService<PostgresPostRepository, LocalMediaStorage>;
pub(crate) type AppCommentService = CommentService<PostgresCommentRepository, PostgresPostRepository>;
pub(crate) type AppFollowService = FollowService<PostgresFollowRepository, PostgresUserRepository>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) auth_service: Arc<AuthService<PostgresUserRepository>>,
    pub(crate) post_service: Arc<AppPostService>,
    pub(crate) comment_service: Arc<AppCommentService>,
    pub(crate) group_service: Arc<GroupService<PostgresGroupRepository>>,
    pub(crate) follow_service: Arc<AppFollowService>,
    pub(crate) jwt: Arc<JwtService>,
    pub(crate) media: Arc<LocalMediaStorage>,
    pub(crate) media_url: Arc<str>,
}

impl AppState {
    pub(crate) fn new(pool: PgPool, settings: &Settings) -> Self {
        let users = PostgresUserRepository::new(pool.clone());
        let posts = PostgresPostRepository::new(pool.clone());
        let media = LocalMediaStorage::new(&settings.media_root);

        Self {
            auth_service: Arc::new(AuthService::new(
                users.clone(),
                JwtService::new(&settings.jwt_secret, settings.jwt_ttl_seconds),
            )),
            post_service: Arc::new(PostService::new(posts.clone(), media.clone())),
            comment_service: Arc::new(CommentService::new(
                PostgresCommentRepository::new(pool.clone()),
                posts,
            )),
            group_service: Arc::new(GroupService::new(PostgresGroupRepository::new(
                pool.clone(),
            ))),
            follow_service: Arc::new(FollowService::new(
                PostgresFollowRepository::new(pool),
                users,
            )),
            jwt: Arc::new(JwtService::new(
                &settings.jwt_secret,
                settings.jwt_ttl_seconds,
            )),
            media: Arc::new(media),
            media_url: Arc::from(settings.media_url.as_str()),
        }
    }
}
