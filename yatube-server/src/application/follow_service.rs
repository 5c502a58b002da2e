use tracing::info;

use super::Granted;
use crate::data::follow_repository::FollowRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::follow::{CreateFollowRequest, Follow};
use crate::domain::permission::{Action, Actor, PermissionTable};

pub(crate) struct FollowService<F: FollowRepository, U: UserRepository> {
    follows: F,
    users: U,
}

impl<F: FollowRepository, U: UserRepository> FollowService<F, U> {
    const PERMISSIONS: PermissionTable = PermissionTable::FOLLOWS;

    pub(crate) fn new(follows: F, users: U) -> Self {
        Self { follows, users }
    }

    /// Only the requester's own subscriptions are ever returned. `search`
    /// matches the followed username case-insensitively.
    pub(crate) async fn list_follows(
        &self,
        actor: Actor,
        search: Option<&str>,
    ) -> Result<Vec<Follow>, DomainError> {
        Self::PERMISSIONS.authorize(Action::List, actor)?;
        let user_id = actor.require_user()?;
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        self.follows.list_follows(user_id, search).await
    }

    pub(crate) fn authorize_create(&self, actor: Actor) -> Result<Granted<()>, DomainError> {
        Self::PERMISSIONS.authorize(Action::Create, actor)?;
        Ok(Granted::new(actor.require_user()?, ()))
    }

    pub(crate) async fn create_follow(
        &self,
        grant: Granted<()>,
        req: CreateFollowRequest,
    ) -> Result<Follow, DomainError> {
        let user_id = grant.actor_id;
        let req = req.validate()?;

        let target = self
            .users
            .find_by_username(&req.following)
            .await?
            .ok_or(DomainError::Validation {
                field: "following",
                message: "user does not exist",
            })?;

        if target.id == user_id {
            return Err(DomainError::Validation {
                field: "following",
                message: "cannot follow yourself",
            });
        }

        let follow = self.follows.create_follow(user_id, target.id).await?;
        info!(user_id, following_id = follow.following_id, "follow created");
        Ok(follow)
    }
}
