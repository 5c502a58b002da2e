use tracing::info;

use super::{Granted, Page};
use crate::data::Pagination;
use crate::data::media_store::MediaStore;
use crate::data::post_repository::{NewPost, PostFilter, PostPatch, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::permission::{Action, Actor, PermissionTable};
use crate::domain::post::{CreatePostRequest, Post, UpdatePostRequest};

pub(crate) struct PostService<R: PostRepository, M: MediaStore> {
    repo: R,
    media: M,
}

impl<R: PostRepository, M: MediaStore> PostService<R, M> {
    const PERMISSIONS: PermissionTable = PermissionTable::POSTS;

    pub(crate) fn new(repo: R, media: M) -> Self {
        Self { repo, media }
    }

    pub(crate) async fn list_posts(
        &self,
        actor: Actor,
        filter: PostFilter,
        pagination: Option<Pagination>,
    ) -> Result<Page<Post>, DomainError> {
        Self::PERMISSIONS.authorize(Action::List, actor)?;

        let posts = self.repo.list_posts(&filter, pagination).await?;
        let total = match pagination {
            Some(_) => self.repo.count_posts(&filter).await?,
            None => posts.len() as i64,
        };

        Ok(Page {
            items: posts,
            total,
            pagination,
        })
    }

    pub(crate) async fn get_post(&self, actor: Actor, id: i64) -> Result<Post, DomainError> {
        Self::PERMISSIONS.authorize(Action::Retrieve, actor)?;
        let post = self.find_post(id).await?;
        Self::PERMISSIONS.authorize_object(Action::Retrieve, actor, &post)?;
        Ok(post)
    }

    pub(crate) fn authorize_create(&self, actor: Actor) -> Result<Granted<()>, DomainError> {
        Self::PERMISSIONS.authorize(Action::Create, actor)?;
        Ok(Granted::new(actor.require_user()?, ()))
    }

    pub(crate) async fn create_post(
        &self,
        grant: Granted<()>,
        req: CreatePostRequest,
    ) -> Result<Post, DomainError> {
        let author_id = grant.actor_id;
        let req = req.validate()?;

        let image = match req.image {
            Some(upload) => Some(self.media.save_image(upload).await?),
            None => None,
        };

        let new_post = NewPost {
            text: req.text,
            author_id,
            group_id: req.group_id,
            image: image.clone(),
        };
        let result = self.repo.create_post(new_post).await;
        let post = self.discard_on_error(image.as_deref(), result).await?;

        info!(post_id = post.id, author_id, "post created");
        Ok(post)
    }

    /// Loads the post and checks that the actor may edit it.
    pub(crate) async fn authorize_update(
        &self,
        actor: Actor,
        post_id: i64,
    ) -> Result<Granted<Post>, DomainError> {
        Self::PERMISSIONS.authorize(Action::Update, actor)?;
        let original = self.find_post(post_id).await?;
        Self::PERMISSIONS.authorize_object(Action::Update, actor, &original)?;
        Ok(Granted::new(actor.require_user()?, original))
    }

    pub(crate) async fn update_post(
        &self,
        grant: Granted<Post>,
        req: UpdatePostRequest,
    ) -> Result<Post, DomainError> {
        let original = grant.target;
        let req = req.validate()?;

        let image = match req.image {
            Some(Some(upload)) => Some(Some(self.media.save_image(upload).await?)),
            Some(None) => Some(None),
            None => None,
        };
        let stored_image = image.clone().flatten();
        let replaces_image = image.is_some();

        let patch = PostPatch {
            text: req.text,
            group_id: req.group_id,
            image,
        };
        let result = self
            .repo
            .update_post(original.id, patch)
            .await
            .and_then(|post| {
                post.ok_or_else(|| DomainError::NotFound(format!("post id: {}", original.id)))
            });
        let post = self.discard_on_error(stored_image.as_deref(), result).await?;

        if let Some(old) = original.image.as_deref().filter(|_| replaces_image) {
            self.media.discard(old).await;
        }
        Ok(post)
    }

    pub(crate) async fn delete_post(&self, actor: Actor, post_id: i64) -> Result<(), DomainError> {
        Self::PERMISSIONS.authorize(Action::Delete, actor)?;
        let original = self.find_post(post_id).await?;
        Self::PERMISSIONS.authorize_object(Action::Delete, actor, &original)?;

        let deleted = self.repo.delete_post(post_id).await?;
        if !deleted {
            return Err(DomainError::NotFound(format!("post id: {post_id}")));
        }
        if let Some(image) = original.image.as_deref() {
            self.media.discard(image).await;
        }

        info!(post_id, "post deleted");
        Ok(())
    }

    async fn find_post(&self, id: i64) -> Result<Post, DomainError> {
        self.repo
            .get_post(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("post id: {id}")))
    }

    async fn discard_on_error<T>(
        &self,
        image: Option<&str>,
        result: Result<T, DomainError>,
    ) -> Result<T, DomainError> {
        if result.is_err()
            && let Some(path) = image
        {
            self.media.discard(path).await;
        }
        result
    }
}
