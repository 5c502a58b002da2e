use tracing::info;

use super::{Granted, Page};
use crate::data::Pagination;
use crate::data::comment_repository::{CommentRepository, NewComment};
use crate::data::post_repository::PostRepository;
use crate::domain::comment::{Comment, CreateCommentRequest, UpdateCommentRequest};
use crate::domain::error::DomainError;
use crate::domain::permission::{Action, Actor, PermissionTable};
use crate::domain::post::Post;

/// Comments always live under a parent post taken from the route; every
/// operation resolves that post first and fails with `NotFound` without it.
pub(crate) struct CommentService<C: CommentRepository, P: PostRepository> {
    comments: C,
    posts: P,
}

impl<C: CommentRepository, P: PostRepository> CommentService<C, P> {
    const PERMISSIONS: PermissionTable = PermissionTable::COMMENTS;

    pub(crate) fn new(comments: C, posts: P) -> Self {
        Self { comments, posts }
    }

    pub(crate) async fn list_comments(
        &self,
        actor: Actor,
        post_id: i64,
        pagination: Option<Pagination>,
    ) -> Result<Page<Comment>, DomainError> {
        Self::PERMISSIONS.authorize(Action::List, actor)?;
        let post = self.resolve_post(post_id).await?;

        let comments = self.comments.list_comments(post.id, pagination).await?;
        let total = match pagination {
            Some(_) => self.comments.count_comments(post.id).await?,
            None => comments.len() as i64,
        };

        Ok(Page {
            items: comments,
            total,
            pagination,
        })
    }

    pub(crate) async fn get_comment(
        &self,
        actor: Actor,
        post_id: i64,
        comment_id: i64,
    ) -> Result<Comment, DomainError> {
        Self::PERMISSIONS.authorize(Action::Retrieve, actor)?;
        let post = self.resolve_post(post_id).await?;
        let comment = self.find_comment(&post, comment_id).await?;
        Self::PERMISSIONS.authorize_object(Action::Retrieve, actor, &comment)?;
        Ok(comment)
    }

    /// Resolves the parent post on behalf of an authenticated author.
    pub(crate) async fn authorize_create(
        &self,
        actor: Actor,
        post_id: i64,
    ) -> Result<Granted<Post>, DomainError> {
        Self::PERMISSIONS.authorize(Action::Create, actor)?;
        let author_id = actor.require_user()?;
        let post = self.resolve_post(post_id).await?;
        Ok(Granted::new(author_id, post))
    }

    pub(crate) async fn create_comment(
        &self,
        grant: Granted<Post>,
        req: CreateCommentRequest,
    ) -> Result<Comment, DomainError> {
        let author_id = grant.actor_id;
        let post_id = grant.target.id;
        let req = req.validate()?;

        let comment = self
            .comments
            .create_comment(NewComment {
                post_id,
                author_id,
                text: req.text,
            })
            .await?;

        info!(comment_id = comment.id, post_id, author_id, "comment created");
        Ok(comment)
    }

    pub(crate) async fn authorize_update(
        &self,
        actor: Actor,
        post_id: i64,
        comment_id: i64,
    ) -> Result<Granted<Comment>, DomainError> {
        Self::PERMISSIONS.authorize(Action::Update, actor)?;
        let post = self.resolve_post(post_id).await?;
        let original = self.find_comment(&post, comment_id).await?;
        Self::PERMISSIONS.authorize_object(Action::Update, actor, &original)?;
        Ok(Granted::new(actor.require_user()?, original))
    }

    pub(crate) async fn update_comment(
        &self,
        grant: Granted<Comment>,
        req: UpdateCommentRequest,
    ) -> Result<Comment, DomainError> {
        let comment_id = grant.target.id;
        let req = req.validate()?;

        self.comments
            .update_comment(comment_id, req.text)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("comment id: {comment_id}")))
    }

    pub(crate) async fn delete_comment(
        &self,
        actor: Actor,
        post_id: i64,
        comment_id: i64,
    ) -> Result<(), DomainError> {
        Self::PERMISSIONS.authorize(Action::Delete, actor)?;
        let post = self.resolve_post(post_id).await?;
        let original = self.find_comment(&post, comment_id).await?;
        Self::PERMISSIONS.authorize_object(Action::Delete, actor, &original)?;

        if !self.comments.delete_comment(original.id).await? {
            return Err(DomainError::NotFound(format!("comment id: {comment_id}")));
        }

        info!(comment_id, post_id, "comment deleted");
        Ok(())
    }

    async fn resolve_post(&self, post_id: i64) -> Result<Post, DomainError> {
        self.posts
            .get_post(post_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("post id: {post_id}")))
    }

    async fn find_comment(&self, post: &Post, comment_id: i64) -> Result<Comment, DomainError> {
        self.comments
            .get_comment(post.id, comment_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("comment id: {comment_id}")))
    }
}
