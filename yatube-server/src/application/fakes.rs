//! In-memory repositories for service tests, mirroring the schema's keys and cascades.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::data::Pagination;
use crate::data::comment_repository::{CommentRepository, NewComment};
use crate::data::follow_repository::FollowRepository;
use crate::data::group_repository::{GroupRepository, NewGroup};
use crate::data::media_store::MediaStore;
use crate::data::post_repository::{NewPost, PostFilter, PostOrdering, PostPatch, PostRepository};
use crate::data::user_repository::{LoginRecord, NewUser, UserRepository};
use crate::domain::comment::Comment;
use crate::domain::error::DomainError;
use crate::domain::follow::Follow;
use crate::domain::group::Group;
use crate::domain::image::ImageUpload;
use crate::domain::post::Post;
use crate::domain::user::User;

#[derive(Default)]
pub(crate) struct State {
    pub(crate) users: Vec<LoginRecord>,
    pub(crate) groups: Vec<Group>,
    pub(crate) posts: Vec<Post>,
    pub(crate) comments: Vec<Comment>,
    pub(crate) follows: Vec<Follow>,
    pub(crate) saved_media: Vec<String>,
    pub(crate) discarded_media: Vec<String>,
    pub(crate) repo_calls: usize,
    next_id: i64,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn username(&self, id: i64) -> Option<String> {
        self.users
            .iter()
            .find(|c| c.user.id == id)
            .map(|c| c.user.username.clone())
    }
}

#[derive(Clone, Default)]
pub(crate) struct InMemoryDb {
    state: Arc<Mutex<State>>,
}

impl InMemoryDb {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("in-memory db mutex poisoned")
    }

    fn touch(&self) -> MutexGuard<'_, State> {
        let mut state = self.state();
        state.repo_calls += 1;
        state
    }

    pub(crate) fn seed_user(&self, username: &str) -> i64 {
        let mut state = self.state();
        let id = state.next_id();
        let user = User::new(id, username, format!("{username}@example.com"), Utc::now())
            .expect("seed user must be valid");
        state.users.push(LoginRecord {
            user,
            password_hash: String::new(),
        });
        id
    }

    pub(crate) fn seed_group(&self, slug: &str) -> i64 {
        let mut state = self.state();
        let id = state.next_id();
        state.groups.push(Group {
            id,
            title: slug.to_uppercase(),
            slug: slug.to_string(),
            description: format!("about {slug}"),
        });
        id
    }

    pub(crate) fn seed_post(&self, author_id: i64, text: &str) -> Post {
        let mut state = self.state();
        let id = state.next_id();
        let author = state.username(author_id).expect("seed author must exist");
        let post = Post::new(id, text, Utc::now(), author_id, author, None, None)
            .expect("seed post must be valid");
        state.posts.push(post.clone());
        post
    }

    pub(crate) fn seed_comment(&self, post_id: i64, author_id: i64, text: &str) -> Comment {
        let mut state = self.state();
        let id = state.next_id();
        let author = state.username(author_id).expect("seed author must exist");
        let comment = Comment::new(id, author_id, author, post_id, text, Utc::now())
            .expect("seed comment must be valid");
        state.comments.push(comment.clone());
        comment
    }

    pub(crate) fn post(&self, id: i64) -> Option<Post> {
        self.state().posts.iter().find(|p| p.id == id).cloned()
    }

    pub(crate) fn comment(&self, id: i64) -> Option<Comment> {
        self.state().comments.iter().find(|c| c.id == id).cloned()
    }

    pub(crate) fn repo_calls(&self) -> usize {
        self.state().repo_calls
    }
}

fn paginate<T>(items: Vec<T>, pagination: Option<Pagination>) -> Vec<T> {
    match pagination {
        Some(p) => items
            .into_iter()
            .skip(p.offset as usize)
            .take(p.limit as usize)
            .collect(),
        None => items,
    }
}

fn post_matches(post: &Post, filter: &PostFilter) -> bool {
    let group_ok = filter.group_id.is_none_or(|g| post.group_id == Some(g));
    let search_ok = filter
        .search
        .as_deref()
        .is_none_or(|s| post.text.to_lowercase().contains(&s.to_lowercase()));
    group_ok && search_ok
}

#[async_trait]
impl PostRepository for InMemoryDb {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let mut state = self.touch();
        if let Some(group_id) = input.group_id
            && !state.groups.iter().any(|g| g.id == group_id)
        {
            return Err(DomainError::Validation {
                field: "group",
                message: "group does not exist",
            });
        }
        let author = state
            .username(input.author_id)
            .ok_or(DomainError::Unauthenticated)?;
        let id = state.next_id();
        let post = Post::new(
            id,
            input.text,
            Utc::now(),
            input.author_id,
            author,
            input.group_id,
            input.image,
        )?;
        state.posts.push(post.clone());
        Ok(post)
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        Ok(self.touch().posts.iter().find(|p| p.id == id).cloned())
    }

    async fn update_post(&self, id: i64, patch: PostPatch) -> Result<Option<Post>, DomainError> {
        let mut state = self.touch();
        if let Some(Some(group_id)) = patch.group_id
            && !state.groups.iter().any(|g| g.id == group_id)
        {
            return Err(DomainError::Validation {
                field: "group",
                message: "group does not exist",
            });
        }
        let Some(post) = state.posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(text) = patch.text {
            post.text = text;
        }
        if let Some(group_id) = patch.group_id {
            post.group_id = group_id;
        }
        if let Some(image) = patch.image {
            post.image = image;
        }
        Ok(Some(post.clone()))
    }

    async fn delete_post(&self, id: i64) -> Result<bool, DomainError> {
        let mut state = self.touch();
        let before = state.posts.len();
        state.posts.retain(|p| p.id != id);
        state.comments.retain(|c| c.post_id != id);
        Ok(state.posts.len() < before)
    }

    async fn list_posts(
        &self,
        filter: &PostFilter,
        pagination: Option<Pagination>,
    ) -> Result<Vec<Post>, DomainError> {
        let state = self.touch();
        let mut posts: Vec<Post> = state
            .posts
            .iter()
            .filter(|p| post_matches(p, filter))
            .cloned()
            .collect();
        match filter.ordering {
            PostOrdering::Id => posts.sort_by_key(|p| p.id),
            PostOrdering::Author => posts.sort_by_key(|p| (p.author_id, p.id)),
            PostOrdering::AuthorDesc => posts.sort_by_key(|p| (-p.author_id, p.id)),
            PostOrdering::Username => posts.sort_by(|a, b| a.author.cmp(&b.author)),
            PostOrdering::UsernameDesc => posts.sort_by(|a, b| b.author.cmp(&a.author)),
        }
        Ok(paginate(posts, pagination))
    }

    async fn count_posts(&self, filter: &PostFilter) -> Result<i64, DomainError> {
        let state = self.touch();
        Ok(state.posts.iter().filter(|p| post_matches(p, filter)).count() as i64)
    }
}

#[async_trait]
impl CommentRepository for InMemoryDb {
    async fn create_comment(&self, input: NewComment) -> Result<Comment, DomainError> {
        let mut state = self.touch();
        if !state.posts.iter().any(|p| p.id == input.post_id) {
            return Err(DomainError::NotFound("post".to_string()));
        }
        let author = state
            .username(input.author_id)
            .ok_or(DomainError::Unauthenticated)?;
        let id = state.next_id();
        let comment = Comment::new(
            id,
            input.author_id,
            author,
            input.post_id,
            input.text,
            Utc::now(),
        )?;
        state.comments.push(comment.clone());
        Ok(comment)
    }

    async fn get_comment(&self, post_id: i64, id: i64) -> Result<Option<Comment>, DomainError> {
        Ok(self
            .touch()
            .comments
            .iter()
            .find(|c| c.id == id && c.post_id == post_id)
            .cloned())
    }

    async fn update_comment(
        &self,
        id: i64,
        text: Option<String>,
    ) -> Result<Option<Comment>, DomainError> {
        let mut state = self.touch();
        let Some(comment) = state.comments.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        if let Some(text) = text {
            comment.text = text;
        }
        Ok(Some(comment.clone()))
    }

    async fn delete_comment(&self, id: i64) -> Result<bool, DomainError> {
        let mut state = self.touch();
        let before = state.comments.len();
        state.comments.retain(|c| c.id != id);
        Ok(state.comments.len() < before)
    }

    async fn list_comments(
        &self,
        post_id: i64,
        pagination: Option<Pagination>,
    ) -> Result<Vec<Comment>, DomainError> {
        let state = self.touch();
        let comments = state
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        Ok(paginate(comments, pagination))
    }

    async fn count_comments(&self, post_id: i64) -> Result<i64, DomainError> {
        let state = self.touch();
        Ok(state.comments.iter().filter(|c| c.post_id == post_id).count() as i64)
    }
}

#[async_trait]
impl GroupRepository for InMemoryDb {
    async fn create_group(&self, input: NewGroup) -> Result<Group, DomainError> {
        let mut state = self.touch();
        if state.groups.iter().any(|g| g.slug == input.slug) {
            return Err(DomainError::AlreadyExists("group slug".to_string()));
        }
        let group = Group {
            id: state.next_id(),
            title: input.title,
            slug: input.slug,
            description: input.description,
        };
        state.groups.push(group.clone());
        Ok(group)
    }

    async fn get_group(&self, id: i64) -> Result<Option<Group>, DomainError> {
        Ok(self.touch().groups.iter().find(|g| g.id == id).cloned())
    }

    async fn list_groups(&self) -> Result<Vec<Group>, DomainError> {
        Ok(self.touch().groups.clone())
    }

    async fn delete_group(&self, slug: &str) -> Result<bool, DomainError> {
        let mut state = self.touch();
        let Some(id) = state.groups.iter().find(|g| g.slug == slug).map(|g| g.id) else {
            return Ok(false);
        };
        state.groups.retain(|g| g.id != id);
        for post in state.posts.iter_mut().filter(|p| p.group_id == Some(id)) {
            post.group_id = None;
        }
        Ok(true)
    }
}

#[async_trait]
impl FollowRepository for InMemoryDb {
    async fn create_follow(&self, user_id: i64, following_id: i64) -> Result<Follow, DomainError> {
        let mut state = self.touch();
        if state
            .follows
            .iter()
            .any(|f| f.user_id == user_id && f.following_id == following_id)
        {
            return Err(DomainError::AlreadyExists("follow".to_string()));
        }
        let user = state.username(user_id).ok_or(DomainError::Unauthenticated)?;
        let following = state
            .username(following_id)
            .ok_or(DomainError::Validation {
                field: "following",
                message: "user does not exist",
            })?;
        let follow = Follow {
            user_id,
            user,
            following_id,
            following,
        };
        state.follows.push(follow.clone());
        Ok(follow)
    }

    async fn list_follows(
        &self,
        user_id: i64,
        search: Option<&str>,
    ) -> Result<Vec<Follow>, DomainError> {
        let state = self.touch();
        Ok(state
            .follows
            .iter()
            .filter(|f| f.user_id == user_id)
            .filter(|f| {
                search.is_none_or(|s| f.following.to_lowercase().contains(&s.to_lowercase()))
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl UserRepository for InMemoryDb {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError> {
        let mut state = self.touch();
        if state
            .users
            .iter()
            .any(|c| c.user.username == input.username.as_str())
        {
            return Err(DomainError::AlreadyExists("username".to_string()));
        }
        let id = state.next_id();
        let user = User::new(id, input.username.as_str(), input.email.as_str(), Utc::now())?;
        state.users.push(LoginRecord {
            user: user.clone(),
            password_hash: input.password_hash,
        });
        Ok(user)
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, DomainError> {
        Ok(self
            .touch()
            .users
            .iter()
            .find(|c| c.user.id == id)
            .map(|c| c.user.clone()))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .find_login(username)
            .await?
            .map(|record| record.user))
    }

    async fn find_login(&self, username: &str) -> Result<Option<LoginRecord>, DomainError> {
        Ok(self
            .touch()
            .users
            .iter()
            .find(|c| c.user.username == username)
            .cloned())
    }

    async fn delete_user(&self, id: i64) -> Result<bool, DomainError> {
        let mut state = self.touch();
        let before = state.users.len();
        state.users.retain(|c| c.user.id != id);
        let removed_posts: Vec<i64> = state
            .posts
            .iter()
            .filter(|p| p.author_id == id)
            .map(|p| p.id)
            .collect();
        state.posts.retain(|p| p.author_id != id);
        state
            .comments
            .retain(|c| c.author_id != id && !removed_posts.contains(&c.post_id));
        state
            .follows
            .retain(|f| f.user_id != id && f.following_id != id);
        Ok(state.users.len() < before)
    }
}

#[async_trait]
impl MediaStore for InMemoryDb {
    async fn save_image(&self, upload: ImageUpload) -> Result<String, DomainError> {
        let mut state = self.state();
        let path = format!("posts/{}.{}", state.saved_media.len() + 1, upload.extension);
        state.saved_media.push(path.clone());
        Ok(path)
    }

    async fn discard(&self, path: &str) {
        self.state().discarded_media.push(path.to_string());
    }
}
