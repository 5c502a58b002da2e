//! Клиентская библиотека для REST API `yatube-server`.
//!
//! `YatubeClient` хранит JWT-токен после `register`/`login` и автоматически
//! передаёт его в каждом запросе. Операции, которые меняют данные, без
//! токена сразу возвращают `YatubeClientError::Unauthorized`; остальное
//! доступно анонимно.
#![warn(missing_docs)]

mod error;
mod http_client;
mod models;

pub use error::{YatubeClientError, YatubeClientResult};
pub use models::{
    AuthResponse, Comment, Follow, Group, Listing, NewPost, Page, Post, PostChanges, PostQuery,
    User,
};

use http_client::HttpClient;

#[derive(Debug, Clone)]
/// Клиент блог-платформы Yatube.
pub struct YatubeClient {
    http: HttpClient,
    token: Option<String>,
}

impl YatubeClient {
    /// Создаёт клиент для сервера с базовым URL, например `http://127.0.0.1:8080`.
    pub fn new(base_url: impl Into<String>) -> YatubeClientResult<Self> {
        Ok(Self {
            http: HttpClient::new(base_url)?,
            token: None,
        })
    }

    /// Устанавливает JWT-токен вручную.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Возвращает текущий JWT-токен, если он установлен.
    pub fn get_token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Очищает сохранённый JWT-токен.
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Регистрирует пользователя и сохраняет полученный токен.
    pub async fn register(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
    ) -> YatubeClientResult<AuthResponse> {
        let result = self.http.register(username, email, password).await?;
        self.token = Some(result.access_token.clone());
        Ok(result)
    }

    /// Выполняет вход и сохраняет полученный токен.
    pub async fn login(&mut self, username: &str, password: &str) -> YatubeClientResult<AuthResponse> {
        let result = self.http.login(username, password).await?;
        self.token = Some(result.access_token.clone());
        Ok(result)
    }

    /// Профиль текущего пользователя.
    pub async fn me(&self) -> YatubeClientResult<User> {
        self.http.me(self.require_token()?).await
    }

    /// Удаляет аккаунт вместе со всеми постами, комментариями и подписками.
    pub async fn delete_account(&mut self) -> YatubeClientResult<()> {
        self.http.delete_me(self.require_token()?).await?;
        self.token = None;
        Ok(())
    }

    /// Список постов с фильтрами. С `limit` сервер возвращает страницу.
    pub async fn list_posts(&self, query: &PostQuery) -> YatubeClientResult<Listing<Post>> {
        self.http.list_posts(self.get_token(), query).await
    }

    /// Пост по идентификатору.
    pub async fn get_post(&self, id: i64) -> YatubeClientResult<Post> {
        self.http.get_post(self.get_token(), id).await
    }

    /// Создаёт пост от имени текущего пользователя.
    pub async fn create_post(&self, post: &NewPost) -> YatubeClientResult<Post> {
        self.http.create_post(self.require_token()?, post).await
    }

    /// Частично изменяет пост. Разрешено только автору.
    pub async fn update_post(&self, id: i64, changes: &PostChanges) -> YatubeClientResult<Post> {
        self.http
            .update_post(self.require_token()?, id, changes)
            .await
    }

    /// Удаляет пост вместе с комментариями. Разрешено только автору.
    pub async fn delete_post(&self, id: i64) -> YatubeClientResult<()> {
        self.http.delete_post(self.require_token()?, id).await
    }

    /// Комментарии к посту; `limit`/`offset` включают пагинацию.
    pub async fn list_comments(
        &self,
        post_id: i64,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> YatubeClientResult<Listing<Comment>> {
        self.http
            .list_comments(self.get_token(), post_id, limit, offset)
            .await
    }

    /// Комментарий к посту по идентификатору.
    pub async fn get_comment(&self, post_id: i64, id: i64) -> YatubeClientResult<Comment> {
        self.http.get_comment(self.get_token(), post_id, id).await
    }

    /// Комментирует пост от имени текущего пользователя.
    pub async fn create_comment(&self, post_id: i64, text: &str) -> YatubeClientResult<Comment> {
        self.http
            .create_comment(self.require_token()?, post_id, text)
            .await
    }

    /// Меняет текст комментария. Разрешено только автору.
    pub async fn update_comment(
        &self,
        post_id: i64,
        id: i64,
        text: &str,
    ) -> YatubeClientResult<Comment> {
        self.http
            .update_comment(self.require_token()?, post_id, id, text)
            .await
    }

    /// Удаляет комментарий. Разрешено только автору.
    pub async fn delete_comment(&self, post_id: i64, id: i64) -> YatubeClientResult<()> {
        self.http
            .delete_comment(self.require_token()?, post_id, id)
            .await
    }

    /// Все группы.
    pub async fn list_groups(&self) -> YatubeClientResult<Vec<Group>> {
        self.http.list_groups(self.get_token()).await
    }

    /// Группа по идентификатору.
    pub async fn get_group(&self, id: i64) -> YatubeClientResult<Group> {
        self.http.get_group(self.get_token(), id).await
    }

    /// Подписки текущего пользователя, опционально с поиском по логину автора.
    pub async fn list_follows(&self, search: Option<&str>) -> YatubeClientResult<Vec<Follow>> {
        self.http.list_follows(self.require_token()?, search).await
    }

    /// Подписывает текущего пользователя на автора.
    pub async fn follow(&self, username: &str) -> YatubeClientResult<Follow> {
        self.http
            .create_follow(self.require_token()?, username)
            .await
    }

    fn require_token(&self) -> YatubeClientResult<&str> {
        self.token.as_deref().ok_or(YatubeClientError::Unauthorized)
    }
}
