use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::time::Duration;

use crate::error::{YatubeClientError, YatubeClientResult};
use crate::models::{
    AuthResponse, Comment, Follow, Group, Listing, NewPost, Post, PostChanges, PostQuery, User,
};

const API_PREFIX: &str = "/api/v1";

#[derive(Debug, Serialize)]
struct RegisterRequestDto<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct LoginRequestDto<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct CommentTextDto<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateFollowDto<'a> {
    following: &'a str,
}

#[derive(Debug, Serialize)]
struct PaginationQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<u32>,
}

#[derive(Debug, Serialize)]
struct SearchQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    search: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponseDto {
    error: Option<String>,
}

#[derive(Debug, Clone)]
/// HTTP-клиент для REST API `yatube-server` (`/api/v1`).
pub(crate) struct HttpClient {
    base_url: String,
    client: Client,
}

impl HttpClient {
    /// Создаёт новый HTTP-клиент с базовым URL сервера.
    pub(crate) fn new(base_url: impl Into<String>) -> YatubeClientResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}{}/{}",
            self.base_url.trim_end_matches('/'),
            API_PREFIX,
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let request = self.client.request(method, self.endpoint(path));
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn decode_error(response: Response) -> YatubeClientError {
        let status = response.status();

        let message = match response.json::<ErrorResponseDto>().await {
            Ok(body) => body
                .error
                .unwrap_or_else(|| format!("http status {status}")),
            Err(_) => format!("http status {status}"),
        };
        YatubeClientError::from_http_status(status, Some(message))
    }

    async fn execute(request: RequestBuilder) -> YatubeClientResult<Response> {
        let response = request
            .send()
            .await
            .map_err(YatubeClientError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }
        Ok(response)
    }

    /// отправляет запрос и разбирает json-ответ
    async fn execute_json<T: DeserializeOwned>(request: RequestBuilder) -> YatubeClientResult<T> {
        Self::execute(request)
            .await?
            .json::<T>()
            .await
            .map_err(YatubeClientError::from_reqwest)
    }

    pub(crate) async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> YatubeClientResult<AuthResponse> {
        let payload = RegisterRequestDto {
            username,
            email,
            password,
        };
        Self::execute_json(
            self.request(Method::POST, "auth/register", None)
                .json(&payload),
        )
        .await
    }

    pub(crate) async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> YatubeClientResult<AuthResponse> {
        let payload = LoginRequestDto { username, password };
        Self::execute_json(self.request(Method::POST, "auth/login", None).json(&payload)).await
    }

    pub(crate) async fn me(&self, token: &str) -> YatubeClientResult<User> {
        Self::execute_json(self.request(Method::GET, "users/me", Some(token))).await
    }

    pub(crate) async fn delete_me(&self, token: &str) -> YatubeClientResult<()> {
        Self::execute(self.request(Method::DELETE, "users/me", Some(token))).await?;
        Ok(())
    }

    pub(crate) async fn list_posts(
        &self,
        token: Option<&str>,
        query: &PostQuery,
    ) -> YatubeClientResult<Listing<Post>> {
        Self::execute_json(self.request(Method::GET, "posts/", token).query(query)).await
    }

    pub(crate) async fn get_post(&self, token: Option<&str>, id: i64) -> YatubeClientResult<Post> {
        Self::execute_json(self.request(Method::GET, &format!("posts/{id}/"), token)).await
    }

    pub(crate) async fn create_post(&self, token: &str, post: &NewPost) -> YatubeClientResult<Post> {
        Self::execute_json(self.request(Method::POST, "posts/", Some(token)).json(post)).await
    }

    pub(crate) async fn update_post(
        &self,
        token: &str,
        id: i64,
        changes: &PostChanges,
    ) -> YatubeClientResult<Post> {
        Self::execute_json(
            self.request(Method::PATCH, &format!("posts/{id}/"), Some(token))
                .json(changes),
        )
        .await
    }

    pub(crate) async fn delete_post(&self, token: &str, id: i64) -> YatubeClientResult<()> {
        Self::execute(self.request(Method::DELETE, &format!("posts/{id}/"), Some(token))).await?;
        Ok(())
    }

    pub(crate) async fn list_comments(
        &self,
        token: Option<&str>,
        post_id: i64,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> YatubeClientResult<Listing<Comment>> {
        Self::execute_json(
            self.request(Method::GET, &format!("posts/{post_id}/comments/"), token)
                .query(&PaginationQuery { limit, offset }),
        )
        .await
    }

    pub(crate) async fn get_comment(
        &self,
        token: Option<&str>,
        post_id: i64,
        id: i64,
    ) -> YatubeClientResult<Comment> {
        Self::execute_json(self.request(
            Method::GET,
            &format!("posts/{post_id}/comments/{id}/"),
            token,
        ))
        .await
    }

    pub(crate) async fn create_comment(
        &self,
        token: &str,
        post_id: i64,
        text: &str,
    ) -> YatubeClientResult<Comment> {
        Self::execute_json(
            self.request(
                Method::POST,
                &format!("posts/{post_id}/comments/"),
                Some(token),
            )
            .json(&CommentTextDto { text }),
        )
        .await
    }

    pub(crate) async fn update_comment(
        &self,
        token: &str,
        post_id: i64,
        id: i64,
        text: &str,
    ) -> YatubeClientResult<Comment> {
        Self::execute_json(
            self.request(
                Method::PATCH,
                &format!("posts/{post_id}/comments/{id}/"),
                Some(token),
            )
            .json(&CommentTextDto { text }),
        )
        .await
    }

    pub(crate) async fn delete_comment(
        &self,
        token: &str,
        post_id: i64,
        id: i64,
    ) -> YatubeClientResult<()> {
        Self::execute(self.request(
            Method::DELETE,
            &format!("posts/{post_id}/comments/{id}/"),
            Some(token),
        ))
        .await?;
        Ok(())
    }

    pub(crate) async fn list_groups(&self, token: Option<&str>) -> YatubeClientResult<Vec<Group>> {
        Self::execute_json(self.request(Method::GET, "groups/", token)).await
    }

    pub(crate) async fn get_group(&self, token: Option<&str>, id: i64) -> YatubeClientResult<Group> {
        Self::execute_json(self.request(Method::GET, &format!("groups/{id}/"), token)).await
    }

    pub(crate) async fn list_follows(
        &self,
        token: &str,
        search: Option<&str>,
    ) -> YatubeClientResult<Vec<Follow>> {
        Self::execute_json(
            self.request(Method::GET, "follow/", Some(token))
                .query(&SearchQuery { search }),
        )
        .await
    }

    pub(crate) async fn create_follow(
        &self,
        token: &str,
        following: &str,
    ) -> YatubeClientResult<Follow> {
        Self::execute_json(
            self.request(Method::POST, "follow/", Some(token))
                .json(&CreateFollowDto { following }),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::HttpClient;

    #[test]
    fn endpoint_normalizes_slashes_and_adds_prefix() {
        let client = HttpClient::new("http://localhost:8080/").expect("client must build");
        assert_eq!(
            client.endpoint("/posts/"),
            "http://localhost:8080/api/v1/posts/"
        );
        assert_eq!(
            client.endpoint("posts/3/comments/"),
            "http://localhost:8080/api/v1/posts/3/comments/"
        );
    }
}
