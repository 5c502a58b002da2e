use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Публичная модель пользователя.
pub struct User {
    /// Идентификатор пользователя.
    pub id: i64,
    /// Логин.
    pub username: String,
    /// Email.
    pub email: String,
    /// Дата и время регистрации (UTC).
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Ответ после успешной регистрации или входа.
pub struct AuthResponse {
    /// JWT access token.
    pub access_token: String,
    /// Данные пользователя.
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Публикация.
pub struct Post {
    /// Идентификатор поста.
    pub id: i64,
    /// Текст поста.
    pub text: String,
    /// Дата публикации (UTC).
    pub pub_date: DateTime<Utc>,
    /// Логин автора.
    pub author: String,
    /// Идентификатор группы, если пост в группе.
    pub group: Option<i64>,
    /// URL картинки.
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Комментарий к посту.
pub struct Comment {
    /// Идентификатор комментария.
    pub id: i64,
    /// Логин автора.
    pub author: String,
    /// Идентификатор поста.
    pub post: i64,
    /// Текст комментария.
    pub text: String,
    /// Дата создания (UTC).
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Сообщество.
pub struct Group {
    /// Идентификатор группы.
    pub id: i64,
    /// Название.
    pub title: String,
    /// Уникальный slug.
    pub slug: String,
    /// Описание.
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Подписка текущего пользователя на автора.
pub struct Follow {
    /// Логин подписчика.
    pub user: String,
    /// Логин автора.
    pub following: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Страница списка при запросе с `limit`.
pub struct Page<T> {
    /// Общее количество записей.
    pub count: i64,
    /// Размер страницы.
    pub limit: u32,
    /// Смещение от начала выборки.
    pub offset: u32,
    /// Записи текущей страницы.
    pub results: Vec<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
/// Список постов или комментариев: массив без пагинации, страница с ней.
pub enum Listing<T> {
    /// Полный список.
    Plain(Vec<T>),
    /// Страница.
    Paged(Page<T>),
}

impl<T> Listing<T> {
    /// Записи независимо от формы ответа.
    pub fn items(&self) -> &[T] {
        match self {
            Listing::Plain(items) => items,
            Listing::Paged(page) => &page.results,
        }
    }

    /// Общее количество записей на сервере.
    pub fn total(&self) -> i64 {
        match self {
            Listing::Plain(items) => items.len() as i64,
            Listing::Paged(page) => page.count,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
/// Данные нового поста.
pub struct NewPost {
    /// Текст поста.
    pub text: String,
    /// Идентификатор группы.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<i64>,
    /// Картинка в виде data URI (`data:image/png;base64,...`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
/// Частичное изменение поста (PATCH).
///
/// `None` оставляет поле без изменений, `Some(None)` очищает его.
pub struct PostChanges {
    /// Новый текст.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Новая группа.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<Option<i64>>,
    /// Новая картинка в виде data URI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, Serialize)]
/// Фильтры и пагинация списка постов.
pub struct PostQuery {
    /// Только посты группы.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<i64>,
    /// Подстрока текста.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Сортировка: `author`, `-author`, `username`, `-username`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordering: Option<String>,
    /// Размер страницы (1..=100).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Смещение.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}
