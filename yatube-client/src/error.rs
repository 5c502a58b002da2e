use thiserror::Error;

#[derive(Debug, Error)]
/// Ошибки клиентской библиотеки `yatube-client`.
pub enum YatubeClientError {
    /// Ошибка HTTP-транспорта (`reqwest`).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Требуется авторизация (токен отсутствует, истёк или некорректен).
    #[error("unauthorized")]
    Unauthorized,

    /// Операция запрещена: ресурс принадлежит другому пользователю.
    #[error("forbidden")]
    Forbidden,

    /// Запрошенный ресурс не найден.
    #[error("not found")]
    NotFound,

    /// Некорректный запрос, ошибка валидации или ошибка сервера.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Результат операций `yatube-client`.
pub type YatubeClientResult<T> = Result<T, YatubeClientError>;

impl YatubeClientError {
    pub(crate) fn from_http_status(status: reqwest::StatusCode, message: Option<String>) -> Self {
        match status {
            reqwest::StatusCode::UNAUTHORIZED => Self::Unauthorized,
            reqwest::StatusCode::FORBIDDEN => Self::Forbidden,
            reqwest::StatusCode::NOT_FOUND => Self::NotFound,
            _ => {
                let message = message.unwrap_or_else(|| format!("http status {status}"));
                Self::InvalidRequest(message)
            }
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::from_http_status(status, None);
        }
        Self::Http(err)
    }
}
