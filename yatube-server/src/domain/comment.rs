use chrono::{DateTime, Utc};

use super::error::DomainError;
use super::permission::Owned;
use super::post::{normalize_text, validate_positive_i64};

#[derive(Debug, Clone)]
pub(crate) struct Comment {
    pub(crate) id: i64,
    pub(crate) author_id: i64,
    pub(crate) author: String,
    pub(crate) post_id: i64,
    pub(crate) text: String,
    pub(crate) created: DateTime<Utc>,
}

impl Owned for Comment {
    fn owner_id(&self) -> i64 {
        self.author_id
    }
}

impl Comment {
    pub(crate) fn new(
        id: i64,
        author_id: i64,
        author: impl Into<String>,
        post_id: i64,
        text: impl Into<String>,
        created: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        validate_positive_i64("id", id)?;
        validate_positive_i64("author_id", author_id)?;
        validate_positive_i64("post_id", post_id)?;
        let text = normalize_text(&text.into())?;

        Ok(Self {
            id,
            author_id,
            author: author.into(),
            post_id,
            text,
            created,
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct CreateCommentRequest {
    pub(crate) text: String,
}

impl CreateCommentRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            text: normalize_text(&self.text)?,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct UpdateCommentRequest {
    pub(crate) text: Option<String>,
}

impl UpdateCommentRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            text: self.text.as_deref().map(normalize_text).transpose()?,
        })
    }
}
