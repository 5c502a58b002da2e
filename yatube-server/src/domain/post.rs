use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::image::ImageUpload;
use super::permission::Owned;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Post {
    pub(crate) id: i64,
    pub(crate) text: String,
    pub(crate) pub_date: DateTime<Utc>,
    pub(crate) author_id: i64,
    pub(crate) author: String,
    pub(crate) group_id: Option<i64>,
    pub(crate) image: Option<String>,
}

impl Owned for Post {
    fn owner_id(&self) -> i64 {
        self.author_id
    }
}

#[derive(Debug, Clone)]
pub(crate) struct CreatePostRequest {
    pub(crate) text: String,
    pub(crate) group_id: Option<i64>,
    pub(crate) image: Option<ImageUpload>,
}

impl CreatePostRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        if let Some(group_id) = self.group_id {
            validate_positive_i64("group", group_id)?;
        }
        Ok(Self {
            text: normalize_text(&self.text)?,
            ..self
        })
    }
}

/// Changes applied by PUT/PATCH. `None` keeps the stored value,
/// `Some(None)` clears a nullable field.
#[derive(Debug, Clone, Default)]
pub(crate) struct UpdatePostRequest {
    pub(crate) text: Option<String>,
    pub(crate) group_id: Option<Option<i64>>,
    pub(crate) image: Option<Option<ImageUpload>>,
}

impl UpdatePostRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let text = self.text.as_deref().map(normalize_text).transpose()?;
        if let Some(Some(group_id)) = self.group_id {
            validate_positive_i64("group", group_id)?;
        }
        Ok(Self { text, ..self })
    }
}

impl Post {
    pub(crate) fn new(
        id: i64,
        text: impl Into<String>,
        pub_date: DateTime<Utc>,
        author_id: i64,
        author: impl Into<String>,
        group_id: Option<i64>,
        image: Option<String>,
    ) -> Result<Self, DomainError> {
        validate_positive_i64("id", id)?;
        validate_positive_i64("author_id", author_id)?;
        let text = normalize_text(&text.into())?;

        Ok(Self {
            id,
            text,
            pub_date,
            author_id,
            author: author.into(),
            group_id,
            image,
        })
    }
}

pub(crate) fn validate_positive_i64(field: &'static str, value: i64) -> Result<(), DomainError> {
    if value <= 0 {
        return Err(DomainError::Validation {
            field,
            message: "must be > 0",
        });
    }
    Ok(())
}

pub(crate) fn normalize_text(text: &str) -> Result<String, DomainError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(DomainError::Validation {
            field: "text",
            message: "must not be empty",
        });
    }
    Ok(text.to_string())
}
