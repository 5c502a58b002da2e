use super::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct Group {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) slug: String,
    pub(crate) description: String,
}

#[derive(Debug, Clone)]
pub(crate) struct CreateGroupRequest {
    pub(crate) title: String,
    pub(crate) slug: String,
    pub(crate) description: String,
}

impl CreateGroupRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let title = self.title.trim();
        if title.is_empty() || title.chars().count() > 200 {
            return Err(DomainError::Validation {
                field: "title",
                message: "must be 1..200 chars",
            });
        }

        let description = self.description.trim();
        if description.is_empty() {
            return Err(DomainError::Validation {
                field: "description",
                message: "must not be empty",
            });
        }

        Ok(Self {
            title: title.to_string(),
            slug: normalize_slug(&self.slug)?,
            description: description.to_string(),
        })
    }
}

fn normalize_slug(slug: &str) -> Result<String, DomainError> {
    let slug = slug.trim();
    if slug.is_empty() || slug.len() > 200 {
        return Err(DomainError::Validation {
            field: "slug",
            message: "must be 1..200 chars",
        });
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(DomainError::Validation {
            field: "slug",
            message: "may contain only latin letters, digits, '-' and '_'",
        });
    }
    Ok(slug.to_string())
}
