use std::fmt;

use chrono::{DateTime, Utc};
use validator::ValidateEmail;

use super::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct User {
    pub(crate) id: i64,
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) created_at: DateTime<Utc>,
}

impl User {
    pub(crate) fn new(
        id: i64,
        username: impl Into<String>,
        email: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if id <= 0 {
            return Err(DomainError::Validation {
                field: "id",
                message: "must be > 0",
            });
        }
        let username = username.into();
        if username.is_empty() {
            return Err(DomainError::Validation {
                field: "username",
                message: "must not be empty",
            });
        }

        Ok(Self {
            id,
            username,
            email: email.into(),
            created_at,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Username(String);

impl Username {
    pub(crate) fn parse(raw: &str) -> Result<Self, DomainError> {
        let name = raw.trim();
        if !(3..=64).contains(&name.chars().count()) {
            return Err(DomainError::Validation {
                field: "username",
                message: "must be 3..64 chars",
            });
        }
        if !name.chars().all(is_username_char) {
            return Err(DomainError::Validation {
                field: "username",
                message: "may contain only letters, digits and @/./+/-/_",
            });
        }
        Ok(Self(name.to_string()))
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_username_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_')
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Email(String);

impl Email {
    pub(crate) fn parse(raw: &str) -> Result<Self, DomainError> {
        let email = raw.trim().to_lowercase();
        if !email.validate_email() {
            return Err(DomainError::Validation {
                field: "email",
                message: "must be a valid email",
            });
        }
        Ok(Self(email))
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

/// Plain-text password, held only until it is hashed or verified.
#[derive(Clone)]
pub(crate) struct Password(String);

impl Password {
    pub(crate) fn choose(raw: String) -> Result<Self, DomainError> {
        if !(8..=128).contains(&raw.chars().count()) {
            return Err(DomainError::Validation {
                field: "password",
                message: "must be 8..128 chars",
            });
        }
        Ok(Self(raw))
    }

    pub(crate) fn attempt(raw: String) -> Result<Self, DomainError> {
        if raw.is_empty() {
            return Err(DomainError::Validation {
                field: "password",
                message: "must not be empty",
            });
        }
        Ok(Self(raw))
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Registration {
    pub(crate) username: Username,
    pub(crate) email: Email,
    pub(crate) password: Password,
}

impl Registration {
    pub(crate) fn parse(username: &str, email: &str, password: String) -> Result<Self, DomainError> {
        Ok(Self {
            username: Username::parse(username)?,
            email: Email::parse(email)?,
            password: Password::choose(password)?,
        })
    }
}

/// Login input. The username is only trimmed: a name that could never have
/// registered just fails to match.
#[derive(Debug, Clone)]
pub(crate) struct Credentials {
    pub(crate) username: String,
    pub(crate) password: Password,
}

impl Credentials {
    pub(crate) fn parse(username: &str, password: String) -> Result<Self, DomainError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(DomainError::Validation {
                field: "username",
                message: "must not be empty",
            });
        }
        Ok(Self {
            username: username.to_string(),
            password: Password::attempt(password)?,
        })
    }
}
