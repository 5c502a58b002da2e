use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::user::{Email, User, Username};

#[derive(Debug, Clone)]
pub(crate) struct NewUser {
    pub(crate) username: Username,
    pub(crate) email: Email,
    pub(crate) password_hash: String,
}

/// What login needs: the account and its stored argon2 hash.
#[derive(Debug, Clone)]
pub(crate) struct LoginRecord {
    pub(crate) user: User,
    pub(crate) password_hash: String,
}

#[async_trait]
pub(crate) trait UserRepository: Send + Sync {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError>;
    async fn get_user(&self, id: i64) -> Result<Option<User>, DomainError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;
    async fn find_login(&self, username: &str) -> Result<Option<LoginRecord>, DomainError>;
    /// Removes the user together with everything that references it.
    async fn delete_user(&self, id: i64) -> Result<bool, DomainError>;
}
