use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};
use tracing::info;

use crate::data::user_repository::{NewUser, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::permission::Actor;
use crate::domain::user::{Credentials, Password, Registration, User};
use crate::infrastructure::jwt::JwtService;

#[derive(Debug, Clone)]
pub(crate) struct AuthResult {
    pub(crate) user: User,
    pub(crate) access_token: String,
}

pub(crate) struct AuthService<R: UserRepository> {
    repo: R,
    jwt: JwtService,
}

impl<R: UserRepository> AuthService<R> {
    const DUMMY_PASSWORD_HASH: &'static str = "$argon2id$v=19$m=19456,t=2,p=1$MDEyMzQ1Njc4OWFiY2RlZg$gwN6hT1sNdk9kI95f7n2Gl3fL0qRmBf2Ffkj2r90/0M";

    pub(crate) fn new(repo: R, jwt: JwtService) -> Self {
        Self { repo, jwt }
    }

    pub(crate) async fn register(&self, registration: Registration) -> Result<AuthResult, DomainError> {
        let Registration {
            username,
            email,
            password,
        } = registration;
        let password_hash = self.hash_password(&password)?;

        let user = self
            .repo
            .create_user(NewUser {
                username,
                email,
                password_hash,
            })
            .await?;

        info!(user_id = user.id, username = %user.username, "user registered");
        self.authenticated(user)
    }

    pub(crate) async fn login(&self, credentials: Credentials) -> Result<AuthResult, DomainError> {
        let Some(record) = self.repo.find_login(&credentials.username).await? else {
            // same hashing cost whether or not the user exists
            match self.verify_password(&credentials.password, Self::DUMMY_PASSWORD_HASH) {
                Ok(()) | Err(DomainError::InvalidCredentials) => {}
                Err(err) => return Err(err),
            }
            return Err(DomainError::InvalidCredentials);
        };

        self.verify_password(&credentials.password, &record.password_hash)?;
        self.authenticated(record.user)
    }

    /// A valid token whose user was deleted no longer authenticates anyone.
    pub(crate) async fn current_user(&self, actor: Actor) -> Result<User, DomainError> {
        let user_id = actor.require_user()?;
        self.repo
            .get_user(user_id)
            .await?
            .ok_or(DomainError::Unauthenticated)
    }

    /// Deleting an account cascades to the user's posts, comments and follows.
    pub(crate) async fn delete_account(&self, actor: Actor) -> Result<(), DomainError> {
        let user_id = actor.require_user()?;
        if !self.repo.delete_user(user_id).await? {
            return Err(DomainError::Unauthenticated);
        }
        info!(user_id, "user deleted");
        Ok(())
    }

    fn hash_password(&self, password: &Password) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Self::argon2()?
            .hash_password(password.expose().as_bytes(), &salt)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Ok(password_hash.to_string())
    }

    fn verify_password(&self, password: &Password, password_hash: &str) -> Result<(), DomainError> {
        let parsed_hash = PasswordHash::new(password_hash)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Self::argon2()?
            .verify_password(password.expose().as_bytes(), &parsed_hash)
            .map_err(|err| match err {
                PasswordHashError::Password => DomainError::InvalidCredentials,
                _ => DomainError::Unexpected(err.to_string()),
            })
    }

    fn authenticated(&self, user: User) -> Result<AuthResult, DomainError> {
        let access_token = self
            .jwt
            .generate_token(user.id, &user.username)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Ok(AuthResult { user, access_token })
    }

    fn argon2() -> Result<Argon2<'static>, DomainError> {
        let params = Params::new(19 * 1024, 2, 1, None)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

#[cfg(test)]
mod tests {
    use super::AuthService;
    use crate::application::fakes::InMemoryDb;
    use crate::domain::error::DomainError;
    use crate::domain::permission::Actor;
    use crate::domain::user::{Credentials, Registration};
    use crate::infrastructure::jwt::JwtService;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn service(db: &InMemoryDb) -> AuthService<InMemoryDb> {
        AuthService::new(db.clone(), JwtService::new(SECRET, 3600))
    }

    fn register_request(username: &str) -> Registration {
        Registration::parse(
            &format!("  {username}  "),
            &format!("  {}@EXAMPLE.COM  ", username.to_uppercase()),
            "very-secure-password".to_string(),
        )
        .expect("registration must be valid")
    }

    fn login_request(username: &str, password: &str) -> Credentials {
        Credentials::parse(username, password.to_string()).expect("credentials must be valid")
    }

    #[tokio::test]
    async fn register_creates_user_and_returns_token() {
        let db = InMemoryDb::new();
        let result = service(&db)
            .register(register_request("valid_user"))
            .await
            .expect("register must succeed");

        assert_eq!(result.user.username, "valid_user");
        assert_eq!(result.user.email, "valid_user@example.com");
        assert!(!result.access_token.is_empty());

        let claims = JwtService::new(SECRET, 3600)
            .verify_token(&result.access_token)
            .expect("issued token must verify");
        assert_eq!(claims.user_id, result.user.id);

        let state = db.state();
        let stored = state.users.first().expect("user must be stored");
        assert!(stored.password_hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn register_with_taken_username_already_exists() {
        let db = InMemoryDb::new();
        db.seed_user("valid_user");

        let err = service(&db)
            .register(register_request("valid_user"))
            .await
            .expect_err("username is taken");
        assert!(matches!(err, DomainError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn login_returns_invalid_credentials_for_missing_user() {
        let db = InMemoryDb::new();
        let err = service(&db)
            .login(login_request("ghost", "some-password"))
            .await
            .expect_err("login must fail");
        assert!(matches!(err, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_checks_password() {
        let db = InMemoryDb::new();
        let service = service(&db);
        service
            .register(register_request("valid_user"))
            .await
            .expect("register must succeed");

        let err = service
            .login(login_request("valid_user", "wrong-password"))
            .await
            .expect_err("wrong password must fail");
        assert!(matches!(err, DomainError::InvalidCredentials));

        let result = service
            .login(login_request(" valid_user ", "very-secure-password"))
            .await
            .expect("login must succeed");
        assert_eq!(result.user.username, "valid_user");
        assert!(!result.access_token.is_empty());
    }

    #[tokio::test]
    async fn current_user_requires_existing_account() {
        let db = InMemoryDb::new();
        let leo = db.seed_user("leo");
        let service = service(&db);

        let user = service
            .current_user(Actor::User(leo))
            .await
            .expect("user must be found");
        assert_eq!(user.username, "leo");

        let err = service
            .current_user(Actor::Anonymous)
            .await
            .expect_err("anonymous has no profile");
        assert!(matches!(err, DomainError::Unauthenticated));

        let err = service
            .current_user(Actor::User(999))
            .await
            .expect_err("deleted user is not authenticated");
        assert!(matches!(err, DomainError::Unauthenticated));
    }

    #[tokio::test]
    async fn delete_account_cascades_to_content() {
        let db = InMemoryDb::new();
        let leo = db.seed_user("leo");
        let anna = db.seed_user("anna");
        let leo_post = db.seed_post(leo, "by leo");
        let anna_post = db.seed_post(anna, "by anna");
        db.seed_comment(anna_post.id, leo, "leo on anna");
        db.seed_comment(leo_post.id, anna, "anna on leo");

        service(&db)
            .delete_account(Actor::User(leo))
            .await
            .expect("delete must succeed");

        assert!(db.post(leo_post.id).is_none());
        assert!(db.post(anna_post.id).is_some());
        assert!(db.state().comments.is_empty());
        assert_eq!(db.state().users.len(), 1);
    }
}
