use std::convert::Infallible;

use axum::{
    extract::{OptionalFromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::domain::permission::Actor;
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppError;

#[derive(Debug, Clone)]
pub(crate) struct AuthenticatedUser {
    pub(crate) user_id: i64,
}

impl<S> OptionalFromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<AuthenticatedUser>().cloned())
    }
}

impl From<Option<AuthenticatedUser>> for Actor {
    fn from(user: Option<AuthenticatedUser>) -> Self {
        match user {
            Some(user) => Actor::User(user.user_id),
            None => Actor::Anonymous,
        }
    }
}

/// Requests without `Authorization` pass through anonymously; a header that
/// is present but malformed, expired or forged is rejected with 401.
pub(crate) async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(auth_header) = request.headers().get(header::AUTHORIZATION) else {
        return Ok(next.run(request).await);
    };
    let auth_header = auth_header.to_str().map_err(|_| AppError::Unauthorized)?;

    let token = bearer_token(auth_header).ok_or(AppError::Unauthorized)?;
    let claims = state
        .jwt
        .verify_token(token)
        .map_err(|_| AppError::Unauthorized)?;

    request.extensions_mut().insert(AuthenticatedUser {
        user_id: claims.user_id,
    });

    Ok(next.run(request).await)
}

fn bearer_token(header_value: &str) -> Option<&str> {
    let mut parts = header_value.split_whitespace();
    let scheme = parts.next()?;
    let token = parts.next()?;
    if parts.next().is_some() || !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(token)
}

#[cfg(test)]
mod tests {
    use super::{AuthenticatedUser, bearer_token};
    use crate::domain::permission::Actor;

    #[test]
    fn bearer_token_requires_scheme_and_single_token() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("bearer   abc"), Some("abc"));
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token("Bearer a b"), None);
    }

    #[test]
    fn actor_follows_optional_user() {
        assert_eq!(Actor::from(None), Actor::Anonymous);
        assert_eq!(
            Actor::from(Some(AuthenticatedUser { user_id: 7 })),
            Actor::User(7)
        );
    }
}
