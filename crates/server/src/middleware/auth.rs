//! Authentication extractors.
//!
//! `RequireUser` verifies the bearer token and loads the account fresh from
//! the database, so a deleted user or a changed role takes effect on the
//! next request even while old tokens are still circulating.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::db::users::UserRepository;
use crate::error::ApiError;
use crate::models::user::User;
use crate::state::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Extractor that requires a valid bearer token for an existing user.
#[derive(Debug)]
pub struct RequireUser(pub User);

/// Extractor that additionally requires the admin role.
#[derive(Debug)]
pub struct RequireAdmin(pub User);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let user_id = state.tokens().verify(token)?;

        let user = UserRepository::new(state.pool())
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("User not found".to_string()))?;

        Ok(Self(user))
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireUser(user) = RequireUser::from_request_parts(parts, state).await?;

        if !user.role.is_admin() {
            return Err(ApiError::Forbidden(
                "Admin access required".to_string(),
            ));
        }

        Ok(Self(user))
    }
}

/// Pull the token out of the `Authorization: Bearer <token>` header.
fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    let value = header
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid authorization header".to_string()))?;

    value
        .strip_prefix(BEARER_PREFIX)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Invalid authorization header".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/auth/me");
        if let Some(value) = value {
            builder = builder.header(AUTHORIZATION, value);
        }
        let (parts, ()) = builder.body(()).expect("request").into_parts();
        parts
    }

    #[test]
    fn extracts_bearer_token() {
        let parts = parts_with_auth(Some("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&parts).expect("token"), "abc.def.ghi");
    }

    #[test]
    fn rejects_missing_header() {
        let parts = parts_with_auth(None);
        assert!(matches!(
            bearer_token(&parts),
            Err(ApiError::Unauthorized(_))
        ));
    }

    #[test]
    fn rejects_non_bearer_scheme() {
        let parts = parts_with_auth(Some("Basic dXNlcjpwYXNz"));
        assert!(matches!(
            bearer_token(&parts),
            Err(ApiError::Unauthorized(_))
        ));
    }

    #[test]
    fn rejects_empty_token() {
        let parts = parts_with_auth(Some("Bearer "));
        assert!(matches!(
            bearer_token(&parts),
            Err(ApiError::Unauthorized(_))
        ));
    }
}
