use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::{debug, warn};

use super::jwt::JwtKeys;
use crate::{error::AppError, state::AppState, users::repo::UserStore};

/// Email of the caller, resolved from a verified bearer token to an existing user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser(pub String);

/// Gate a request on its `Authorization` header.
///
/// The header must carry `Bearer <token>`, the token must verify, and its
/// subject must still be a registered user. The store is not consulted
/// until the token itself has been accepted.
pub async fn authenticate(
    header: Option<&str>,
    keys: &JwtKeys,
    users: &dyn UserStore,
) -> Result<AuthUser, AppError> {
    let header = header.ok_or_else(|| {
        debug!("missing Authorization header");
        AppError::Unauthenticated
    })?;

    let token = header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            debug!("invalid auth scheme");
            AppError::Unauthenticated
        })?;

    let email = keys.verify(token).map_err(|e| {
        warn!(reason = %e, "bearer token rejected");
        AppError::Unauthenticated
    })?;

    if users.find_by_email(&email).await?.is_none() {
        warn!(email = %email, "token subject does not exist");
        return Err(AppError::Unauthenticated);
    }

    Ok(AuthUser(email))
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok());
        authenticate(header, &state.keys, state.users.as_ref()).await
    }
}
