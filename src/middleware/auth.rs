use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap},
};

use crate::auth::{self, AuthError, Claims};
use crate::error::ApiError;
use crate::AppState;

/// Authenticated request context, extracted from the Authorization header.
/// Extraction performs the token verification step; handlers apply the
/// access guard via `require` before touching the store.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub claims: Claims,
}

impl AuthUser {
    /// Fails closed with 403 unless every required permission is satisfied
    /// by the verified claims.
    pub fn require(&self, permissions: &[&str]) -> Result<(), ApiError> {
        if auth::authorize(&self.claims, permissions) {
            Ok(())
        } else {
            Err(ApiError::forbidden("Forbidden"))
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let token = bearer_token(&parts.headers)?;
        let claims = auth::verify_token(&state.config.security, &token)?;
        Ok(AuthUser { claims })
    }
}

/// Strip the Bearer scheme from the Authorization header. A missing header,
/// a different scheme, or an empty token all read as "no credential".
fn bearer_token(headers: &HeaderMap) -> Result<String, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    let token = value.strip_prefix("Bearer ").ok_or(AuthError::MissingToken)?.trim();
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token.to_string())
}
