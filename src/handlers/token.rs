use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};

use crate::auth;
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub role: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    pub expires_in: String,
}

/// POST /token - issue a signed bearer credential for the supplied role and
/// permission set. Unauthenticated by design: the token is the only identity
/// this service knows about.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<TokenRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let security = &state.config.security;
    let token = auth::issue_token(security, body.role, body.permissions)?;

    Ok(Json(TokenResponse {
        token,
        expires_in: security.jwt_expires_in.clone(),
    }))
}
