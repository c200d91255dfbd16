use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;

/// Permission names understood by the route table.
pub mod perm {
    pub const READ: &str = "READ";
    pub const WRITE: &str = "WRITE";
}

/// Decoded contents of a bearer credential. Produced once at token issuance,
/// immutable afterwards; authorization decisions are pure functions of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub role: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(role: String, permissions: Vec<String>, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            role,
            permissions,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no bearer token presented")]
    MissingToken,

    #[error("token signature or expiry check failed")]
    InvalidToken,

    #[error("JWT secret not configured")]
    MissingSecret,

    #[error("unparseable expiry duration: {0}")]
    InvalidExpiry(String),
}

/// Access guard: every required element must be satisfied, where an element
/// is satisfied by membership in the claims' permission set OR by equality
/// with the claims' role (the role name doubles as an implicit permission).
/// An empty requirement always allows.
pub fn authorize(claims: &Claims, required: &[&str]) -> bool {
    required
        .iter()
        .all(|p| claims.permissions.iter().any(|have| have == p) || *p == claims.role)
}

/// Sign a new token for the given role and permission set, using the
/// configured secret and lifetime.
pub fn issue_token(
    security: &SecurityConfig,
    role: String,
    permissions: Vec<String>,
) -> Result<String, AuthError> {
    if security.jwt_secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }
    let ttl = parse_expiry(&security.jwt_expires_in)
        .ok_or_else(|| AuthError::InvalidExpiry(security.jwt_expires_in.clone()))?;

    let claims = Claims::new(role, permissions, ttl);
    let key = EncodingKey::from_secret(security.jwt_secret.as_bytes());
    encode(&Header::default(), &claims, &key).map_err(|_| AuthError::InvalidToken)
}

/// Verify signature and expiry, returning the embedded claims. Signature
/// mismatch and expiry are not distinguished to the caller.
pub fn verify_token(security: &SecurityConfig, token: &str) -> Result<Claims, AuthError> {
    if security.jwt_secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }
    let key = DecodingKey::from_secret(security.jwt_secret.as_bytes());
    let data = decode::<Claims>(token, &key, &Validation::default())
        .map_err(|_| AuthError::InvalidToken)?;
    Ok(data.claims)
}

/// Parse a duration string: plain seconds ("3600") or a number with an
/// s/m/h/d suffix ("45s", "15m", "1h", "7d").
pub fn parse_expiry(s: &str) -> Option<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(secs) = s.parse::<i64>() {
        return (secs > 0).then(|| Duration::seconds(secs));
    }
    if !s.is_char_boundary(s.len() - 1) {
        return None;
    }
    let (num, unit) = s.split_at(s.len() - 1);
    let n = num.parse::<i64>().ok().filter(|n| *n > 0)?;
    match unit {
        "s" => Some(Duration::seconds(n)),
        "m" => Some(Duration::minutes(n)),
        "h" => Some(Duration::hours(n)),
        "d" => Some(Duration::days(n)),
        _ => None,
    }
}
