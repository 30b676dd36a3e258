//! Signed, time-limited identity tokens.
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Token lifetime: 24 hours.
pub const TOKEN_TTL_SECS: i64 = 60 * 60 * 24;

/// Claims carried by every issued token. Ephemeral; reconstructed from the
/// signature-verified token on each request, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Owning user id.
    pub sub: i64,
    /// Email at issuance time.
    pub email: String,
    /// Issued-at (Unix seconds).
    pub iat: i64,
    /// Expiry (Unix seconds).
    pub exp: i64,
}

/// Issue a signed token for the given identity.
pub fn issue_token(user_id: i64, email: &str, secret: &str) -> Result<String, AppError> {
    issue_token_with_ttl(user_id, email, secret, TOKEN_TTL_SECS)
}

pub(crate) fn issue_token_with_ttl(
    user_id: i64,
    email: &str,
    secret: &str,
    ttl_secs: i64,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        email: email.to_owned(),
        iat: now,
        exp: now + ttl_secs,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("token signing failed: {e}")))
}

/// Validate a token and return its claims.
///
/// The algorithm is pinned to HS256, so a token declaring anything else fails
/// signature verification outright. Expiry is enforced with zero leeway.
/// Every failure mode (bad signature, expired, malformed) collapses to the
/// same opaque authentication error.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Auth("invalid or expired token".to_string()))
}
