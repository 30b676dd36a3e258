//! Request authentication: bearer-token extraction and validation.
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};

use crate::auth::token;
use crate::error::AppError;
use crate::AppState;

/// The authenticated identity for one request.
///
/// Extracted from the `Authorization: Bearer <token>` header before the
/// handler runs, and threaded explicitly into every repository call. Ownership
/// checks must use `user_id` from here, never an id taken from a request body
/// or path.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub email: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Auth("missing authorization header".to_string()))?;

        // Scheme check happens before any token work.
        let token = header
            .strip_prefix("Bearer ")
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Auth("invalid authorization header format".to_string()))?;

        let state = AppState::from_ref(state);
        let claims = token::validate_token(token, &state.settings.jwt_secret)?;

        Ok(AuthUser {
            user_id: claims.sub,
            email: claims.email,
        })
    }
}
