//! Registration, login, and profile handlers.
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use metrics::counter;
use serde_json::json;

use crate::auth::{self, AuthUser};
use crate::error::AppError;
use crate::users::{LoginRequest, LoginResponse, RegisterRequest, UpdateUserRequest, UserRepository};
use crate::{metrics as keys, validation, AppState};

pub async fn register(
    State(state): State<AppState>,
    Json(mut req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    validation::validate_email(&req.email)?;
    validation::validate_password(&req.password)?;

    let password_hash = auth::hash_password_secure(&mut req.password)
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))?;

    let repo = UserRepository::new(state.pool.clone());
    let user = repo
        .create(&req.email, &password_hash, &req.first_name, &req.last_name)
        .await?;

    counter!(keys::USER_REGISTERED).increment(1);
    tracing::info!(user_id = user.id, "user registered");

    Ok((StatusCode::CREATED, Json(json!({ "data": user }))))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let repo = UserRepository::new(state.pool.clone());

    // Unknown email and wrong password fall through to the same rejection.
    let user = match repo.find_by_email(&req.email).await? {
        Some(user) if auth::verify_password(&user.password_hash, &req.password) => user,
        _ => {
            counter!(keys::LOGIN_FAILED).increment(1);
            return Err(AppError::Auth("invalid credentials".to_string()));
        },
    };

    let token = auth::issue_token(user.id, &user.email, &state.settings.jwt_secret)?;
    counter!(keys::USER_LOGIN).increment(1);

    Ok(Json(json!({ "data": LoginResponse { token, user } })))
}

pub async fn me(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let user = UserRepository::new(state.pool.clone())
        .find_by_id(auth.user_id)
        .await?;
    Ok(Json(json!({ "data": user })))
}

pub async fn update_me(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = UserRepository::new(state.pool.clone())
        .update_profile(auth.user_id, req)
        .await?;
    Ok(Json(json!({ "data": user })))
}
