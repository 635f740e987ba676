/// Account endpoints
///
/// - `POST /v1/auth/register`: create an account
/// - `POST /v1/auth/login`: exchange username and password for a session token
///
/// Argon2id is deliberately slow, so hashing and verification run on the
/// blocking thread pool.

use super::reject_nul;
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Json};
use bookshelf_shared::{
    auth::{jwt, password},
    models::user::NewUser,
};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 4, max = 15, message = "Username must be 4 to 15 characters"))]
    pub username: String,

    #[validate(
        email(message = "Invalid email"),
        length(max = 50, message = "Email must be at most 50 characters")
    )]
    pub email: String,

    #[validate(length(min = 8, max = 80, message = "Password must be 8 to 80 characters"))]
    pub password: String,
}

/// Register response
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user_id: String,
    pub username: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 4, max = 15, message = "Username must be 4 to 15 characters"))]
    pub username: String,

    #[validate(length(min = 8, max = 80, message = "Password must be 8 to 80 characters"))]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user_id: String,
    pub username: String,
    pub access_token: String,
    pub token_type: String,

    /// Token lifetime in seconds
    pub expires_in: i64,
}

/// Creates an account
///
/// # Errors
///
/// - `409 Conflict`: username or email already taken
/// - `422 Unprocessable Entity`: field validation failed
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    req.validate()?;
    reject_nul(&[
        ("username", req.username.as_str()),
        ("email", req.email.as_str()),
        ("password", req.password.as_str()),
    ])?;

    let RegisterRequest {
        username,
        email,
        password,
    } = req;

    let new_user = tokio::task::spawn_blocking(move || {
        NewUser::with_password(username, email, &password)
    })
    .await
    .map_err(|e| ApiError::InternalError(format!("Hashing task failed: {}", e)))??;

    let user = state.users.create_user(new_user).await?;
    info!(user_id = %user.id, username = %user.username, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user_id: user.id.to_string(),
            username: user.username,
        }),
    ))
}

/// Verifies credentials and issues a session token
///
/// # Errors
///
/// - `401 Unauthorized`: unknown username or wrong password (same message for both)
/// - `422 Unprocessable Entity`: field validation failed
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate()?;
    reject_nul(&[("username", req.username.as_str()), ("password", req.password.as_str())])?;

    let user = state
        .users
        .find_by_username(&req.username)
        .await?
        .ok_or_else(|| ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    let password_hash = user.password_hash.clone();
    let valid = tokio::task::spawn_blocking(move || {
        password::verify_password(&req.password, &password_hash)
    })
    .await
    .map_err(|e| ApiError::InternalError(format!("Verification task failed: {}", e)))??;

    if !valid {
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let lifetime = Duration::hours(state.config.jwt.expiration_hours);
    let claims = jwt::Claims::with_expiration(user.id, user.username.clone(), lifetime);
    let access_token = jwt::create_token(&claims, state.jwt_secret())?;

    info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse {
        user_id: user.id.to_string(),
        username: user.username,
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: lifetime.num_seconds(),
    }))
}
