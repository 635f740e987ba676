/// Bearer-token authentication
///
/// Validates `Authorization: Bearer <jwt>` and inserts an
/// [`AuthContext`] into the request extensions. Handlers behind this layer
/// take `Extension<AuthContext>`.

use crate::{app::AppState, error::ApiError};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use bookshelf_shared::auth::{jwt, AuthContext};

pub async fn require_bearer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::BadRequest("Expected Bearer token".to_string()))?;

    let claims = jwt::validate_token(token.trim(), state.jwt_secret())?;
    req.extensions_mut().insert(AuthContext::from_claims(claims));

    Ok(next.run(req).await)
}
