//! Middleware for bearer-token authentication and role gating

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::error;

use crate::error::ApiError;
use crate::models::{Role, User};
use crate::state::AppState;

/// The authenticated user, attached to request extensions by
/// [`auth_middleware`]
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Extract and validate the bearer token, then resolve the embedded user id
/// against the identity store. A token whose user no longer exists is
/// rejected the same way an invalid token is.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Unauthorized: No token provided".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Unauthorized: No token provided".to_string()))?;

    let claims = state
        .jwt_service
        .validate_token(token)
        .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

    let user = state
        .user_repository
        .find_by_id(claims.sub)
        .await
        .map_err(|e| {
            error!("Failed to resolve token user: {}", e);
            ApiError::Internal
        })?
        .ok_or_else(|| ApiError::Unauthorized("Unauthorized: User not found".to_string()))?;

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

/// Role gate: only owners may pass. Must be layered inside
/// [`auth_middleware`].
pub async fn require_owner(req: Request<Body>, next: Next) -> Result<Response, ApiError> {
    let user = req.extensions().get::<CurrentUser>().ok_or_else(|| {
        error!("require_owner ran without an authenticated user");
        ApiError::Internal
    })?;

    if user.0.role != Role::Owner {
        return Err(ApiError::Forbidden("Owner role required".to_string()));
    }

    Ok(next.run(req).await)
}
