//! Bearer token authentication for task routes

use auth::AuthError;
use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use tracing::{error, warn};

use crate::{error::ApiError, scope::Identity, state::AppState};

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Authentication middleware
///
/// Resolves the caller from its bearer token and inserts its [`Identity`]
/// into the request extensions. Every token failure is a plain 401.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(req.headers()).ok_or_else(|| {
        warn!("Request without a bearer token to {}", req.uri().path());
        ApiError::Unauthorized
    })?;

    let user = state
        .auth_service
        .authenticate(token)
        .await
        .map_err(|e| {
            if e.is_token_error() || matches!(e, AuthError::InvalidCredentials) {
                warn!("Rejected bearer token: {}", e);
                ApiError::Unauthorized
            } else {
                error!("Failed to authenticate request: {}", e);
                ApiError::InternalServerError
            }
        })?;

    req.extensions_mut().insert(Identity::from(user));

    Ok(next.run(req).await)
}
