//! Authentication service routes

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    error::AuthError,
    extract::AuthJson,
    models::Credentials,
    state::AppState,
    validation::validate_signup,
};

/// Response for a successful signin
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub access_token: String,
}

/// Create the router for the authentication service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/auth/signup", post(sign_up))
        .route("/auth/signin", post(sign_in))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "auth-service"
    }))
}

/// User registration endpoint
pub async fn sign_up(
    State(state): State<AppState>,
    AuthJson(payload): AuthJson<Credentials>,
) -> Result<StatusCode, AuthError> {
    info!("Signup request for user: {}", payload.username);

    validate_signup(&payload)?;

    state.auth_service.sign_up(payload).await?;

    Ok(StatusCode::CREATED)
}

/// User login endpoint
pub async fn sign_in(
    State(state): State<AppState>,
    AuthJson(payload): AuthJson<Credentials>,
) -> Result<Json<AccessTokenResponse>, AuthError> {
    info!("Login attempt for user: {}", payload.username);

    let token = state.auth_service.sign_in(payload).await?;

    Ok(Json(AccessTokenResponse {
        access_token: token.access_token,
    }))
}
