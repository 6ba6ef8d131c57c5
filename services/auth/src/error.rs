//! Authentication error types

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::DatabaseError;
use thiserror::Error;
use tracing::error;

/// Errors produced by the credential store, hasher, token service and
/// authentication service.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Registration conflicted with an existing username
    #[error("username already exists")]
    DuplicateUsername,

    /// Unknown username or wrong password; the two are never distinguished
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Username or password was empty
    #[error("username and password are required")]
    MissingCredentials,

    /// Signup input failed validation
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Token signature did not verify against the signing secret
    #[error("invalid token signature")]
    InvalidSignature,

    /// Token signature is valid but the token is past its expiry
    #[error("token has expired")]
    Expired,

    /// Token does not have the expected structure
    #[error("malformed token")]
    Malformed,

    /// Any unexpected persistence failure
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[source] DatabaseError),

    /// Password hashing or token signing failed
    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl AuthError {
    /// Whether this error came from verifying a session token
    pub fn is_token_error(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidSignature | AuthError::Expired | AuthError::Malformed
        )
    }
}

impl From<DatabaseError> for AuthError {
    fn from(err: DatabaseError) -> Self {
        if err.is_unique_violation() {
            AuthError::DuplicateUsername
        } else {
            AuthError::StorageUnavailable(err)
        }
    }
}

/// Type alias for authentication results
pub type AuthResult<T> = Result<T, AuthError>;

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AuthError::DuplicateUsername => (StatusCode::CONFLICT, "Username already exists"),
            AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid credentials"),
            AuthError::MissingCredentials => {
                (StatusCode::BAD_REQUEST, "Username and password are required")
            }
            AuthError::InvalidInput(message) => (StatusCode::BAD_REQUEST, message.as_str()),
            AuthError::InvalidSignature | AuthError::Expired | AuthError::Malformed => {
                (StatusCode::UNAUTHORIZED, "Unauthorized")
            }
            AuthError::StorageUnavailable(_) | AuthError::Crypto(_) => {
                error!("Authentication request failed: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(serde_json::json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
