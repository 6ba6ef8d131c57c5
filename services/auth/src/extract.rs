//! JSON body extractor rejecting with [`AuthError::InvalidInput`]

use axum::extract::{FromRequest, rejection::JsonRejection};

use crate::error::AuthError;

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AuthError))]
pub struct AuthJson<T>(pub T);

impl From<JsonRejection> for AuthError {
    fn from(rejection: JsonRejection) -> Self {
        AuthError::InvalidInput(rejection.body_text())
    }
}
