//! Authentication core for the task tracker
//!
//! Salted password hashing, credential storage, session token issuance and
//! verification, and the authentication service tying them together. The
//! `auth` binary serves `/auth/signup` and `/auth/signin`; the `api` service
//! resolves bearer tokens through [`AuthService::authenticate`].

pub mod config;
pub mod error;
pub mod extract;
pub mod jwt;
pub mod models;
pub mod password;
pub mod repositories;
pub mod routes;
pub mod service;
pub mod state;
pub mod validation;

pub use error::{AuthError, AuthResult};
pub use service::AuthService;
