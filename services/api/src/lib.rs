//! Task API
//!
//! Per-user task management behind bearer-token authentication. Every
//! operation is scoped to the caller; see [`scope`].

pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod scope;
pub mod state;
pub mod tasks;

pub use error::{ApiError, ApiResult};
pub use state::AppState;
