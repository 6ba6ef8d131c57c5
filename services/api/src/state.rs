//! Application state shared across handlers

use auth::AuthService;

use crate::tasks::TaskService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub task_service: TaskService,
}
