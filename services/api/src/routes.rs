//! API service routes

use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, patch},
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    AppState,
    error::ApiError,
    extract::{AppJson, AppPath, AppQuery},
    middleware::auth_middleware,
    models::{CreateTaskRequest, Task, TaskQuery, UpdateStatusRequest, UpdateTaskRequest},
    scope::Identity,
};

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let task_routes = Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/:id",
            get(get_task).patch(update_task).delete(delete_task),
        )
        .route("/tasks/:id/status", patch(update_task_status))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(task_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "api-service"
    }))
}

/// List the caller's tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    AppQuery(query): AppQuery<TaskQuery>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = state.task_service.list(&identity, query).await?;
    Ok(Json(tasks))
}

/// Create a task owned by the caller
pub async fn create_task(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    AppJson(payload): AppJson<CreateTaskRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let task = state.task_service.create(&identity, payload).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// Get a task by ID
pub async fn get_task(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Task>, ApiError> {
    let task = state.task_service.get(&identity, id).await?;
    Ok(Json(task))
}

pub async fn update_task(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateTaskRequest>,
) -> Result<Json<Task>, ApiError> {
    let task = state.task_service.update(&identity, id, payload).await?;
    Ok(Json(task))
}

pub async fn update_task_status(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateStatusRequest>,
) -> Result<Json<Task>, ApiError> {
    let task = state
        .task_service
        .update_status(&identity, id, payload)
        .await?;
    Ok(Json(task))
}

/// Delete a task by ID
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.task_service.delete(&identity, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
