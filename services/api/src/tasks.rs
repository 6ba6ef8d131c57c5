//! Task service
//!
//! Validates incoming requests, binds them to the caller's [`Identity`] and
//! delegates to the [`TaskStore`].

use std::sync::Arc;
use tracing::{debug, error};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{
        CreateTaskRequest, Task, TaskChanges, TaskQuery, TaskStatus, UpdateStatusRequest,
        UpdateTaskRequest,
    },
    repositories::TaskStore,
    scope::{Identity, TaskFilter, scoped_filter, stamp_owner},
};

#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// List the caller's tasks, optionally filtered by status and search term
    pub async fn list(&self, identity: &Identity, query: TaskQuery) -> ApiResult<Vec<Task>> {
        debug!(
            "User \"{}\" retrieving tasks. Filters: {:?}",
            identity.username, query
        );

        let filter = TaskFilter {
            status: query.status.as_deref().map(parse_status).transpose()?,
            search: query.search.clone(),
        };

        self.store
            .list(&scoped_filter(identity, filter))
            .await
            .inspect_err(|e| {
                error!(
                    "Failed to get tasks for user \"{}\". Filters: {:?}: {}",
                    identity.username, query, e
                );
            })
    }

    pub async fn get(&self, identity: &Identity, id: Uuid) -> ApiResult<Task> {
        self.store.get(identity, id).await
    }

    /// Create a task owned by the caller with status OPEN
    pub async fn create(&self, identity: &Identity, request: CreateTaskRequest) -> ApiResult<Task> {
        debug!(
            "User \"{}\" creating a new task. Title: {:?}",
            identity.username, request.title
        );

        require_text("title", &request.title)?;
        require_text("description", &request.description)?;

        let title = request.title.clone();
        self.store
            .insert(stamp_owner(identity, request))
            .await
            .inspect_err(|e| {
                error!(
                    "Failed to create task for user \"{}\". Title: {:?}: {}",
                    identity.username, title, e
                );
            })
    }

    /// Apply a partial update to one of the caller's tasks
    pub async fn update(
        &self,
        identity: &Identity,
        id: Uuid,
        request: UpdateTaskRequest,
    ) -> ApiResult<Task> {
        if let Some(title) = &request.title {
            require_text("title", title)?;
        }
        if let Some(description) = &request.description {
            require_text("description", description)?;
        }

        let changes = TaskChanges {
            title: request.title,
            description: request.description,
            status: request.status.as_deref().map(parse_status).transpose()?,
        };

        if changes.is_empty() {
            return Err(ApiError::BadRequest("No fields to update".to_string()));
        }

        self.store.update(identity, id, changes).await
    }

    pub async fn update_status(
        &self,
        identity: &Identity,
        id: Uuid,
        request: UpdateStatusRequest,
    ) -> ApiResult<Task> {
        let changes = TaskChanges {
            status: Some(parse_status(&request.status)?),
            ..Default::default()
        };

        self.store.update(identity, id, changes).await
    }

    pub async fn delete(&self, identity: &Identity, id: Uuid) -> ApiResult<()> {
        self.store.delete(identity, id).await?;
        debug!("User \"{}\" deleted task {}", identity.username, id);
        Ok(())
    }
}

fn parse_status(value: &str) -> ApiResult<TaskStatus> {
    value
        .parse::<TaskStatus>()
        .map_err(|e| ApiError::BadRequest(e.to_string()))
}

fn require_text(field: &str, value: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::BadRequest(format!("{} must not be empty", field)));
    }
    Ok(())
}
