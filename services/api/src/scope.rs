//! Per-user access scoping for tasks
//!
//! Every task query and mutation is bound to the authenticated [`Identity`].
//! A task owned by someone else is indistinguishable from one that does not
//! exist.

use auth::models::User;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{CreateTaskRequest, Task, TaskStatus},
};

/// The authenticated caller, resolved from its bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub username: String,
}

impl From<User> for Identity {
    fn from(user: User) -> Self {
        Identity {
            user_id: user.id,
            username: user.username,
        }
    }
}

/// Caller-supplied listing filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub search: Option<String>,
}

/// A listing predicate bound to one owner
///
/// Reads as `owner_id = owner AND [status = s] AND [(title ~ q OR description ~ q)]`
/// where `~` is a case-insensitive substring match.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskScope {
    pub owner_id: Uuid,
    pub status: Option<TaskStatus>,
    pub search: Option<String>,
}

impl TaskScope {
    pub fn matches(&self, task: &Task) -> bool {
        if task.owner_id != self.owner_id {
            return false;
        }

        if let Some(status) = self.status {
            if task.status != status {
                return false;
            }
        }

        match &self.search {
            Some(term) => {
                let term = term.to_lowercase();
                task.title.to_lowercase().contains(&term)
                    || task.description.to_lowercase().contains(&term)
            }
            None => true,
        }
    }
}

/// A new task with its owner stamped from the identity
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedTask {
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
}

/// Bind a listing filter to the caller
pub fn scoped_filter(identity: &Identity, filter: TaskFilter) -> TaskScope {
    let search = filter
        .search
        .map(|term| term.trim().to_string())
        .filter(|term| !term.is_empty());

    TaskScope {
        owner_id: identity.user_id,
        status: filter.status,
        search,
    }
}

/// Succeeds only when the record belongs to the caller
pub fn assert_ownership(identity: &Identity, owner_id: Uuid) -> ApiResult<()> {
    if identity.user_id == owner_id {
        Ok(())
    } else {
        Err(ApiError::NotFound)
    }
}

/// Attach the caller as owner of a new task, ignoring any `owner_id` in the request
pub fn stamp_owner(identity: &Identity, request: CreateTaskRequest) -> OwnedTask {
    OwnedTask {
        owner_id: identity.user_id,
        title: request.title,
        description: request.description,
    }
}
