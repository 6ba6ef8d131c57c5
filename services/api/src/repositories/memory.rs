//! In-process task store used by tests and local runs

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::TaskStore;
use crate::{
    error::{ApiError, ApiResult},
    models::{Task, TaskChanges, TaskStatus},
    scope::{Identity, OwnedTask, TaskScope, assert_ownership},
};

#[derive(Debug, Clone, Default)]
pub struct MemoryTaskStore {
    tasks: Arc<Mutex<HashMap<Uuid, Task>>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn list(&self, scope: &TaskScope) -> ApiResult<Vec<Task>> {
        let tasks = self.tasks.lock().await;
        let mut matching: Vec<Task> = tasks
            .values()
            .filter(|task| scope.matches(task))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(matching)
    }

    async fn get(&self, identity: &Identity, id: Uuid) -> ApiResult<Task> {
        let tasks = self.tasks.lock().await;
        let task = tasks.get(&id).ok_or(ApiError::NotFound)?;
        assert_ownership(identity, task.owner_id)?;

        Ok(task.clone())
    }

    async fn insert(&self, task: OwnedTask) -> ApiResult<Task> {
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            title: task.title,
            description: task.description,
            status: TaskStatus::Open,
            owner_id: task.owner_id,
            created_at: now,
            updated_at: now,
        };
        self.tasks.lock().await.insert(task.id, task.clone());

        Ok(task)
    }

    async fn update(
        &self,
        identity: &Identity,
        id: Uuid,
        changes: TaskChanges,
    ) -> ApiResult<Task> {
        let mut tasks = self.tasks.lock().await;
        let task = tasks.get_mut(&id).ok_or(ApiError::NotFound)?;
        assert_ownership(identity, task.owner_id)?;
        changes.apply(task, Utc::now());

        Ok(task.clone())
    }

    async fn delete(&self, identity: &Identity, id: Uuid) -> ApiResult<()> {
        let mut tasks = self.tasks.lock().await;
        let task = tasks.get(&id).ok_or(ApiError::NotFound)?;
        assert_ownership(identity, task.owner_id)?;
        tasks.remove(&id);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::{TaskFilter, scoped_filter};

    fn identity(name: &str) -> Identity {
        Identity {
            user_id: Uuid::new_v4(),
            username: name.to_string(),
        }
    }

    async fn insert(store: &MemoryTaskStore, owner: &Identity, title: &str) -> Task {
        store
            .insert(OwnedTask {
                owner_id: owner.user_id,
                title: title.to_string(),
                description: String::new(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn foreign_tasks_are_not_found() {
        let store = MemoryTaskStore::new();
        let alice = identity("alice");
        let bob = identity("bob");
        let task = insert(&store, &alice, "alice's").await;

        assert!(matches!(store.get(&bob, task.id).await, Err(ApiError::NotFound)));
        assert!(matches!(
            store.update(&bob, task.id, TaskChanges::default()).await,
            Err(ApiError::NotFound)
        ));
        assert!(matches!(store.delete(&bob, task.id).await, Err(ApiError::NotFound)));

        // Still intact for the owner
        assert_eq!(store.get(&alice, task.id).await.unwrap().title, "alice's");
    }

    #[tokio::test]
    async fn update_and_delete_own_task() {
        let store = MemoryTaskStore::new();
        let alice = identity("alice");
        let task = insert(&store, &alice, "draft").await;
        assert_eq!(task.status, TaskStatus::Open);

        let updated = store
            .update(
                &alice,
                task.id,
                TaskChanges {
                    status: Some(TaskStatus::Done),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, TaskStatus::Done);
        assert_eq!(updated.title, "draft");

        store.delete(&alice, task.id).await.unwrap();
        assert!(matches!(store.get(&alice, task.id).await, Err(ApiError::NotFound)));
    }

    #[tokio::test]
    async fn list_is_scoped_to_owner() {
        let store = MemoryTaskStore::new();
        let alice = identity("alice");
        let bob = identity("bob");
        insert(&store, &alice, "one").await;
        insert(&store, &alice, "two").await;
        insert(&store, &bob, "one").await;

        let scope = scoped_filter(&alice, TaskFilter::default());
        let tasks = store.list(&scope).await.unwrap();
        assert_eq!(tasks.len(), 2);
        assert!(tasks.iter().all(|task| task.owner_id == alice.user_id));
    }
}
