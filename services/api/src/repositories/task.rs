//! Task repository for database operations

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{Task, TaskChanges, TaskStatus},
    scope::{Identity, OwnedTask, TaskScope},
};

const TASK_COLUMNS: &str = "id, title, description, status, owner_id, created_at, updated_at";

/// Persistence of tasks
///
/// Every read and write is restricted to tasks owned by the given identity.
/// Missing and foreign tasks both surface as [`ApiError::NotFound`].
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Tasks matching the scope, newest first
    async fn list(&self, scope: &TaskScope) -> ApiResult<Vec<Task>>;

    async fn get(&self, identity: &Identity, id: Uuid) -> ApiResult<Task>;

    /// Persist a new task with status OPEN
    async fn insert(&self, task: OwnedTask) -> ApiResult<Task>;

    async fn update(
        &self,
        identity: &Identity,
        id: Uuid,
        changes: TaskChanges,
    ) -> ApiResult<Task>;

    async fn delete(&self, identity: &Identity, id: Uuid) -> ApiResult<()>;
}

/// PostgreSQL-backed task repository
#[derive(Clone)]
pub struct TaskRepository {
    pool: PgPool,
}

impl TaskRepository {
    /// Create a new task repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStore for TaskRepository {
    async fn list(&self, scope: &TaskScope) -> ApiResult<Vec<Task>> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {TASK_COLUMNS} FROM tasks WHERE owner_id = "));
        builder.push_bind(scope.owner_id);

        if let Some(status) = scope.status {
            builder.push(" AND status = ").push_bind(status.as_str());
        }

        // Parenthesised so the OR stays inside the owner predicate
        if let Some(term) = &scope.search {
            let pattern = format!("%{}%", escape_like(term));
            builder
                .push(" AND (title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR description ILIKE ")
                .push_bind(pattern)
                .push(")");
        }

        builder.push(" ORDER BY created_at DESC");

        let rows = builder.build().fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| task_from_row(row).map_err(ApiError::from))
            .collect()
    }

    async fn get(&self, identity: &Identity, id: Uuid) -> ApiResult<Task> {
        let row = sqlx::query(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 AND owner_id = $2"
        ))
        .bind(id)
        .bind(identity.user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ApiError::NotFound)?;

        Ok(task_from_row(&row)?)
    }

    async fn insert(&self, task: OwnedTask) -> ApiResult<Task> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO tasks (id, title, description, status, owner_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&task.title)
        .bind(&task.description)
        .bind(TaskStatus::Open.as_str())
        .bind(task.owner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(task_from_row(&row)?)
    }

    async fn update(
        &self,
        identity: &Identity,
        id: Uuid,
        changes: TaskChanges,
    ) -> ApiResult<Task> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE tasks
            SET title = COALESCE($3, title),
                description = COALESCE($4, description),
                status = COALESCE($5, status),
                updated_at = NOW()
            WHERE id = $1 AND owner_id = $2
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(identity.user_id)
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.status.map(|status| status.as_str()))
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ApiError::NotFound)?;

        Ok(task_from_row(&row)?)
    }

    async fn delete(&self, identity: &Identity, id: Uuid) -> ApiResult<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(identity.user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound);
        }

        Ok(())
    }
}

fn task_from_row(row: &PgRow) -> Result<Task, sqlx::Error> {
    let status: String = row.try_get("status")?;
    let status = status
        .parse::<TaskStatus>()
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at")?;

    Ok(Task {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        status,
        owner_id: row.try_get("owner_id")?,
        created_at,
        updated_at,
    })
}

/// Escape LIKE wildcards so the term is matched literally
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
