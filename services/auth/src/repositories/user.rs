//! User repository for database operations

use async_trait::async_trait;
use common::error::DatabaseError;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    error::{AuthError, AuthResult},
    models::{NewUser, User},
};

/// Persistence of user accounts
///
/// Implementations enforce username uniqueness themselves; callers never
/// check for an existing username before registering.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Persist a new account, failing with [`AuthError::DuplicateUsername`]
    /// if the username is taken.
    async fn register(&self, new_user: NewUser) -> AuthResult<User>;

    /// Exact, case-sensitive lookup by username
    async fn find_by_username(&self, username: &str) -> AuthResult<Option<User>>;
}

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for UserRepository {
    async fn register(&self, new_user: NewUser) -> AuthResult<User> {
        info!("Creating new user: {}", new_user.username);

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, password_hash, salt)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, password_hash, salt, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_user.username)
        .bind(&new_user.password_hash)
        .bind(&new_user.salt)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_query)
        .map_err(|e| {
            if !e.is_unique_violation() {
                error!("Failed to create user '{}': {}", new_user.username, e);
            }
            AuthError::from(e)
        })?;

        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> AuthResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, salt, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to look up user '{}': {}", username, e);
            AuthError::StorageUnavailable(DatabaseError::Query(e))
        })?;

        Ok(user)
    }
}
