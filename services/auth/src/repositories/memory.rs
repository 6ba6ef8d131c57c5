//! In-process credential store
//!
//! Used by tests and by local runs without PostgreSQL. The uniqueness check
//! and the insert happen under the same lock, which plays the role of the
//! database constraint.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use super::CredentialStore;
use crate::{
    error::{AuthError, AuthResult},
    models::{NewUser, User},
};

/// Credential store keeping accounts in a shared map keyed by username
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    users: Arc<Mutex<HashMap<String, User>>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts
    pub async fn len(&self) -> usize {
        self.users.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn register(&self, new_user: NewUser) -> AuthResult<User> {
        let mut users = self.users.lock().await;
        if users.contains_key(&new_user.username) {
            return Err(AuthError::DuplicateUsername);
        }

        info!("Creating new user: {}", new_user.username);
        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username,
            password_hash: new_user.password_hash,
            salt: new_user.salt,
            created_at: Utc::now(),
        };
        users.insert(user.username.clone(), user.clone());

        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> AuthResult<Option<User>> {
        Ok(self.users.lock().await.get(username).cloned())
    }
}
