//! Authentication service: registration, login and token checks

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    error::{AuthError, AuthResult},
    jwt::{JwtService, SessionToken},
    models::{Credentials, NewUser, User},
    password,
    repositories::CredentialStore,
};

/// Fixed salt used to spend a hash on unknown usernames.
const DUMMY_SALT: &str = "dGltaW5nLWVxdWFsaXplcg";

/// Orchestrates the credential store, the password hasher and the token
/// service. Holds no per-request state.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    jwt_service: JwtService,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>, jwt_service: JwtService) -> Self {
        Self { store, jwt_service }
    }

    /// Register a new account. Does not log the user in.
    pub async fn sign_up(&self, credentials: Credentials) -> AuthResult<()> {
        let Credentials { username, password } = credentials;
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let (salt, password_hash) = run_blocking(move || {
            let salt = password::generate_salt();
            let password_hash = password::hash_password(&password, &salt)?;
            Ok((salt, password_hash))
        })
        .await?;

        let new_user = NewUser {
            username: username.clone(),
            password_hash,
            salt,
        };

        match self.store.register(new_user).await {
            Ok(user) => {
                info!("Registered user {} ({})", user.username, user.id);
                Ok(())
            }
            Err(AuthError::DuplicateUsername) => {
                warn!("Username '{}' already exists", username);
                Err(AuthError::DuplicateUsername)
            }
            Err(e) => Err(e),
        }
    }

    /// Check credentials and issue a session token.
    ///
    /// An unknown username and a wrong password fail identically.
    pub async fn sign_in(&self, credentials: Credentials) -> AuthResult<SessionToken> {
        let Credentials { username, password } = credentials;
        if username.is_empty() || password.is_empty() {
            warn!("Sign-in attempt for '{}' with empty credentials", username);
            return Err(AuthError::MissingCredentials);
        }

        let user = self.store.find_by_username(&username).await.inspect_err(|_| {
            warn!("Sign-in attempt for '{}' failed on lookup", username);
        })?;

        let verified = match user {
            Some(user) => {
                run_blocking(move || {
                    password::verify_password(&password, &user.salt, &user.password_hash)
                })
                .await
                .inspect_err(|_| {
                    warn!("Sign-in attempt for '{}' failed on verification", username);
                })?
            }
            None => {
                // Spend the same work as a real verification.
                run_blocking(move || password::hash_password(&password, DUMMY_SALT)).await?;
                false
            }
        };

        if !verified {
            warn!("User {} with invalid credentials", username);
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.jwt_service.issue(&username)?;
        debug!("JWT successfully created for user {}", username);

        Ok(token)
    }

    /// Verify a raw bearer token and return the username it names
    pub fn verify_token(&self, raw: &str) -> AuthResult<String> {
        self.jwt_service.verify(raw)
    }

    /// Verify a raw bearer token and resolve the account it belongs to
    pub async fn authenticate(&self, raw: &str) -> AuthResult<User> {
        let username = self.verify_token(raw)?;

        self.store
            .find_by_username(&username)
            .await?
            .ok_or_else(|| {
                warn!("Valid token presented for unknown user {}", username);
                AuthError::InvalidCredentials
            })
    }
}

/// Run CPU-heavy hashing off the async workers.
async fn run_blocking<T, F>(f: F) -> AuthResult<T>
where
    F: FnOnce() -> AuthResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AuthError::Crypto(format!("Hashing task failed: {}", e)))?
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{jwt::JwtConfig, repositories::MemoryCredentialStore};
    use async_trait::async_trait;
    use common::error::DatabaseError;

    /// Credential store whose backend is always down
    pub(crate) struct UnavailableStore;

    #[async_trait]
    impl CredentialStore for UnavailableStore {
        async fn register(&self, _new_user: NewUser) -> AuthResult<User> {
            Err(AuthError::StorageUnavailable(DatabaseError::Configuration(
                "database is down".to_string(),
            )))
        }

        async fn find_by_username(&self, _username: &str) -> AuthResult<Option<User>> {
            Err(AuthError::StorageUnavailable(DatabaseError::Configuration(
                "database is down".to_string(),
            )))
        }
    }

    pub(crate) fn jwt_service() -> JwtService {
        JwtService::new(JwtConfig {
            secret: "service-test-secret".to_string(),
            access_token_expiry: 3600,
        })
        .unwrap()
    }

    fn service() -> (AuthService, MemoryCredentialStore) {
        let store = MemoryCredentialStore::new();
        (
            AuthService::new(Arc::new(store.clone()), jwt_service()),
            store,
        )
    }

    #[tokio::test]
    async fn signup_and_signin_scenario() {
        let (auth, _) = service();

        auth.sign_up(Credentials::new("alice", "Secret123!"))
            .await
            .unwrap();

        let err = auth
            .sign_up(Credentials::new("alice", "Other456!"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::DuplicateUsername));

        let token = auth
            .sign_in(Credentials::new("alice", "Secret123!"))
            .await
            .unwrap();
        assert!(!token.access_token.is_empty());
        assert_eq!(auth.verify_token(&token.access_token).unwrap(), "alice");

        let err = auth
            .sign_in(Credentials::new("alice", "wrong"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn unknown_user_fails_like_wrong_password() {
        let (auth, _) = service();
        auth.sign_up(Credentials::new("alice", "Secret123!"))
            .await
            .unwrap();

        let unknown = auth
            .sign_in(Credentials::new("mallory", "Secret123!"))
            .await
            .unwrap_err();
        let wrong = auth
            .sign_in(Credentials::new("alice", "Secret124!"))
            .await
            .unwrap_err();

        assert!(matches!(unknown, AuthError::InvalidCredentials));
        assert!(matches!(wrong, AuthError::InvalidCredentials));
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn stored_account_never_holds_the_plaintext() {
        let (auth, store) = service();
        auth.sign_up(Credentials::new("alice", "Secret123!"))
            .await
            .unwrap();

        let user = store.find_by_username("alice").await.unwrap().unwrap();
        assert!(!user.password_hash.contains("Secret123!"));
        assert!(!user.salt.is_empty());
    }

    #[tokio::test]
    async fn identical_passwords_get_distinct_salts() {
        let (auth, store) = service();
        auth.sign_up(Credentials::new("alice", "Secret123!"))
            .await
            .unwrap();
        auth.sign_up(Credentials::new("bob", "Secret123!"))
            .await
            .unwrap();

        let alice = store.find_by_username("alice").await.unwrap().unwrap();
        let bob = store.find_by_username("bob").await.unwrap().unwrap();
        assert_ne!(alice.salt, bob.salt);
        assert_ne!(alice.password_hash, bob.password_hash);
    }

    #[tokio::test]
    async fn empty_credentials_are_refused() {
        let (auth, store) = service();

        for (username, password) in [("", "Secret123!"), ("alice", ""), ("", "")] {
            let err = auth
                .sign_up(Credentials::new(username, password))
                .await
                .unwrap_err();
            assert!(matches!(err, AuthError::MissingCredentials));
        }
        assert!(store.is_empty().await);

        let err = auth.sign_in(Credentials::new("alice", "")).await.unwrap_err();
        assert!(matches!(err, AuthError::MissingCredentials));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_signups_have_one_winner() {
        let (auth, store) = service();

        let first = {
            let auth = auth.clone();
            tokio::spawn(
                async move { auth.sign_up(Credentials::new("alice", "Secret123!")).await },
            )
        };
        let second = {
            let auth = auth.clone();
            tokio::spawn(
                async move { auth.sign_up(Credentials::new("alice", "Other456!")).await },
            )
        };

        let results = [first.await.unwrap(), second.await.unwrap()];
        let successes = results.iter().filter(|r| r.is_ok()).count();
        let conflicts = results
            .iter()
            .filter(|r| matches!(r, Err(AuthError::DuplicateUsername)))
            .count();

        assert_eq!(successes, 1);
        assert_eq!(conflicts, 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn authenticate_resolves_the_account() {
        let (auth, _) = service();
        auth.sign_up(Credentials::new("alice", "Secret123!"))
            .await
            .unwrap();
        let token = auth
            .sign_in(Credentials::new("alice", "Secret123!"))
            .await
            .unwrap();

        let user = auth.authenticate(&token.access_token).await.unwrap();
        assert_eq!(user.username, "alice");

        assert!(auth.authenticate("garbage").await.unwrap_err().is_token_error());
    }

    #[tokio::test]
    async fn token_for_a_missing_account_is_refused() {
        let (auth, _) = service();
        let token = auth.jwt_service.issue("ghost").unwrap();

        let err = auth.authenticate(&token.access_token).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn storage_failures_are_not_credential_failures() {
        let auth = AuthService::new(Arc::new(UnavailableStore), jwt_service());

        let err = auth
            .sign_up(Credentials::new("alice", "Secret123!"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::StorageUnavailable(_)));

        let err = auth
            .sign_in(Credentials::new("alice", "Secret123!"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::StorageUnavailable(_)));

        let token = auth.jwt_service.issue("alice").unwrap();
        let err = auth.authenticate(&token.access_token).await.unwrap_err();
        assert!(matches!(err, AuthError::StorageUnavailable(_)));
    }

    #[tokio::test]
    async fn corrupt_stored_salt_is_an_internal_error() {
        let (auth, store) = service();
        store
            .register(NewUser {
                username: "alice".to_string(),
                password_hash: "not-a-digest".to_string(),
                salt: "!!".to_string(),
            })
            .await
            .unwrap();

        let err = auth
            .sign_in(Credentials::new("alice", "Secret123!"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Crypto(_)));
    }
}
