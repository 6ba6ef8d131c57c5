//! Shared PostgreSQL plumbing for the `auth` and `api` services
//!
//! Pool construction from the environment, embedded schema migrations and the
//! storage error taxonomy both services map into their own errors.
//!
//! ```rust,no_run
//! use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};
//!
//! # async fn start() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DatabaseConfig::from_env()?;
//! let pool = init_pool(&config).await?;
//! run_migrations(&pool).await?;
//! assert!(health_check(&pool).await?);
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod error;
