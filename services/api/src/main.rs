use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use api::{repositories::TaskRepository, routes, state::AppState, tasks::TaskService};
use auth::{
    config::ServiceConfig, jwt::JwtService, repositories::UserRepository, service::AuthService,
};
use common::database;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting API service");

    let config = ServiceConfig::from_env("API_LISTEN_ADDR", "0.0.0.0:3001")?;

    // Initialize database connection pool
    let pool = database::init_pool(&config.database).await?;

    // Check database connectivity
    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    database::run_migrations(&pool).await?;

    let jwt_service = JwtService::new(config.jwt)?;
    let auth_service = AuthService::new(Arc::new(UserRepository::new(pool.clone())), jwt_service);
    let task_service = TaskService::new(Arc::new(TaskRepository::new(pool)));

    info!("API service initialized successfully");

    let app = routes::create_router(AppState {
        auth_service,
        task_service,
    });

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!("API service listening on {}", config.listen_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
