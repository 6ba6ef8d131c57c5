use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use auth::{
    config::ServiceConfig, jwt::JwtService, repositories::UserRepository, routes,
    service::AuthService, state::AppState,
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

    info!("Starting authentication service");

    let config = ServiceConfig::from_env("AUTH_LISTEN_ADDR", "0.0.0.0:3000")?;

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
    let user_repository = UserRepository::new(pool);
    let auth_service = AuthService::new(Arc::new(user_repository), jwt_service);

    info!("Authentication service initialized successfully");

    let app = routes::create_router(AppState { auth_service });

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!("Authentication service listening on {}", config.listen_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
