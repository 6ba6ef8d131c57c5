//! Integration tests for the infrastructure components
//!
//! These tests verify that PostgreSQL is reachable, that the embedded
//! migrations apply, and that unique violations are classified. They are
//! skipped when `DATABASE_URL` is not set.

use common::{
    database::{DatabaseConfig, health_check, init_pool, run_migrations},
    error::DatabaseError,
};
use sqlx::Row;

#[tokio::test]
async fn test_infrastructure_integration() -> Result<(), Box<dyn std::error::Error>> {
    let Ok(db_config) = DatabaseConfig::from_env() else {
        return Ok(());
    };
    let pool = init_pool(&db_config).await?;

    assert!(health_check(&pool).await?, "Database health check failed");

    let row = sqlx::query("SELECT 1 as result").fetch_one(&pool).await?;
    let result: i32 = row.get("result");
    assert_eq!(result, 1, "PostgreSQL simple query test failed");

    run_migrations(&pool).await?;

    // Two inserts with the same username must trip the unique constraint.
    let username = format!("infra_{}", std::process::id());
    let insert = r#"
        INSERT INTO users (id, username, password_hash, salt)
        VALUES (gen_random_uuid(), $1, 'hash', 'salt')
    "#;
    sqlx::query(insert).bind(&username).execute(&pool).await?;
    let err = sqlx::query(insert)
        .bind(&username)
        .execute(&pool)
        .await
        .map_err(DatabaseError::from_query)
        .expect_err("duplicate username must be rejected");
    assert!(err.is_unique_violation());

    sqlx::query("DELETE FROM users WHERE username = $1")
        .bind(&username)
        .execute(&pool)
        .await?;

    Ok(())
}
