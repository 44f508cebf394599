//! Common test utilities

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

const SCHEMA_SQL: &str = include_str!("../../migrations/create_tables.sql");

/// Connect to the test database and make sure the ledger schema exists.
///
/// Tests operate on freshly generated user ids, so no truncation is
/// needed and tests can run in parallel against one database.
pub async fn setup_test_db() -> PgPool {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for tests");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    // Schema creation is idempotent (CREATE TABLE IF NOT EXISTS); errors
    // are ignored because parallel tests race the first creation
    for statement in SCHEMA_SQL.split(';') {
        let trimmed = statement.trim();
        if !trimmed.is_empty() {
            sqlx::query(trimmed).execute(&pool).await.ok();
        }
    }

    sqlx::query("SELECT 1 FROM wallets LIMIT 1")
        .execute(&pool)
        .await
        .expect("Ledger schema missing after setup");

    pool
}
