//! Common test utilities

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

/// Connect to the test database, or None when DATABASE_URL is not set
/// (integration tests are skipped in that case).
pub async fn try_setup_test_db() -> Option<PgPool> {
    dotenvy::dotenv().ok();
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping integration test");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    // Make sure the catalog rows the tests rely on exist
    sqlx::query(
        r#"
        INSERT INTO catalog_items (name, price)
        VALUES ('powerbank', 200), ('cup', 20)
        ON CONFLICT (name) DO NOTHING
        "#,
    )
    .execute(&pool)
    .await
    .expect("Failed to seed catalog");

    Some(pool)
}

/// Unique username per test run so parallel tests never collide.
pub fn unique_username(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4().simple())
}
