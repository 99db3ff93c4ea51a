//! Database module
//!
//! Database connection and schema verification utilities.
//! Note: We use raw SQL files in migrations/ directory.

use sqlx::PgPool;

/// Simple connectivity check
pub async fn verify_connection(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;

    Ok(())
}

/// Check if required tables exist
pub async fn check_schema(pool: &PgPool) -> Result<bool, sqlx::Error> {
    let required_tables = vec![
        "accounts",
        "catalog_items",
        "purchases",
        "transfers",
        "sessions",
    ];

    for table in required_tables {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM information_schema.tables
                WHERE table_schema = 'public' AND table_name = $1
            )
            "#,
        )
        .bind(table)
        .fetch_one(pool)
        .await?;

        if !exists {
            tracing::error!("Required table '{}' does not exist", table);
            return Ok(false);
        }
    }

    if !check_catalog_seed(pool).await? {
        return Ok(false);
    }

    Ok(true)
}

/// Check that the catalog has been seeded
async fn check_catalog_seed(pool: &PgPool) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM catalog_items")
        .fetch_one(pool)
        .await?;

    if count == 0 {
        tracing::error!("Catalog is empty. Please run database seed.");
        return Ok(false);
    }

    tracing::info!("Catalog verified: {} item types", count);
    Ok(true)
}
