#![cfg(test)]
use tokio::sync::OnceCell;
use sea_orm::DatabaseConnection;
use migration::MigratorTrait;
use models::db::connect_with_config;

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<()> = OnceCell::const_new();

fn test_config() -> Option<configs::DatabaseConfig> {
    let url = std::env::var("DATABASE_URL").ok()?;
    Some(configs::DatabaseConfig { url, min_connections: 1, ..configs::DatabaseConfig::default() })
}

/// Migrated connection for DB-backed tests, `None` when `SKIP_DB_TESTS` is
/// set or no `DATABASE_URL` is configured.
pub async fn get_db() -> Result<Option<DatabaseConnection>, anyhow::Error> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(None);
    }
    let Some(cfg) = test_config() else {
        eprintln!("skip: DATABASE_URL not set");
        return Ok(None);
    };

    // Run migrations exactly once, with a throwaway connection
    MIGRATED
        .get_or_init(|| async {
            let db = connect_with_config(&cfg).await.expect("connect db for migration");
            migration::Migrator::up(&db, None).await.expect("migrate up");
            drop(db);
        })
        .await;

    // Return a fresh connection for the current test's runtime
    let db = connect_with_config(&cfg).await?;
    Ok(Some(db))
}
