use anyhow::Result;

use crate::config::Config;
use crate::db;

pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;

    // Single key-value table: dismissal set, remote template cache, and
    // the search-term audit counters are all named records in it.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS kv_records (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            expires_at INTEGER
        )
        "#,
    )
    .execute(&pool)
    .await?;

    pool.close().await;
    Ok(())
}
