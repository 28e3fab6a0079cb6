//! SQLite-backed [`KvStore`] implementation.
//!
//! Records live in the `kv_records` table created by the `init` migration.
//! Expiry is stored as a unix timestamp and checked on read; expired rows
//! are removed lazily.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};

use super::KvStore;

/// Production store over the shared SQLite pool.
pub struct SqliteKv {
    pool: SqlitePool,
}

impl SqliteKv {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KvStore for SqliteKv {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let row = sqlx::query("SELECT value, expires_at FROM kv_records WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        let row = match row {
            Some(row) => row,
            None => return Ok(None),
        };

        let expires_at: Option<i64> = row.get("expires_at");
        if let Some(at) = expires_at {
            if at <= Utc::now().timestamp() {
                sqlx::query("DELETE FROM kv_records WHERE key = ?")
                    .bind(key)
                    .execute(&self.pool)
                    .await?;
                return Ok(None);
            }
        }

        let raw: String = row.get("value");
        let value = serde_json::from_str(&raw)?;
        Ok(Some(value))
    }

    async fn set(
        &self,
        key: &str,
        value: &serde_json::Value,
        ttl: Option<Duration>,
    ) -> Result<()> {
        let expires_at = ttl.map(|ttl| Utc::now().timestamp() + ttl.as_secs() as i64);
        let raw = serde_json::to_string(value)?;

        sqlx::query(
            "INSERT INTO kv_records (key, value, expires_at) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, expires_at = excluded.expires_at",
        )
        .bind(key)
        .bind(raw)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
