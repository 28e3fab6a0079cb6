//! In-memory [`KvStore`] implementation for testing.
//!
//! Uses a `HashMap` behind `std::sync::RwLock` for thread safety. Expiry
//! is checked lazily on read.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::KvStore;

struct StoredRecord {
    value: serde_json::Value,
    expires_at: Option<DateTime<Utc>>,
}

/// In-memory store for tests and ephemeral deployments.
pub struct InMemoryKv {
    records: RwLock<HashMap<String, StoredRecord>>,
}

impl InMemoryKv {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryKv {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KvStore for InMemoryKv {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let records = self.records.read().unwrap();
        Ok(records.get(key).and_then(|r| {
            if r.expires_at.is_some_and(|at| at <= Utc::now()) {
                None
            } else {
                Some(r.value.clone())
            }
        }))
    }

    async fn set(
        &self,
        key: &str,
        value: &serde_json::Value,
        ttl: Option<Duration>,
    ) -> Result<()> {
        let expires_at = match ttl {
            Some(ttl) => Some(Utc::now() + chrono::Duration::from_std(ttl)?),
            None => None,
        };

        let mut records = self.records.write().unwrap();
        records.insert(
            key.to_string(),
            StoredRecord {
                value: value.clone(),
                expires_at,
            },
        );
        Ok(())
    }
}
