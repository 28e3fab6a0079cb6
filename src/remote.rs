//! Cached snapshot of the suite's own marketplace listing.
//!
//! The injected suggestion card is built on top of the suite's real
//! listing record (banners, ratings, install counts) so it renders like
//! any other result. The record is fetched from the remote marketplace
//! service at most once per day and treated as an opaque field mapping.
//!
//! A failed or timed-out fetch degrades to "no template": the surrounding
//! search pipeline must keep working, it just injects nothing.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde_json::{Map, Value};

use crate::config::RemoteConfig;
use crate::store::KvStore;

/// Cache record key for the fetched listing mapping.
pub const REMOTE_TEMPLATE_KEY: &str = "remote_template";

/// Field subset requested from the marketplace service. Versions and
/// long-form sections are deliberately absent — the card never shows them.
const REQUESTED_FIELDS: &str = "banners,reviews,active_installs";

#[derive(Clone)]
pub struct TemplateCache {
    kv: Arc<dyn KvStore>,
    http: reqwest::Client,
    endpoint: String,
    listing_slug: String,
    cache_ttl: Duration,
}

impl TemplateCache {
    pub fn new(remote: &RemoteConfig, kv: Arc<dyn KvStore>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(remote.timeout_secs))
            .build()?;

        Ok(Self {
            kv,
            http,
            endpoint: remote.endpoint.clone(),
            listing_slug: remote.listing_slug.clone(),
            cache_ttl: Duration::from_secs(remote.cache_ttl_secs),
        })
    }

    /// Returns the listing mapping, from cache when fresh.
    ///
    /// A cached object is returned without any network call. On a cache
    /// miss (absent, expired, or a non-object sentinel left by an older
    /// writer) the listing is fetched and cached for the configured TTL.
    /// Any fetch failure yields `None`; it is never an error.
    pub async fn get(&self) -> Option<Map<String, Value>> {
        if let Ok(Some(Value::Object(cached))) = self.kv.get(REMOTE_TEMPLATE_KEY).await {
            return Some(cached);
        }

        let fetched = self.fetch().await.ok()?;

        // Best effort: a failed cache write only costs a refetch next time.
        let _ = self
            .kv
            .set(
                REMOTE_TEMPLATE_KEY,
                &Value::Object(fetched.clone()),
                Some(self.cache_ttl),
            )
            .await;

        Some(fetched)
    }

    async fn fetch(&self) -> Result<Map<String, Value>> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("slug", self.listing_slug.as_str()),
                ("fields", REQUESTED_FIELDS),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: Value = response.json().await?;
        match body {
            Value::Object(map) => Ok(map),
            other => anyhow::bail!("listing response is not an object: {}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryKv;

    fn remote_config(endpoint: &str) -> RemoteConfig {
        RemoteConfig {
            endpoint: endpoint.to_string(),
            listing_slug: "acme-suite".to_string(),
            timeout_secs: 1,
            cache_ttl_secs: 86_400,
        }
    }

    #[tokio::test]
    async fn cached_object_is_served_without_fetching() {
        let kv = Arc::new(InMemoryKv::new());
        kv.set(
            REMOTE_TEMPLATE_KEY,
            &serde_json::json!({"rating": 98, "active_installs": 5_000_000}),
            None,
        )
        .await
        .unwrap();

        // Unroutable endpoint: any network attempt would fail.
        let cache = TemplateCache::new(&remote_config("http://127.0.0.1:1/info"), kv).unwrap();
        let template = cache.get().await.unwrap();
        assert_eq!(template["rating"], 98);
    }

    #[tokio::test]
    async fn failed_fetch_degrades_to_none() {
        let kv = Arc::new(InMemoryKv::new());
        let cache = TemplateCache::new(&remote_config("http://127.0.0.1:1/info"), kv).unwrap();
        assert!(cache.get().await.is_none());
    }

    #[tokio::test]
    async fn non_object_sentinel_is_treated_as_a_miss() {
        let kv = Arc::new(InMemoryKv::new());
        kv.set(REMOTE_TEMPLATE_KEY, &serde_json::json!("error"), None)
            .await
            .unwrap();

        let cache = TemplateCache::new(&remote_config("http://127.0.0.1:1/info"), kv).unwrap();
        // Sentinel forces a refetch, which fails here, so the result is None
        // rather than the sentinel value.
        assert!(cache.get().await.is_none());
    }
}
