//! The search-result interception pipeline.
//!
//! [`HintsContext`] wires the catalog, normalizer, dismissal store, and
//! template cache into one explicit context object constructed at startup
//! and shared via `Arc` — there is no global singleton. The host plugs
//! [`HintsContext::augment`] into its marketplace-search pipeline as a
//! `(result_list, query_context) -> result_list` transform; it may be
//! neither the first nor the last transform applied.
//!
//! Every "nothing to inject" outcome — empty query, later page, no match,
//! dismissed match, missing template — returns the input list unchanged
//! and is indistinguishable from success.

use std::sync::Arc;

use anyhow::Result;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::dismissals::DismissalStore;
use crate::inject;
use crate::matcher;
use crate::models::{QueryContext, ResultList};
use crate::normalize::TermNormalizer;
use crate::remote::TemplateCache;
use crate::store::KvStore;

/// Record key for the best-effort search-term audit counters.
pub const SEARCH_TERMS_KEY: &str = "search_term_counts";

/// Per-process engine context.
pub struct HintsContext {
    config: Arc<Config>,
    catalog: Catalog,
    normalizer: TermNormalizer,
    dismissals: DismissalStore,
    template: TemplateCache,
    kv: Arc<dyn KvStore>,
}

impl HintsContext {
    pub fn new(config: Arc<Config>, kv: Arc<dyn KvStore>) -> Result<Self> {
        let catalog = Catalog::new(config.modules.clone())?;
        let normalizer = TermNormalizer::new(&config.suite);
        let dismissals = DismissalStore::new(kv.clone());
        let template = TemplateCache::new(&config.remote, kv.clone())?;

        Ok(Self {
            config,
            catalog,
            normalizer,
            dismissals,
            template,
            kv,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn normalizer(&self) -> &TermNormalizer {
        &self.normalizer
    }

    pub fn dismissals(&self) -> &DismissalStore {
        &self.dismissals
    }

    /// The interception transform. Returns the (possibly augmented)
    /// result list; it never fails and never reorders existing entries.
    pub async fn augment(&self, results: ResultList, query: &QueryContext) -> ResultList {
        if query.page > 1 || query.search.trim().is_empty() {
            return results;
        }

        self.record_search_term(&query.search).await;

        let term = self.normalizer.normalize(&query.search);
        let dismissed = self.dismissals.dismissed().await;

        let descriptor = match matcher::select(&term, &self.catalog, &dismissed) {
            Some(descriptor) => descriptor,
            None => return results,
        };

        // No template means no card; the original list goes back untouched.
        let template = match self.template.get().await {
            Some(template) => template,
            None => return results,
        };

        inject::inject(results, descriptor, template, &self.config.suite)
    }

    /// Bumps the persisted counter for a raw search term. Best effort:
    /// failures never affect the pipeline.
    async fn record_search_term(&self, raw: &str) {
        let mut counts = match self.kv.get(SEARCH_TERMS_KEY).await {
            Ok(Some(serde_json::Value::Object(map))) => map,
            _ => serde_json::Map::new(),
        };

        let count = counts.get(raw).and_then(|v| v.as_u64()).unwrap_or(0);
        counts.insert(raw.to_string(), serde_json::json!(count + 1));

        let _ = self
            .kv
            .set(SEARCH_TERMS_KEY, &serde_json::Value::Object(counts), None)
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FeatureDescriptor;
    use crate::remote::REMOTE_TEMPLATE_KEY;
    use crate::store::memory::InMemoryKv;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn test_config() -> Config {
        Config {
            storage: crate::config::StorageConfig {
                path: PathBuf::from("/tmp/unused.sqlite"),
            },
            server: crate::config::ServerConfig {
                bind: "127.0.0.1:0".to_string(),
                capability_token: "secret".to_string(),
            },
            remote: crate::config::RemoteConfig {
                // Unroutable: fetch attempts fail fast in tests.
                endpoint: "http://127.0.0.1:1/info".to_string(),
                listing_slug: "acme-suite".to_string(),
                timeout_secs: 1,
                cache_ttl_secs: 86_400,
            },
            suite: crate::config::SuiteConfig {
                name: "Acme Suite".to_string(),
                brand: "acme".to_string(),
                abbreviation: "acm".to_string(),
                platform: "wordpress".to_string(),
                slug: "acme-suite-hints".to_string(),
                icons: BTreeMap::new(),
            },
            modules: vec![
                FeatureDescriptor {
                    id: "backup".to_string(),
                    name: "Backup".to_string(),
                    short_description: "Real-time backups.".to_string(),
                    search_terms: vec!["backup".to_string(), "vaultpress".to_string()],
                    sort_rank: 5,
                    requires_connection: true,
                    configure_url: None,
                    learn_more_url: None,
                },
                FeatureDescriptor {
                    id: "seo".to_string(),
                    name: "SEO Tools".to_string(),
                    short_description: "Search engine optimization.".to_string(),
                    search_terms: vec!["seo".to_string()],
                    sort_rank: 10,
                    requires_connection: false,
                    configure_url: None,
                    learn_more_url: None,
                },
            ],
        }
    }

    async fn context_with_template() -> (HintsContext, Arc<InMemoryKv>) {
        let kv = Arc::new(InMemoryKv::new());
        kv.set(
            REMOTE_TEMPLATE_KEY,
            &serde_json::json!({"rating": 98, "slug": "acme-suite"}),
            None,
        )
        .await
        .unwrap();

        let ctx = HintsContext::new(Arc::new(test_config()), kv.clone()).unwrap();
        (ctx, kv)
    }

    fn host_results() -> ResultList {
        vec![
            serde_json::json!({"slug": "plugin-a"}),
            serde_json::json!({"slug": "plugin-b"}),
        ]
    }

    #[tokio::test]
    async fn matching_query_injects_one_card_at_index_zero() {
        let (ctx, _kv) = context_with_template().await;

        let out = ctx
            .augment(host_results(), &QueryContext::new("Backup!!"))
            .await;

        assert_eq!(out.len(), 3);
        assert_eq!(out[0]["injected"], true);
        assert_eq!(out[0]["name"], "Acme Suite: Backup");
        assert_eq!(out[1]["slug"], "plugin-a");
        assert_eq!(out[2]["slug"], "plugin-b");
    }

    #[tokio::test]
    async fn non_matching_query_returns_list_unchanged() {
        let (ctx, _kv) = context_with_template().await;

        let out = ctx
            .augment(host_results(), &QueryContext::new("newsletter signup"))
            .await;
        assert_eq!(out, host_results());
    }

    #[tokio::test]
    async fn dismissed_descriptor_is_never_suggested_again() {
        let (ctx, _kv) = context_with_template().await;

        assert!(ctx.dismissals().dismiss("backup").await);

        let out = ctx
            .augment(host_results(), &QueryContext::new("Backup!!"))
            .await;
        assert_eq!(out, host_results());
    }

    #[tokio::test]
    async fn missing_template_suppresses_injection() {
        // No cached template and an unroutable endpoint: select() finds a
        // match but the card is never composed.
        let kv = Arc::new(InMemoryKv::new());
        let ctx = HintsContext::new(Arc::new(test_config()), kv).unwrap();

        let out = ctx
            .augment(host_results(), &QueryContext::new("backup"))
            .await;
        assert_eq!(out, host_results());
    }

    #[tokio::test]
    async fn later_pages_are_left_alone() {
        let (ctx, _kv) = context_with_template().await;

        let query = QueryContext {
            search: "backup".to_string(),
            page: 2,
        };
        let out = ctx.augment(host_results(), &query).await;
        assert_eq!(out, host_results());
    }

    #[tokio::test]
    async fn empty_query_is_ignored() {
        let (ctx, _kv) = context_with_template().await;
        let out = ctx.augment(host_results(), &QueryContext::new("   ")).await;
        assert_eq!(out, host_results());
    }

    #[tokio::test]
    async fn noise_only_query_matches_nothing() {
        let (ctx, _kv) = context_with_template().await;
        let out = ctx
            .augment(host_results(), &QueryContext::new("acme free"))
            .await;
        assert_eq!(out, host_results());
    }

    #[tokio::test]
    async fn search_terms_are_recorded() {
        let (ctx, kv) = context_with_template().await;

        ctx.augment(host_results(), &QueryContext::new("backup"))
            .await;
        ctx.augment(host_results(), &QueryContext::new("backup"))
            .await;

        let counts = kv.get(SEARCH_TERMS_KEY).await.unwrap().unwrap();
        assert_eq!(counts["backup"], 2);
    }
}
