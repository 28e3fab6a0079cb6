//! Core data models for the suggestion engine.
//!
//! These types describe the suite's feature catalog and the search-result
//! interception boundary. Marketplace listings themselves are opaque JSON
//! objects — the engine never interprets third-party result entries, it
//! only prepends its own composed card.

use serde::{Deserialize, Serialize};

/// One installed suite capability that may be suggested in marketplace
/// search results.
///
/// Descriptors are supplied by the host configuration as an ordered list;
/// `sort_rank` decides precedence when several descriptors match the same
/// query (lower wins, ties keep registration order).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureDescriptor {
    /// Stable unique identifier, also the dismissal key.
    pub id: String,
    /// Human-readable feature name.
    pub name: String,
    pub short_description: String,
    /// Literal phrases that trigger this descriptor. Lowercased once at
    /// catalog registration; comparison never folds case again.
    #[serde(default)]
    pub search_terms: Vec<String>,
    pub sort_rank: i64,
    #[serde(default)]
    pub requires_connection: bool,
    #[serde(default)]
    pub configure_url: Option<String>,
    #[serde(default)]
    pub learn_more_url: Option<String>,
}

/// Context accompanying one intercepted marketplace search.
///
/// Carries the raw query string plus the page of the paged result set the
/// host is rendering. Suggestions are only injected on the first page.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryContext {
    /// Raw, untrusted search string exactly as the user typed it.
    pub search: String,
    /// 1-based page number of the marketplace result set.
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_page() -> u32 {
    1
}

impl QueryContext {
    pub fn new(search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            page: 1,
        }
    }
}

/// A marketplace result list as received from (and returned to) the host.
/// Entries are opaque listing objects.
pub type ResultList = Vec<serde_json::Value>;
