use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::models::FeatureDescriptor;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub storage: StorageConfig,
    pub server: ServerConfig,
    pub remote: RemoteConfig,
    pub suite: SuiteConfig,
    /// The feature catalog. Order is significant: it breaks `sort_rank` ties.
    #[serde(default)]
    pub modules: Vec<FeatureDescriptor>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
    /// Bearer token standing in for the host's admin capability check.
    /// Dismissal requests without it are rejected before validation.
    pub capability_token: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RemoteConfig {
    /// Marketplace listing-info endpoint the card template is fetched from.
    pub endpoint: String,
    /// The suite's own listing slug on the remote marketplace.
    pub listing_slug: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_cache_ttl_secs() -> u64 {
    86_400
}

#[derive(Debug, Deserialize, Clone)]
pub struct SuiteConfig {
    /// Display name prefixed onto injected card titles ("Acme: Backup").
    pub name: String,
    /// Brand token stripped from queries during normalization.
    pub brand: String,
    /// Short brand abbreviation, also stripped during normalization.
    pub abbreviation: String,
    /// Host platform name, stripped during normalization.
    pub platform: String,
    /// Slug the injected card carries instead of the listing's own.
    pub slug: String,
    /// Icon URLs overlaid onto the card (keys like "1x", "2x", "svg").
    #[serde(default)]
    pub icons: BTreeMap<String, String>,
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.server.capability_token.trim().is_empty() {
        anyhow::bail!("server.capability_token must not be empty");
    }

    if config.remote.endpoint.trim().is_empty() {
        anyhow::bail!("remote.endpoint must not be empty");
    }

    if config.remote.timeout_secs == 0 {
        anyhow::bail!("remote.timeout_secs must be > 0");
    }

    if config.remote.cache_ttl_secs == 0 {
        anyhow::bail!("remote.cache_ttl_secs must be > 0");
    }

    if config.suite.slug.trim().is_empty() {
        anyhow::bail!("suite.slug must not be empty");
    }

    // Descriptor ids are the dismissal keys; duplicates would make
    // dismissal state ambiguous.
    let mut seen = HashSet::new();
    for module in &config.modules {
        if module.id.trim().is_empty() {
            anyhow::bail!("modules entry with empty id");
        }
        if !seen.insert(module.id.as_str()) {
            anyhow::bail!("Duplicate module id: '{}'", module.id);
        }
    }

    Ok(config)
}
