//! Key-value persistence abstraction.
//!
//! The [`KvStore`] trait is the only storage interface the engine uses:
//! named JSON records with an optional time-to-live. The dismissal set and
//! the remote template cache are both plain records behind it, keeping the
//! core agnostic to the actual backend (SQLite in production, in-memory
//! for tests).
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;
pub mod sqlite;

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Abstract key-value backend.
///
/// All operations are async (via `async-trait`); in-memory implementations
/// return immediately-ready futures.
///
/// # Semantics
///
/// - [`get`](KvStore::get) returns `None` for missing *and* expired
///   records; callers never observe stale values.
/// - [`set`](KvStore::set) overwrites unconditionally. A `ttl` of `None`
///   means the record never expires.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Read the record stored under `key`, if present and unexpired.
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>>;

    /// Write `value` under `key`, optionally expiring after `ttl`.
    async fn set(&self, key: &str, value: &serde_json::Value, ttl: Option<Duration>)
        -> Result<()>;
}
