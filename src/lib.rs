//! # Plugin Hints
//!
//! A suggestion-card injection engine for extension-marketplace search
//! results.
//!
//! When an administrator searches a third-party marketplace for something
//! the installed suite already does, Plugin Hints composes a suggestion
//! card from the suite's own marketplace listing and prepends it to the
//! result list. Any suggestion can be permanently dismissed through a
//! single REST mutation.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   ┌──────────┐   ┌─────────────┐
//! │ Normalizer │──▶│ Matcher  │──▶│  Injector    │
//! │ raw → term │   │ catalog  │   │ template +   │
//! └────────────┘   │ dismiss  │   │ descriptor   │
//!                  └────┬─────┘   └──────┬──────┘
//!                       │                │
//!                  ┌────▼─────┐   ┌──────▼──────┐
//!                  │  SQLite  │   │  Remote      │
//!                  │  KV set  │   │  listing     │
//!                  └──────────┘   │  (24h cache) │
//!                                 └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! hints init                      # create database
//! hints catalog                   # show the sorted feature catalog
//! hints query "backup"            # dry-run the matcher
//! hints dismiss backup            # hide a suggestion permanently
//! hints serve                     # start the HTTP server
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`normalize`] | Search-term normalization |
//! | [`catalog`] | Priority-ordered feature catalog |
//! | [`matcher`] | Exact-phrase match selection |
//! | [`dismissals`] | Persisted dismissal state |
//! | [`remote`] | Remote listing template cache |
//! | [`inject`] | Card composition and list injection |
//! | [`pipeline`] | The interception transform |
//! | [`server`] | HTTP server (`/hints`, `/search-results`) |
//! | [`store`] | Key-value persistence abstraction |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |

pub mod catalog;
pub mod config;
pub mod db;
pub mod dismissals;
pub mod inject;
pub mod matcher;
pub mod migrate;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod remote;
pub mod server;
pub mod store;
