//! # Plugin Hints CLI (`hints`)
//!
//! The `hints` binary is the operator interface for the suggestion engine.
//! It provides commands for database initialization, catalog inspection,
//! matcher dry-runs, dismissals, and starting the HTTP server.
//!
//! ## Usage
//!
//! ```bash
//! hints --config ./config/hints.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `hints init` | Create the SQLite database and run schema migrations |
//! | `hints catalog` | List the feature catalog in match-priority order |
//! | `hints query "<term>"` | Show which descriptor a search would suggest |
//! | `hints dismiss <id>` | Permanently dismiss one suggestion |
//! | `hints serve` | Start the HTTP server |

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use plugin_hints::config::load_config;
use plugin_hints::db;
use plugin_hints::dismissals::DismissalStore;
use plugin_hints::matcher;
use plugin_hints::migrate;
use plugin_hints::pipeline::HintsContext;
use plugin_hints::server;
use plugin_hints::store::sqlite::SqliteKv;
use plugin_hints::store::KvStore;

/// Plugin Hints CLI — a suggestion-card injection engine for
/// extension-marketplace search results.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/hints.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "hints",
    about = "Plugin Hints — suggestion cards for extension-marketplace search",
    version,
    long_about = "Plugin Hints intercepts extension-marketplace search results and prepends \
    a suggestion card when the query matches a feature the installed suite already provides. \
    Suggestions can be permanently dismissed through a REST endpoint."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/hints.toml`. The catalog, storage, remote
    /// marketplace, and server settings are all read from this file.
    #[arg(long, global = true, default_value = "./config/hints.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file and the key-value record table.
    /// This command is idempotent — running it multiple times is safe.
    Init,

    /// List the feature catalog in match-priority order.
    ///
    /// Shows each descriptor's id, rank, and trigger phrases after
    /// sorting and self-exclusion — exactly the order the matcher walks.
    Catalog,

    /// Show which descriptor a search query would suggest.
    ///
    /// Normalizes the raw query, runs the matcher against the catalog and
    /// the persisted dismissal set, and prints the outcome. Nothing is
    /// written.
    Query {
        /// The raw search query, exactly as a user would type it.
        term: String,
    },

    /// Permanently dismiss one suggestion.
    ///
    /// Adds the descriptor id to the persisted dismissal set. Dismissing
    /// an already-dismissed id succeeds without changing anything.
    Dismiss {
        /// Descriptor id (the dismissal key).
        id: String,
    },

    /// Start the HTTP server.
    ///
    /// Exposes the dismissal endpoint (`POST /hints`) and the
    /// search-result interception endpoint (`POST /search-results`).
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized at {}", cfg.storage.path.display());
        }
        Commands::Catalog => {
            let catalog = plugin_hints::catalog::Catalog::new(cfg.modules.clone())?;
            println!("{:<20} {:>6}  PHRASES", "ID", "RANK");
            for entry in catalog.entries() {
                println!(
                    "{:<20} {:>6}  {}",
                    entry.descriptor.id,
                    entry.descriptor.sort_rank,
                    entry.phrases.join(", ")
                );
            }
        }
        Commands::Query { term } => {
            let cfg = Arc::new(cfg);
            let kv: Arc<dyn KvStore> = Arc::new(SqliteKv::new(db::connect(&cfg).await?));
            let ctx = HintsContext::new(cfg, kv)?;

            let normalized = ctx.normalizer().normalize(&term);
            let dismissed = ctx.dismissals().dismissed().await;
            println!("Normalized term: {:?}", normalized);

            match matcher::select(&normalized, ctx.catalog(), &dismissed) {
                Some(descriptor) => {
                    println!("Match: {} ({})", descriptor.id, descriptor.name);
                }
                None => println!("No suggestion for this query."),
            }
        }
        Commands::Dismiss { id } => {
            let catalog = plugin_hints::catalog::Catalog::new(cfg.modules.clone())?;
            if !catalog.contains(&id) {
                anyhow::bail!("'{}' is not a registered module id", id);
            }

            let kv: Arc<dyn KvStore> = Arc::new(SqliteKv::new(db::connect(&cfg).await?));
            let store = DismissalStore::new(kv);
            if store.dismiss(&id).await {
                println!("Dismissed '{}'", id);
            } else {
                anyhow::bail!("The card could not be dismissed");
            }
        }
        Commands::Serve => {
            let cfg = Arc::new(cfg);
            let kv: Arc<dyn KvStore> = Arc::new(SqliteKv::new(db::connect(&cfg).await?));
            let ctx = Arc::new(HintsContext::new(cfg, kv)?);
            server::run_server(ctx).await?;
        }
    }

    Ok(())
}
