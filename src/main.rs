//! Billed server
//!
//! Reads its configuration from the YAML file named by `BILLED_CONFIG`
//! (defaults otherwise), seeds the in-memory store and serves the employee
//! pages.

use anyhow::{Context, Result};
use billed::config::AppConfig;
use billed::server::ServerBuilder;
use billed::storage::{InMemoryStore, fixtures};
use tracing_subscriber::EnvFilter;

const CONFIG_ENV: &str = "BILLED_CONFIG";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("billed=info,tower_http=info")),
        )
        .init();

    let config = match std::env::var(CONFIG_ENV) {
        Ok(path) => AppConfig::from_yaml_file(&path)
            .with_context(|| format!("loading configuration from {}", path))?,
        Err(_) => AppConfig::default(),
    };

    let store = InMemoryStore::new(&config.store.receipt_base_url);
    if config.store.seed_fixtures {
        let bills = fixtures::bills();
        tracing::info!(count = bills.len(), "seeding sample bills");
        store.seed(bills)?;
    }

    ServerBuilder::new()
        .with_config(config)
        .with_in_memory_store(store)
        .serve()
        .await
}
