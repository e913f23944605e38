//! Bazaar application binary - composition root.
//!
//! Ties together all bazaar crates into a single executable:
//! 1. Load configuration from TOML, apply env overrides, validate
//! 2. Open the SQLite product store
//! 3. Build the conversational core (matcher, resolver, hosted generator)
//! 4. Start the axum REST API server

mod cli;

use std::path::Path;
use std::sync::Arc;

use clap::Parser;

use bazaar_api::{routes, AppState};
use bazaar_chat::{HostedGenerator, QueryRouter};
use bazaar_core::config::BazaarConfig;
use bazaar_storage::{Database, ProductRepository};

use cli::CliArgs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Tracing.
    let default_level = args.log_level.clone().unwrap_or_else(|| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    tracing::info!("Starting bazaar v{}", env!("CARGO_PKG_VERSION"));

    // Config. Priority: CLI args > env vars > config file > defaults.
    let config_file = args.resolve_config_path();
    let mut config = BazaarConfig::load_or_default(&config_file);
    config.apply_env_overrides();
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref db) = args.database {
        config.storage.database_path = db.to_string_lossy().to_string();
    }
    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Invalid configuration — refusing to start");
        return Err(e.into());
    }
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    // Storage.
    let db = Database::open(Path::new(&config.storage.database_path))?;
    tracing::info!(path = %config.storage.database_path, "SQLite database opened");
    let products = Arc::new(ProductRepository::new(Arc::new(db)));

    // Conversational core. The generator credential was checked above, so
    // an inference failure here surfaces per request, not at startup.
    let generator = Arc::new(HostedGenerator::new(
        config.generator.endpoint.clone(),
        config.generator.api_key.clone(),
    ));
    let router = Arc::new(
        QueryRouter::new(Arc::clone(&products), generator)
            .with_context_tokens(config.chat.context_tokens),
    );

    // API server.
    let state = AppState::new(products, router);
    routes::start_server(&config, state).await?;

    Ok(())
}
