//! # Userdir Server Binary
//!
//! Main entrypoint for the userdir directory service.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use userdir_bin::seed;
use userdir_config::load_or_default;
use userdir_store::StorageFactory;

#[derive(Parser, Debug)]
#[command(name = "userdir")]
#[command(about = "Userdir directory service", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Server port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    // Initialize observability
    userdir_observe::init()?;

    tracing::info!("Starting userdir directory service");

    // Load configuration
    let mut config = load_or_default(&args.config);

    // Override with CLI args
    if let Some(port) = args.port {
        config.server.port = port;
    }

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        std::process::exit(1);
    }

    let config = Arc::new(config);

    // Initialize storage backend
    let client = StorageFactory::from_str(
        &config.store.backend,
        config.store.connection_string.clone(),
    )
    .await?;
    tracing::info!(backend = %config.store.backend, "Storage backend initialized");

    // Ensure the default records exist
    if config.store.seed_defaults {
        seed::seed_default_users(&client).await?;
    }

    // Start API server
    tracing::info!("Starting API server on {}:{}", config.server.host, config.server.port);

    userdir_api::serve(client, config).await?;

    Ok(())
}
