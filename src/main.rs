//! # Legal Search Server Main Driver
//!
//! ## Purpose
//! Main entry point for the unified legal search server. Loads
//! configuration, initializes logging, loads the document collections, and
//! starts the web server for handling search requests.
//!
//! ## Architecture Flow
//! 1. Parse command line arguments and load configuration
//! 2. Initialize logging and tracing
//! 3. Load document collections from the configured data directory
//! 4. Initialize the search engine
//! 5. Start the web API server
//! 6. Handle shutdown signals gracefully

use clap::{Arg, Command};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use unified_legal_search::api::ApiServer;
use unified_legal_search::config::Config;
use unified_legal_search::errors::Result;
use unified_legal_search::search::SearchEngine;
use unified_legal_search::store::memory::MemoryStore;
use unified_legal_search::{AppState, Collection};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("legal-search-server")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Legal Search Team")
        .about("Cross-source legal search engine with tolerant query normalization")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("config.toml"),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Server port")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("check-health")
                .long("check-health")
                .help("Validate configuration and data files, then exit")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    // Load configuration
    let config_path = matches.get_one::<String>("config").unwrap();
    let mut config = Config::from_file(config_path)?;

    if let Some(port) = matches.get_one::<u16>("port") {
        config.server.port = *port;
    }

    let config = Arc::new(config);

    init_logging(&config);

    info!("Starting Legal Search Server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration loaded from: {}", config_path);

    if matches.get_flag("check-health") {
        return run_health_checks(&config);
    }

    // Initialize application components
    let app_state = initialize_components(config.clone())?;

    // Start the API server
    let server = ApiServer::new(app_state);
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server.run().await {
            error!("Server error: {}", e);
        }
    });

    info!(
        "Legal Search Server started on {}:{}",
        config.server.host, config.server.port
    );

    // Wait for shutdown signal
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = server_handle => {
            warn!("Server stopped unexpectedly");
        }
    }

    info!("Legal Search Server shut down");
    Ok(())
}

/// Initialize logging and tracing
fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));

    if config.logging.json_format {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}

/// Initialize all application components
fn initialize_components(config: Arc<Config>) -> Result<AppState> {
    info!("Loading collections from {:?}", config.store.data_dir);
    let store = Arc::new(MemoryStore::from_dir(&config.store.data_dir)?);

    for collection in [
        Collection::ScCases,
        Collection::HcCases,
        Collection::CentralActs,
        Collection::StateActs,
    ] {
        info!("{}: {} records", collection, store.len(collection));
    }

    let engine = Arc::new(SearchEngine::new(store, config.clone()));

    Ok(AppState { config, engine })
}

/// Validate configuration and data files, then exit
fn run_health_checks(config: &Config) -> Result<()> {
    info!("Running health checks...");

    if !config.store.data_dir.exists() {
        warn!(
            "Data directory {:?} does not exist; all collections will be empty",
            config.store.data_dir
        );
    }

    // Loading exercises every data file end to end
    let store = MemoryStore::from_dir(&config.store.data_dir)?;
    let total: usize = [
        Collection::ScCases,
        Collection::HcCases,
        Collection::CentralActs,
        Collection::StateActs,
    ]
    .iter()
    .map(|c| store.len(*c))
    .sum();

    info!("All health checks passed ({} records loaded)", total);
    Ok(())
}
