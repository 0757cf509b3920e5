//! # Zip Search Server Main Driver
//!
//! ## Purpose
//! Entry point for the zip code search server. Loads configuration, builds
//! the in-memory index from the dataset exactly once, then serves queries
//! until shutdown.
//!
//! ## Architecture Flow
//! 1. Parse command line arguments and load configuration
//! 2. Initialize logging and tracing
//! 3. Build the index from the CSV feed (fatal on failure — the server
//!    never starts over a partial index)
//! 4. Start the web API server
//! 5. Handle shutdown signals gracefully

use clap::{Arg, Command};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use zip_trie_search::{
    api::ApiServer,
    config::Config,
    errors::{Result, SearchError},
    ingestion::{CsvFeed, IndexBuilder},
    AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("zip-search-server")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Postal code lookup service with trie-backed city prefix search")
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
            Arg::new("data")
                .short('d')
                .long("data")
                .value_name("FILE")
                .help("Dataset file path (overrides configuration)"),
        )
        .get_matches();

    // Load configuration
    let config_path = matches.get_one::<String>("config").unwrap();
    let mut config = Config::from_file(config_path)?;

    // Apply command line overrides
    if let Some(port) = matches.get_one::<u16>("port") {
        config.server.port = *port;
    }
    if let Some(data_path) = matches.get_one::<String>("data") {
        config.ingestion.dataset_path = data_path.into();
    }

    let config = Arc::new(config);

    init_logging(&config)?;

    info!("Starting zip-search-server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration loaded from: {}", config_path);

    // Build phase: one sequential pass over the feed. Nothing is served
    // until the whole dataset is in memory.
    info!("Loading dataset from {:?}", config.ingestion.dataset_path);
    let feed = CsvFeed::open(&config.ingestion.dataset_path, config.ingestion.delimiter)?;
    let (index, stats) = match IndexBuilder::new().build(feed).await {
        Ok(built) => built,
        Err(e) => {
            error!(category = e.category(), "Index build failed: {}", e);
            return Err(e);
        }
    };

    let app_state = AppState {
        config: config.clone(),
        index: Arc::new(index),
        ingest: Arc::new(stats),
    };

    // Start the API server
    let server = ApiServer::new(app_state);
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server.run().await {
            error!("Server error: {}", e);
        }
    });

    info!(
        "zip-search-server started successfully on {}:{}",
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

    info!("zip-search-server shut down successfully");
    Ok(())
}

/// Initialize logging and tracing
fn init_logging(config: &Config) -> Result<()> {
    let log_level: tracing::Level =
        config.logging.level.parse().map_err(|_| SearchError::Config {
            message: format!("Invalid log level: {}", config.logging.level),
        })?;
    let filter = tracing_subscriber::filter::LevelFilter::from_level(log_level);

    if config.logging.json_format {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .json()
                    .with_filter(filter),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_filter(filter),
            )
            .init();
    }

    info!("Logging initialized with level: {}", config.logging.level);
    Ok(())
}
