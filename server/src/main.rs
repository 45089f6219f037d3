//! Filmstore catalog server
//!
//! REST backend for the film catalog: actors, films and reviews over a
//! document store.

use clap::{Arg, Command};
use tokio::signal;

use filmstore_core::core::{config, factory::create_app_state};
use filmstore_core::{log_info, log_warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let matches = Command::new("filmstore")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Filmstore catalog REST backend")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path"),
        )
        .get_matches();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    log_info!("Starting filmstore catalog server");

    // Load configuration
    let config_path = matches.get_one::<String>("config").map(|s| s.as_str());
    let config = config::load_config_or_default(config_path);

    // Create AppState using the factory
    let configured = create_app_state(config)?;
    log_info!("AppState created successfully");

    // Start the HTTP server
    let api_handle: tokio::task::JoinHandle<()> = tokio::spawn(async move {
        filmstore_server::api::server::start_api_server(configured)
            .await
            .expect("HTTP server failed")
    });

    // Wait for shutdown signal
    tokio::select! {
        _ = signal::ctrl_c() => {
            log_warn!("Received shutdown signal");
        }
        _ = api_handle => {
            log_warn!("HTTP server terminated unexpectedly");
        }
    }

    log_info!("Shutdown complete");
    Ok(())
}
