//! Application factory
//!
//! Builds the `AppState` for the backend named in the configuration. The
//! enum wrapper exists so the binary can match once on the concrete
//! storage type and keep the rest of the stack generic.

use std::sync::Arc;

use thiserror::Error;

use crate::core::app_state::AppState;
use crate::core::config::{Config, StorageType};
use crate::log_info;
use crate::store::MemoryStore;

/// AppState factory errors
#[derive(Debug, Error)]
pub enum AppStateFactoryError {
    /// Storage initialization failed
    #[error("storage initialization failed: {0}")]
    StorageInitializationFailed(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    ConfigError(String),
}

/// AppState with its concrete storage backend resolved
pub enum ConfiguredAppState {
    /// Configuration using the in-memory backend
    Memory {
        /// The application state over a MemoryStore
        app_state: AppState<MemoryStore>,
    },
}

impl ConfiguredAppState {
    /// Get the HTTP bind address from config
    pub fn http_addr(&self) -> std::net::SocketAddr {
        match self {
            ConfiguredAppState::Memory { app_state } => app_state.config.server.http_addr,
        }
    }
}

/// Create AppState based on configuration
pub fn create_app_state(config: Config) -> Result<ConfiguredAppState, AppStateFactoryError> {
    log_info!(
        "Creating AppState with storage type: {:?}",
        config.storage.storage_type
    );

    match config.storage.storage_type {
        StorageType::Memory => {
            let store = Arc::new(MemoryStore::new());
            let app_state = AppState::new(store, config);
            log_info!("MemoryStore initialized successfully");
            Ok(ConfiguredAppState::Memory { app_state })
        }
    }
}
