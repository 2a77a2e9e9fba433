//! Server state and configuration.

use std::path::PathBuf;

use crate::error::KnitError;
use crate::store::ProjectStore;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "127.0.0.1:3000")
    pub listen_addr: String,
    /// Directory holding one JSON file per project (e.g., "data/projects")
    pub data_dir: PathBuf,
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    pub store: ProjectStore,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Result<Self, KnitError> {
        let store = ProjectStore::open(&config.data_dir)?;
        Ok(Self { config, store })
    }
}
