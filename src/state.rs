//! Shared application state for request handlers.

use std::sync::Arc;

use crate::config::DevConfig;
use crate::plugins::PluginChain;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// Contains the dev-server configuration and the resolved plugin pipeline.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<DevConfig>,
    pub plugins: Arc<PluginChain>,
}

impl AppState {
    /// Creates a new application state from the given configuration and
    /// plugin chain.
    pub fn new(config: DevConfig, plugins: PluginChain) -> Self {
        Self {
            config: Arc::new(config),
            plugins: Arc::new(plugins),
        }
    }
}
