//! # Node Configuration
//!
//! Settings come from an optional TOML file named by `NOTIFY_CONFIG`, then
//! individual environment overrides are applied on top.

use anyhow::{Context, Result};
use notification_discovery::{
    ConfigProvider, DiscoveryConfig, NodeSettings, RegistryConfig, StaticConfigProvider,
    TomlConfigProvider,
};
use tracing::{info, warn};

/// Path of the TOML config file.
pub const ENV_CONFIG: &str = "NOTIFY_CONFIG";
/// Hex node identity override.
pub const ENV_IDENTITY: &str = "NOTIFY_IDENTITY";
/// Log filter override.
pub const ENV_LOG: &str = "NOTIFY_LOG";
/// Number of simulated clients to run through the handshake at startup.
pub const ENV_DEMO_CLIENTS: &str = "NOTIFY_DEMO_CLIENTS";

/// Complete node configuration.
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    /// Identity, protocol password and log level.
    pub node: NodeSettings,
    /// Outbound message policy.
    pub discovery: DiscoveryConfig,
    /// Session keystore policy.
    pub registry: RegistryConfig,
    /// Simulated clients to run at startup.
    pub demo_clients: usize,
    /// Config file the settings were read from, if any.
    pub source: Option<String>,
    /// Problems found while loading that did not stop it.
    pub warnings: Vec<String>,
}

impl RuntimeConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::load_with(|name| std::env::var(name).ok())
    }

    /// Load using `lookup` to resolve environment variables.
    ///
    /// Nothing is logged here since logging is configured from the result;
    /// call [`RuntimeConfig::log_loaded`] once a subscriber is installed.
    pub fn load_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let source = lookup(ENV_CONFIG);
        let provider: Box<dyn ConfigProvider> = match &source {
            Some(path) => Box::new(
                TomlConfigProvider::load(path)
                    .with_context(|| format!("Failed to load config from {path}"))?,
            ),
            None => Box::new(StaticConfigProvider::new()),
        };

        let mut config = Self {
            node: provider.node_settings(),
            discovery: provider.discovery_config(),
            registry: provider.registry_config(),
            demo_clients: 0,
            source,
            warnings: Vec::new(),
        };

        if let Some(identity) = lookup(ENV_IDENTITY) {
            config.node.identity = Some(identity);
        }
        if let Some(level) = lookup(ENV_LOG) {
            config.node.log_level = level;
        }
        if let Some(count) = lookup(ENV_DEMO_CLIENTS) {
            match count.parse() {
                Ok(n) => config.demo_clients = n,
                Err(_) => config
                    .warnings
                    .push(format!("{ENV_DEMO_CLIENTS}={count:?} is not a number, ignoring")),
            }
        }

        Ok(config)
    }

    /// Report where the settings came from and any load warnings.
    pub fn log_loaded(&self) {
        match &self.source {
            Some(path) => info!(path = %path, "Loaded configuration file"),
            None => info!("No configuration file, using defaults"),
        }
        for warning in &self.warnings {
            warn!("{warning}");
        }
    }
}
