use crate::domain::{DiscoveryConfig, NodeSettings, RegistrationPolicy, RegistryConfig};
use crate::ports::ConfigProvider;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

// ============================================================================
// StaticConfigProvider - Hardcoded config for testing/development
// ============================================================================

/// Static configuration provider with hardcoded values.
///
/// Useful for testing and development. For deployments, use `TomlConfigProvider`.
#[derive(Debug, Clone, Default)]
pub struct StaticConfigProvider {
    node: NodeSettings,
    discovery: DiscoveryConfig,
    registry: RegistryConfig,
}

impl StaticConfigProvider {
    /// Create with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the discovery config.
    #[must_use]
    pub fn with_discovery(mut self, discovery: DiscoveryConfig) -> Self {
        self.discovery = discovery;
        self
    }
}

impl ConfigProvider for StaticConfigProvider {
    fn node_settings(&self) -> NodeSettings {
        self.node.clone()
    }

    fn discovery_config(&self) -> DiscoveryConfig {
        self.discovery.clone()
    }

    fn registry_config(&self) -> RegistryConfig {
        self.registry.clone()
    }
}

// ============================================================================
// TomlConfigProvider - Config file loading
// ============================================================================

/// Configuration file structure.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    node: NodeSection,
    #[serde(default)]
    discovery: DiscoverySection,
    #[serde(default)]
    registry: RegistrySection,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct NodeSection {
    identity: Option<String>,
    protocol_password: Option<String>,
    log_level: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct DiscoverySection {
    ttl_secs: Option<u32>,
    minimum_pow: Option<f64>,
    work_time_secs: Option<u32>,
    channel_capacity: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RegistrySection {
    policy: Option<RegistrationPolicy>,
    max_sessions: Option<usize>,
}

/// TOML-based configuration provider.
///
/// # Config File Format
///
/// ```toml
/// [node]
/// identity = "0x04a1b2..."
/// protocol_password = "NOTIFICATION_PROTOCOL_KEY"
/// log_level = "info"
///
/// [discovery]
/// ttl_secs = 50
/// minimum_pow = 0.2
/// work_time_secs = 5
/// channel_capacity = 1024
///
/// [registry]
/// policy = "always_fresh"   # or "reuse_active"
/// max_sessions = 10000
/// ```
///
/// Every key is optional and falls back to the defaults.
#[derive(Debug, Clone)]
pub struct TomlConfigProvider {
    node: NodeSettings,
    discovery: DiscoveryConfig,
    registry: RegistryConfig,
}

impl TomlConfigProvider {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;

        let node_defaults = NodeSettings::default();
        let node = NodeSettings {
            identity: file.node.identity,
            protocol_password: file
                .node
                .protocol_password
                .unwrap_or(node_defaults.protocol_password),
            log_level: file.node.log_level.unwrap_or(node_defaults.log_level),
        };

        let dc = file.discovery;
        let discovery_defaults = DiscoveryConfig::default();
        let discovery = DiscoveryConfig {
            ttl_secs: dc.ttl_secs.unwrap_or(discovery_defaults.ttl_secs),
            minimum_pow: dc.minimum_pow.unwrap_or(discovery_defaults.minimum_pow),
            work_time_secs: dc.work_time_secs.unwrap_or(discovery_defaults.work_time_secs),
            channel_capacity: dc
                .channel_capacity
                .unwrap_or(discovery_defaults.channel_capacity),
        };

        let rc = file.registry;
        let registry_defaults = RegistryConfig::default();
        let registry = RegistryConfig {
            policy: rc.policy.unwrap_or(registry_defaults.policy),
            max_sessions: rc.max_sessions.unwrap_or(registry_defaults.max_sessions),
        };

        if discovery.ttl_secs == 0 {
            return Err(ConfigError::Invalid("discovery.ttl_secs must be non-zero"));
        }
        if !discovery.minimum_pow.is_finite() || discovery.minimum_pow < 0.0 {
            return Err(ConfigError::Invalid(
                "discovery.minimum_pow must be finite and non-negative",
            ));
        }
        if discovery.work_time_secs == 0 {
            return Err(ConfigError::Invalid(
                "discovery.work_time_secs must be non-zero",
            ));
        }
        if discovery.channel_capacity == 0 {
            return Err(ConfigError::Invalid(
                "discovery.channel_capacity must be non-zero",
            ));
        }
        if registry.max_sessions == 0 {
            return Err(ConfigError::Invalid("registry.max_sessions must be non-zero"));
        }

        Ok(Self {
            node,
            discovery,
            registry,
        })
    }
}

impl ConfigProvider for TomlConfigProvider {
    fn node_settings(&self) -> NodeSettings {
        self.node.clone()
    }

    fn discovery_config(&self) -> DiscoveryConfig {
        self.discovery.clone()
    }

    fn registry_config(&self) -> RegistryConfig {
        self.registry.clone()
    }
}

/// Errors that can occur during config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path of the file that failed to load.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// TOML parsing error.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value parsed but is unusable.
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}
