//! Configuration Module - Roster Service and Bridge Settings
//!
//! Both binaries share one `AppConfig`. Values come from an optional
//! TOML file and are then overridden by environment variables, which is
//! how the services are normally configured in containers
//! (`REDIS_ADDR`, `TARGET_METRICS_URL`, ...).

pub mod loader;

use serde::Deserialize;

/// Top-level configuration for the roster API and the metrics bridge.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Roster HTTP service settings.
    #[serde(default)]
    pub service: ServiceConfig,
    /// Backing key-value store.
    #[serde(default)]
    pub store: StoreConfig,
    /// Metrics bridge settings.
    #[serde(default)]
    pub bridge: BridgeConfig,
}

/// Roster HTTP service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Listen address for the roster API.
    #[serde(default = "default_listen")]
    pub listen: String,
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Which store adapter to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Redis at `redis_addr`.
    #[default]
    Redis,
    /// Process memory; lost on restart.
    Memory,
}

/// Key-value store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Store adapter.
    #[serde(default)]
    pub backend: StoreBackend,
    /// Redis `host:port`.
    #[serde(default = "default_redis_addr")]
    pub redis_addr: String,
}

/// Metrics bridge configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfig {
    /// Listen address for the bridge's `/metrics`.
    #[serde(default = "default_bridge_listen")]
    pub listen: String,
    /// Roster service counters endpoint polled on each scrape.
    #[serde(default = "default_target_url")]
    pub target_url: String,
    /// Upstream request timeout (milliseconds).
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            log_level: default_log_level(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            redis_addr: default_redis_addr(),
        }
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            listen: default_bridge_listen(),
            target_url: default_target_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

// Default value functions for serde

fn default_listen() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_redis_addr() -> String {
    "redis:6379".to_string()
}

fn default_bridge_listen() -> String {
    "0.0.0.0:9101".to_string()
}

fn default_target_url() -> String {
    "http://game-api:8080/metrics".to_string()
}

fn default_timeout_ms() -> u64 {
    3_000
}
