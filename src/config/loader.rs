//! Configuration Loader - File Loading, Env Overrides, Validation
//!
//! Resolution order: built-in defaults, then the TOML file named by
//! `GAME_ROSTER_CONFIG` (if set), then individual environment variables.
//! Each binary validates only the sections it runs on.

use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result};

use super::{AppConfig, StoreBackend};

/// Env var naming an optional TOML config file.
pub const CONFIG_PATH_ENV: &str = "GAME_ROSTER_CONFIG";
/// Redis `host:port`.
pub const REDIS_ADDR_ENV: &str = "REDIS_ADDR";
/// Counters endpoint the bridge polls.
pub const TARGET_METRICS_URL_ENV: &str = "TARGET_METRICS_URL";
/// Roster API listen address.
pub const LISTEN_ADDR_ENV: &str = "LISTEN_ADDR";
/// Bridge listen address.
pub const BRIDGE_LISTEN_ADDR_ENV: &str = "BRIDGE_LISTEN_ADDR";
/// Store backend (`redis` or `memory`).
pub const STORE_BACKEND_ENV: &str = "STORE_BACKEND";
/// Log level.
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

/// Which binary the configuration is loaded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    /// `game-api`: `service` and `store` sections.
    GameApi,
    /// `metrics-bridge`: `bridge` section.
    MetricsBridge,
}

/// Load configuration from the process environment.
///
/// # Errors
/// Returns detailed error if:
/// - `GAME_ROSTER_CONFIG` names a file that can't be read or parsed
/// - An override has an invalid value
/// - Validation rules for `component` are violated
pub fn load_config(component: Component) -> Result<AppConfig> {
    load_config_with(component, |key| std::env::var(key).ok())
}

/// Load configuration using `env` to look up variables.
pub fn load_config_with<F>(component: Component, env: F) -> Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match env(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
        Some(path) => load_file(&path)?,
        None => AppConfig::default(),
    };

    apply_env_overrides(&mut config, &env)?;
    validate_config(&config, component)?;

    Ok(config)
}

/// Parse a TOML config file.
pub fn load_file(path: &str) -> Result<AppConfig> {
    let path = Path::new(path);

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Overlay non-empty environment variables onto `config`.
fn apply_env_overrides<F>(config: &mut AppConfig, env: &F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| env(key).filter(|v| !v.is_empty());

    if let Some(v) = var(REDIS_ADDR_ENV) {
        config.store.redis_addr = v;
    }
    if let Some(v) = var(TARGET_METRICS_URL_ENV) {
        config.bridge.target_url = v;
    }
    if let Some(v) = var(LISTEN_ADDR_ENV) {
        config.service.listen = v;
    }
    if let Some(v) = var(BRIDGE_LISTEN_ADDR_ENV) {
        config.bridge.listen = v;
    }
    if let Some(v) = var(LOG_LEVEL_ENV) {
        config.service.log_level = v;
    }
    if let Some(v) = var(STORE_BACKEND_ENV) {
        config.store.backend = match v.to_ascii_lowercase().as_str() {
            "redis" => StoreBackend::Redis,
            "memory" => StoreBackend::Memory,
            other => {
                anyhow::bail!("{STORE_BACKEND_ENV} must be 'redis' or 'memory', got '{other}'")
            }
        };
    }

    Ok(())
}

/// Validate the sections `component` runs on.
fn validate_config(config: &AppConfig, component: Component) -> Result<()> {
    match component {
        Component::GameApi => validate_game_api(config),
        Component::MetricsBridge => validate_bridge(config),
    }
}

fn validate_game_api(config: &AppConfig) -> Result<()> {
    config
        .service
        .listen
        .parse::<SocketAddr>()
        .with_context(|| {
            format!("service.listen is not a socket address: {}", config.service.listen)
        })?;

    if config.store.backend == StoreBackend::Redis {
        anyhow::ensure!(
            !config.store.redis_addr.is_empty(),
            "store.redis_addr must not be empty"
        );
    }

    Ok(())
}

fn validate_bridge(config: &AppConfig) -> Result<()> {
    config
        .bridge
        .listen
        .parse::<SocketAddr>()
        .with_context(|| {
            format!("bridge.listen is not a socket address: {}", config.bridge.listen)
        })?;

    anyhow::ensure!(
        config.bridge.target_url.starts_with("http://")
            || config.bridge.target_url.starts_with("https://"),
        "bridge.target_url must be an http(s) URL, got '{}'",
        config.bridge.target_url
    );
    anyhow::ensure!(
        config.bridge.timeout_ms > 0,
        "bridge.timeout_ms must be positive"
    );

    Ok(())
}
