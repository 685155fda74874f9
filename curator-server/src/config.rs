//! Configuration resolution for curator-server
//!
//! Harvard API key priority: ENV → TOML.

use curator_common::config::TomlConfig;
use tracing::{info, warn};

/// Environment variable holding the Harvard Art Museums API key
pub const HARVARD_API_KEY_ENV: &str = "CURATOR_HARVARD_API_KEY";

/// Resolve the Harvard API key from environment, then TOML
///
/// Returns `None` when neither tier holds a usable key; the Harvard adapter
/// then reports itself unavailable instead of failing startup.
pub fn resolve_harvard_api_key(toml_config: &TomlConfig) -> Option<String> {
    let env_key = std::env::var(HARVARD_API_KEY_ENV)
        .ok()
        .filter(|key| is_valid_key(key));
    let toml_key = toml_config
        .sources
        .harvard
        .api_key
        .clone()
        .filter(|key| is_valid_key(key));

    if env_key.is_some() && toml_key.is_some() {
        warn!("Harvard API key found in both environment and TOML. Using environment (highest priority).");
    }

    if let Some(key) = env_key {
        info!("Harvard API key loaded from environment variable");
        return Some(key.trim().to_string());
    }

    if let Some(key) = toml_key {
        info!("Harvard API key loaded from TOML config");
        return Some(key.trim().to_string());
    }

    warn!(
        "Harvard API key not configured; Harvard results disabled. Set {} or [sources.harvard] api_key",
        HARVARD_API_KEY_ENV
    );
    None
}

/// Non-empty, non-whitespace
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}
