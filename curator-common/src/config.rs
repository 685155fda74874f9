//! Configuration loading and path resolution
//!
//! Bootstrap settings come from a TOML file. Resolution order for the file
//! itself:
//! 1. Command-line argument (highest priority)
//! 2. `CURATOR_CONFIG` environment variable
//! 3. `<config dir>/curator/config.toml`
//! 4. Compiled defaults (no file)
//!
//! A missing or unparsable file never aborts startup; defaults are used.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::{Error, Result};

/// Environment variable naming the config file
pub const CONFIG_PATH_ENV: &str = "CURATOR_CONFIG";

/// Default listen port
pub const DEFAULT_PORT: u16 = 5730;

/// Bootstrap configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_bind")]
    pub bind: String,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub images: ImageConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub http: HttpClientConfig,

    #[serde(default)]
    pub sources: SourcesConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind: default_bind(),
            logging: LoggingConfig::default(),
            images: ImageConfig::default(),
            storage: StorageConfig::default(),
            http: HttpClientConfig::default(),
            sources: SourcesConfig::default(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default tracing directive when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Pixel widths requested from image services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageConfig {
    #[serde(default = "default_thumbnail_width")]
    pub thumbnail_width: u32,
    #[serde(default = "default_full_width")]
    pub full_width: u32,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            thumbnail_width: default_thumbnail_width(),
            full_width: default_full_width(),
        }
    }
}

fn default_thumbnail_width() -> u32 {
    400
}

fn default_full_width() -> u32 {
    843
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Lives as long as the process
    #[default]
    Memory,
    /// One JSON file per key in `directory`
    File,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// File backend directory; defaults to `<local data dir>/curator`
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// Clear the stored exhibition at graceful shutdown
    #[serde(default)]
    pub ephemeral: bool,
}

impl StorageConfig {
    pub fn resolved_directory(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.directory {
            return Ok(dir.clone());
        }
        dirs::data_local_dir()
            .map(|d| d.join("curator"))
            .ok_or_else(|| Error::Config("Could not determine local data directory".to_string()))
    }
}

/// Outbound HTTP client settings shared by every source adapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpClientConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_user_agent() -> String {
    format!("curator/{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default)]
    pub met: MetConfig,
    #[serde(default)]
    pub aic: AicConfig,
    #[serde(default)]
    pub harvard: HarvardConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_met_base_url")]
    pub base_url: String,
    /// Object detail requests issued per search
    #[serde(default = "default_met_detail_limit")]
    pub detail_limit: usize,
}

impl Default for MetConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_met_base_url(),
            detail_limit: default_met_detail_limit(),
        }
    }
}

fn default_met_base_url() -> String {
    "https://collectionapi.metmuseum.org/public/collection/v1".to_string()
}

fn default_met_detail_limit() -> usize {
    10
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AicConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_aic_base_url")]
    pub base_url: String,
    #[serde(default = "default_aic_page_size")]
    pub page_size: usize,
    /// IIIF image service; replaced by `config.iiif_url` when a response carries one
    #[serde(default = "default_aic_image_base")]
    pub image_base: String,
    #[serde(default = "default_aic_record_base")]
    pub record_base: String,
}

impl Default for AicConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_aic_base_url(),
            page_size: default_aic_page_size(),
            image_base: default_aic_image_base(),
            record_base: default_aic_record_base(),
        }
    }
}

fn default_aic_base_url() -> String {
    "https://api.artic.edu/api/v1".to_string()
}

fn default_aic_page_size() -> usize {
    12
}

fn default_aic_image_base() -> String {
    "https://www.artic.edu/iiif/2".to_string()
}

fn default_aic_record_base() -> String {
    "https://www.artic.edu/artworks".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarvardConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_harvard_base_url")]
    pub base_url: String,
    #[serde(default = "default_harvard_page_size")]
    pub page_size: usize,
    #[serde(default = "default_harvard_image_base")]
    pub image_base: String,
    #[serde(default = "default_harvard_record_base")]
    pub record_base: String,
    /// Overridden by `CURATOR_HARVARD_API_KEY`
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for HarvardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_harvard_base_url(),
            page_size: default_harvard_page_size(),
            image_base: default_harvard_image_base(),
            record_base: default_harvard_record_base(),
            api_key: None,
        }
    }
}

fn default_harvard_base_url() -> String {
    "https://api.harvardartmuseums.org".to_string()
}

fn default_harvard_page_size() -> usize {
    24
}

fn default_harvard_image_base() -> String {
    "https://ids.lib.harvard.edu/ids/iiif".to_string()
}

fn default_harvard_record_base() -> String {
    "https://harvardartmuseums.org/collections/object".to_string()
}

fn default_true() -> bool {
    true
}

/// Pick the config file path: CLI, then `CURATOR_CONFIG`, then the platform config dir
///
/// Returns `None` when no tier names a path (compiled defaults apply).
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    dirs::config_dir().map(|d| d.join("curator").join("config.toml"))
}

/// Parse a config file strictly
pub fn read_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Load the config file, falling back to defaults on any problem
pub fn load_config(path: Option<&Path>) -> TomlConfig {
    let Some(path) = path else {
        info!("No config file location available, using defaults");
        return TomlConfig::default();
    };

    if !path.exists() {
        info!("Config file {} not found, using defaults", path.display());
        return TomlConfig::default();
    }

    match read_toml_config(path) {
        Ok(config) => {
            info!("Loaded config from {}", path.display());
            config
        }
        Err(e) => {
            warn!("{}; using defaults", e);
            TomlConfig::default()
        }
    }
}
