//! TOML configuration loading and resolution
//!
//! Resolution priority for every setting:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::{Error, Result};

/// Environment variable holding the generative oracle API key
pub const ORACLE_API_KEY_ENV: &str = "HAAT_GEMINI_API_KEY";

/// Environment variable overriding the config file location
pub const CONFIG_PATH_ENV: &str = "HAAT_CONFIG";

pub const DEFAULT_PORT: u16 = 5780;
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1";
pub const DEFAULT_MAX_QUERY_LEN: usize = 500;
pub const DEFAULT_ORACLE_MODEL: &str = "gemini-pro";
pub const DEFAULT_ORACLE_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_ORACLE_TIMEOUT_SECS: u64 = 15;

/// Service configuration file contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Longest accepted assistant query, in characters
    #[serde(default = "default_max_query_len")]
    pub max_query_len: usize,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub oracle: OracleConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            max_query_len: default_max_query_len(),
            logging: LoggingConfig::default(),
            oracle: OracleConfig::default(),
        }
    }
}

/// Logging section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default `tracing` filter directive when `RUST_LOG` is unset
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

/// Generative oracle section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Master switch; a missing API key disables the oracle regardless
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_oracle_model")]
    pub model: String,
    #[serde(default = "default_oracle_base_url")]
    pub base_url: String,
    #[serde(default = "default_oracle_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: default_oracle_model(),
            base_url: default_oracle_base_url(),
            timeout_secs: default_oracle_timeout_secs(),
            api_key: None,
        }
    }
}

fn default_bind_addr() -> String {
    DEFAULT_BIND_ADDR.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_max_query_len() -> usize {
    DEFAULT_MAX_QUERY_LEN
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_oracle_model() -> String {
    DEFAULT_ORACLE_MODEL.to_string()
}

fn default_oracle_base_url() -> String {
    DEFAULT_ORACLE_BASE_URL.to_string()
}

fn default_oracle_timeout_secs() -> u64 {
    DEFAULT_ORACLE_TIMEOUT_SECS
}

/// Platform config file location: `<config dir>/haat/haat-assist.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("haat").join("haat-assist.toml"))
}

/// Resolve which config file to read
///
/// CLI argument, then `HAAT_CONFIG`, then the platform default.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }
    default_config_path()
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path).map_err(Error::config_io("Read", path))?;
    toml::from_str(&content).map_err(|e| Error::ConfigParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load the config file if it exists, defaults otherwise
///
/// A file that exists but cannot be parsed is an error.
pub fn load_or_default(path: Option<&Path>) -> Result<TomlConfig> {
    match path {
        Some(path) if path.exists() => {
            let config = load_toml_config(path)?;
            info!("Loaded configuration from {}", path.display());
            Ok(config)
        }
        Some(path) => {
            debug!("No config file at {}, using defaults", path.display());
            Ok(TomlConfig::default())
        }
        None => Ok(TomlConfig::default()),
    }
}

/// Write config atomically (temp file + rename)
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::ConfigSerialize(e.to_string()))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(Error::config_io("Create", parent))?;
        }
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    std::fs::write(&tmp, content).map_err(Error::config_io("Write", &tmp))?;

    // The file may carry an API key
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o600))
            .map_err(Error::config_io("Restrict", &tmp))?;
    }

    std::fs::rename(&tmp, path).map_err(Error::config_io("Rename", path))?;
    Ok(())
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Resolve the oracle API key
///
/// **Priority:** ENV → TOML. Returns `None` when neither source holds a
/// usable key, which leaves the service on the rule-based path only.
pub fn resolve_oracle_api_key(config: &TomlConfig) -> Option<String> {
    let env_key = std::env::var(ORACLE_API_KEY_ENV)
        .ok()
        .filter(|k| is_valid_key(k));
    let toml_key = config.oracle.api_key.clone().filter(|k| is_valid_key(k));

    if env_key.is_some() && toml_key.is_some() {
        warn!(
            "Oracle API key found in both {} and TOML config. Using environment (highest priority).",
            ORACLE_API_KEY_ENV
        );
    }

    if let Some(key) = env_key {
        info!("Oracle API key loaded from environment variable");
        return Some(key);
    }
    if let Some(key) = toml_key {
        info!("Oracle API key loaded from TOML config");
        return Some(key);
    }

    None
}
