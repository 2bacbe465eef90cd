//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `MEMBERLINK_BASE_URL`: Base URL of the member CRUD API (required)
//! - `MEMBERLINK_MAX_TOTAL_CONNECTIONS`: Pool-wide connection cap
//! - `MEMBERLINK_MAX_CONNECTIONS_PER_ROUTE`: Per-destination connection cap
//! - `MEMBERLINK_CONNECT_TIMEOUT_MS`: Connect timeout in milliseconds
//! - `MEMBERLINK_READ_TIMEOUT_MS`: Read timeout in milliseconds
//!
//! All pool variables are optional and fall back to the documented defaults.
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./memberlink.json` or `./memberlink.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. `../../config.json` or `../../config.toml` (grandparent directory)
//! 5. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use memberlink_domain::{Config, MemberLinkError, PoolConfig, Result, ServiceConfig};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `MemberLinkError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// `MEMBERLINK_BASE_URL` must be present; the pool variables default to the
/// documented values when unset.
///
/// # Errors
/// Returns `MemberLinkError::Config` if the base URL is missing or a pool
/// variable has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let base_url = env_var("MEMBERLINK_BASE_URL")?;

    let defaults = PoolConfig::default();
    let pool = PoolConfig {
        max_total_connections: env_parse(
            "MEMBERLINK_MAX_TOTAL_CONNECTIONS",
            defaults.max_total_connections,
        )?,
        max_connections_per_route: env_parse(
            "MEMBERLINK_MAX_CONNECTIONS_PER_ROUTE",
            defaults.max_connections_per_route,
        )?,
        connect_timeout_ms: env_parse(
            "MEMBERLINK_CONNECT_TIMEOUT_MS",
            defaults.connect_timeout_ms,
        )?,
        read_timeout_ms: env_parse("MEMBERLINK_READ_TIMEOUT_MS", defaults.read_timeout_ms)?,
    };

    Ok(Config { service: ServiceConfig { base_url }, pool })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Arguments
/// * `path` - Optional path to config file. If `None`, uses
///   [`probe_config_paths`].
///
/// # Errors
/// Returns `MemberLinkError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(MemberLinkError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            MemberLinkError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| MemberLinkError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `MemberLinkError::Config` if format is invalid or parsing fails.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| MemberLinkError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| MemberLinkError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(MemberLinkError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches the current working directory, up to two parent levels, and the
/// executable's directory for `config.{json,toml}` and
/// `memberlink.{json,toml}`.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    // Try current working directory
    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(vec![
            cwd.join("config.json"),
            cwd.join("config.toml"),
            cwd.join("memberlink.json"),
            cwd.join("memberlink.toml"),
            cwd.join("../config.json"),
            cwd.join("../config.toml"),
            cwd.join("../../config.json"),
            cwd.join("../../config.toml"),
        ]);
    }

    // Try relative to executable
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(vec![
                exe_dir.join("config.json"),
                exe_dir.join("config.toml"),
                exe_dir.join("memberlink.json"),
                exe_dir.join("memberlink.toml"),
            ]);
        }
    }

    // Return first existing candidate
    candidates.into_iter().find(|path| path.exists())
}

/// Get required environment variable
///
/// # Errors
/// Returns `MemberLinkError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        MemberLinkError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Parse an optional environment variable, falling back to `default`
///
/// # Errors
/// Returns `MemberLinkError::Config` if the variable is set but does not
/// parse.
fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| MemberLinkError::Config(format!("Invalid value for {}: {}", key, e))),
        Err(_) => Ok(default),
    }
}
