//! Configuration file loading with precedence handling.
//!
//! Precedence chain: Defaults → Config File → Env Vars → CLI Args.

use crate::config::SearchConfig;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (missing permissions, not a file, ...).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are
/// used. Corresponds to `~/.config/pagelens/config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Multi-keyword distance multiplier.
    #[serde(default)]
    pub fuzzy_multiplier: Option<f64>,

    /// Multi-keyword distance floor.
    #[serde(default)]
    pub fuzzy_min_distance: Option<usize>,

    /// Multi-keyword distance ceiling.
    #[serde(default)]
    pub fuzzy_max_distance: Option<usize>,

    /// Default results-list context length.
    #[serde(default)]
    pub context_length: Option<usize>,

    /// Cap on stored matches per search.
    #[serde(default)]
    pub max_matches: Option<usize>,

    /// Node ceiling for document traversal.
    #[serde(default)]
    pub max_nodes: Option<usize>,

    /// Depth ceiling for ancestor walks.
    #[serde(default)]
    pub max_depth: Option<usize>,

    /// Element id of the overlay container.
    #[serde(default)]
    pub overlay_container_id: Option<String>,
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if the file doesn't exist (not an error - use
/// defaults). Returns `Err` if the file exists but cannot be read or
/// parsed.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(&path).map_err(|err| ConfigError::ReadError {
        path: path.clone(),
        reason: err.to_string(),
    })?;
    let parsed = toml::from_str(&contents).map_err(|err| ConfigError::ParseError {
        path,
        reason: err.to_string(),
    })?;
    Ok(Some(parsed))
}

/// Platform default config path: `<config dir>/pagelens/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("pagelens").join("config.toml"))
}

/// Load the config file from an explicit path, or the default location.
///
/// An explicit path that fails to load is an error; a missing default
/// file is not.
pub fn load_config_with_precedence(
    explicit_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    match explicit_path {
        Some(path) => load_config_file(path),
        None => match default_config_path() {
            Some(path) => load_config_file(path),
            None => Ok(None),
        },
    }
}

/// Merge a config file into defaults to create the resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise
/// use the default.
pub fn merge_config(config_file: Option<ConfigFile>) -> SearchConfig {
    let mut resolved = SearchConfig::default();
    let Some(config) = config_file else {
        return resolved;
    };

    if let Some(multiplier) = config.fuzzy_multiplier {
        resolved.fuzzy.multiplier = multiplier;
    }
    if let Some(min) = config.fuzzy_min_distance {
        resolved.fuzzy.min = min;
    }
    if let Some(max) = config.fuzzy_max_distance {
        resolved.fuzzy.max = max;
    }
    if let Some(context_length) = config.context_length {
        resolved.context_length = context_length;
    }
    if let Some(max_matches) = config.max_matches {
        resolved.max_matches = max_matches;
    }
    if let Some(max_nodes) = config.max_nodes {
        resolved.limits.max_nodes = max_nodes;
    }
    if let Some(max_depth) = config.max_depth {
        resolved.limits.max_depth = max_depth;
    }
    if let Some(id) = config.overlay_container_id {
        resolved.overlay_container_id = id;
    }
    resolved
}

/// Apply environment variable overrides.
///
/// Checks for:
/// - `PAGELENS_CONTEXT_LENGTH`: default results-list context length
/// - `PAGELENS_MAX_MATCHES`: stored-match cap
///
/// Unparseable values are ignored.
pub fn apply_env_overrides(mut config: SearchConfig) -> SearchConfig {
    if let Some(value) = env_usize("PAGELENS_CONTEXT_LENGTH") {
        config.context_length = value;
    }
    if let Some(value) = env_usize("PAGELENS_MAX_MATCHES") {
        config.max_matches = value;
    }
    config
}

fn env_usize(name: &str) -> Option<usize> {
    std::env::var(name).ok()?.parse().ok()
}

/// Apply CLI argument overrides; highest precedence.
pub fn apply_cli_overrides(
    mut config: SearchConfig,
    context_length_override: Option<usize>,
    overlay_id_override: Option<String>,
) -> SearchConfig {
    if let Some(context_length) = context_length_override {
        config.context_length = context_length;
    }
    if let Some(id) = overlay_id_override {
        config.overlay_container_id = id;
    }
    config
}

// ===== Tests =====

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
