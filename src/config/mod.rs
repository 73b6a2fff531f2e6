//! Configuration module.

pub mod loader;

pub use loader::{
    apply_cli_overrides, apply_env_overrides, default_config_path, load_config_file,
    load_config_with_precedence, merge_config, ConfigError, ConfigFile,
};

use crate::matcher::FuzzyDistance;
use crate::state::results::DEFAULT_CONTEXT_LENGTH;
use crate::vtl::VtlLimits;

/// Fully resolved engine configuration.
///
/// Created by merging defaults, the config file, environment variables
/// and CLI arguments, in that precedence order.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Multi-keyword distance budget.
    pub fuzzy: FuzzyDistance,
    /// Default context window for results lists.
    pub context_length: usize,
    /// Traversal ceilings for the virtual text builder.
    pub limits: VtlLimits,
    /// Cap on stored matches per search.
    pub max_matches: usize,
    /// Element id of the overlay container; its subtree is never searched.
    pub overlay_container_id: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            fuzzy: FuzzyDistance::default(),
            context_length: DEFAULT_CONTEXT_LENGTH,
            limits: VtlLimits::default(),
            max_matches: 10_000,
            overlay_container_id: "pagelens-overlay-root".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_documented_constants() {
        let config = SearchConfig::default();
        assert_eq!(config.context_length, 30);
        assert_eq!(config.limits.max_nodes, 100_000);
        assert_eq!(config.limits.max_depth, 1_000);
        assert_eq!(config.fuzzy.min, 8);
        assert_eq!(config.fuzzy.max, 64);
    }

    #[test]
    fn default_config_is_cloneable() {
        let config = SearchConfig::default();
        let cloned = config.clone();
        assert_eq!(config, cloned);
    }
}
