pub mod cache_config;
pub mod observability_config;

use serde::{Deserialize, Serialize};

pub use cache_config::CacheConfig;
pub use observability_config::ObservabilityConfig;

/// Top-level configuration aggregating all subsystem configs.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ChronosConfig {
    pub cache: CacheConfig,
    pub observability: ObservabilityConfig,
}

impl ChronosConfig {
    /// Load config from a TOML string, falling back to defaults for missing fields.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}
