//! Caching layer configuration.

use serde::{Deserialize, Serialize};

use crate::errors::{ChronosError, ChronosResult};

/// Capacities for the bounded caches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Entries kept by a point read-through cache.
    pub point_cache_capacity: usize,
    /// Distinct instants kept by an instant interner.
    pub interner_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            point_cache_capacity: 1024,
            interner_capacity: 4096,
        }
    }
}

impl CacheConfig {
    pub fn validate(&self) -> ChronosResult<()> {
        if self.point_cache_capacity == 0 {
            return Err(ChronosError::ConfigError(
                "point_cache_capacity must be positive".to_string(),
            ));
        }
        if self.interner_capacity == 0 {
            return Err(ChronosError::ConfigError(
                "interner_capacity must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
