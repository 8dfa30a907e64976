//! Configuration surface for the targeting engine
//!
//! Loading is the host's job (env, files, a DI container); the engine only
//! consumes the validated struct.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{ConfigError, TargetingResult};

/// Default time-to-live for cached targeting results.
pub const DEFAULT_CACHE_EXPIRATION: Duration = Duration::from_secs(3600);

/// Targeting engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetingConfig {
    /// Whether targeting results are cached at all.
    pub enable_cache: bool,
    /// Time-to-live for cached targeting results.
    pub cache_expiration: Duration,
}

impl Default for TargetingConfig {
    fn default() -> Self {
        Self {
            enable_cache: true,
            cache_expiration: DEFAULT_CACHE_EXPIRATION,
        }
    }
}

impl TargetingConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable result caching.
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.enable_cache = enabled;
        self
    }

    /// Set the cache time-to-live.
    pub fn with_expiration(mut self, ttl: Duration) -> Self {
        self.cache_expiration = ttl;
        self
    }

    /// Validate the configuration.
    ///
    /// A zero expiration with caching enabled would make every entry
    /// expire on arrival, so it is rejected rather than silently serving
    /// a cache that never hits.
    pub fn validate(&self) -> TargetingResult<()> {
        if self.enable_cache && self.cache_expiration.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "cache_expiration".to_string(),
                value: format!("{:?}", self.cache_expiration),
                reason: "cache_expiration must be positive when caching is enabled".to_string(),
            }
            .into());
        }
        Ok(())
    }
}
