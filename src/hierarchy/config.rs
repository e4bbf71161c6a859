use serde::{Deserialize, Serialize};

use crate::cache::{CacheConfig, ConfigError, ReplacementPolicy, WritePolicy};
use crate::sim::config::Config;

/// Up to two independent cache levels in front of main memory. With both
/// levels disabled every access goes straight to memory.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct HierarchyConfig {
    pub l1: CacheConfig,
    pub l2: CacheConfig,
    pub l1_enabled: bool,
    pub l2_enabled: bool,
}

impl Config for HierarchyConfig {}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            l1: CacheConfig {
                size_bytes: 32 * 1024,
                block_bytes: 64,
                ways: 4,
                policy: ReplacementPolicy::Lru,
                write_policy: WritePolicy::WriteBack,
            },
            l2: CacheConfig {
                size_bytes: 256 * 1024,
                block_bytes: 64,
                ways: 8,
                policy: ReplacementPolicy::Lru,
                write_policy: WritePolicy::WriteBack,
            },
            l1_enabled: true,
            l2_enabled: true,
        }
    }
}

impl HierarchyConfig {
    pub fn single_level(l1: CacheConfig) -> Self {
        Self {
            l1,
            l1_enabled: true,
            l2_enabled: false,
            ..Self::default()
        }
    }

    /// Only enabled levels are validated; a disabled level may carry any
    /// placeholder geometry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.l1_enabled {
            self.l1.validate()?;
        }
        if self.l2_enabled {
            self.l2.validate()?;
        }
        Ok(())
    }
}
