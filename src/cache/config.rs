use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sim::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplacementPolicy {
    Lru,
    Fifo,
    Lfu,
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WritePolicy {
    WriteBack,
    WriteThrough,
}

/// Geometry and behavior of a single cache level. All three size fields must
/// be powers of two, with at least `ways` blocks in the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    pub size_bytes: u32,
    pub block_bytes: u32,
    pub ways: u32,
    pub policy: ReplacementPolicy,
    pub write_policy: WritePolicy,
}

impl Config for CacheConfig {}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            size_bytes: 4096,
            block_bytes: 64,
            ways: 4,
            policy: ReplacementPolicy::Lru,
            write_policy: WritePolicy::WriteBack,
        }
    }
}

impl CacheConfig {
    pub fn num_blocks(&self) -> u32 {
        self.size_bytes / self.block_bytes
    }

    pub fn num_sets(&self) -> u32 {
        self.size_bytes / (self.block_bytes * self.ways)
    }

    pub fn size_kb(&self) -> f64 {
        self.size_bytes as f64 / 1024.0
    }

    /// Rejects geometries the block storage cannot represent. Anything that
    /// passes here is safe to index with plain arithmetic.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("size_bytes", self.size_bytes),
            ("block_bytes", self.block_bytes),
            ("ways", self.ways),
        ] {
            if value == 0 || !value.is_power_of_two() {
                return Err(ConfigError::NotPowerOfTwo { field, value });
            }
        }
        if self.block_bytes < 4 {
            return Err(ConfigError::BlockTooSmall {
                block_bytes: self.block_bytes,
            });
        }
        if self.block_bytes > self.size_bytes {
            return Err(ConfigError::BlockExceedsCache {
                block_bytes: self.block_bytes,
                size_bytes: self.size_bytes,
            });
        }
        if self.num_blocks() < self.ways {
            return Err(ConfigError::TooFewBlocks {
                blocks: self.num_blocks(),
                ways: self.ways,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    NotPowerOfTwo { field: &'static str, value: u32 },
    BlockTooSmall { block_bytes: u32 },
    BlockExceedsCache { block_bytes: u32, size_bytes: u32 },
    TooFewBlocks { blocks: u32, ways: u32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NotPowerOfTwo { field, value } => {
                write!(f, "{field} must be a power of two, got {value}")
            }
            ConfigError::BlockTooSmall { block_bytes } => {
                write!(f, "block size must be at least 4 bytes, got {block_bytes}")
            }
            ConfigError::BlockExceedsCache {
                block_bytes,
                size_bytes,
            } => write!(
                f,
                "block size {block_bytes} exceeds cache size {size_bytes}"
            ),
            ConfigError::TooFewBlocks { blocks, ways } => write!(
                f,
                "cache holds {blocks} blocks, fewer than {ways} ways per set"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
