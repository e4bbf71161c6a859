use serde::{Deserialize, Serialize};

use crate::cache::CacheConfig;
use crate::sim::config::Config;

/// Calibration knob for the generators. Each step scales the generated
/// working set against the L1 geometry so the same level stresses small and
/// large caches comparably.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StressLevel {
    Light,
    Moderate,
    Heavy,
    Extreme,
}

impl StressLevel {
    /// Working set as a multiple of L1 capacity.
    pub fn working_set_ratio(self) -> f64 {
        match self {
            StressLevel::Light => 0.5,
            StressLevel::Moderate => 1.5,
            StressLevel::Heavy => 3.0,
            StressLevel::Extreme => 8.0,
        }
    }

    /// Stride for the strided pattern, as a multiple of one set's bytes.
    pub fn stride_multiplier(self) -> f64 {
        match self {
            StressLevel::Light => 0.25,
            StressLevel::Moderate => 0.5,
            StressLevel::Heavy => 1.0,
            StressLevel::Extreme => 2.0,
        }
    }

    /// Loop window for the thrashing pattern, as a multiple of L1 capacity.
    pub fn thrash_factor(self) -> f64 {
        match self {
            StressLevel::Light => 1.3,
            StressLevel::Moderate => 2.0,
            StressLevel::Heavy => 4.0,
            StressLevel::Extreme => 10.0,
        }
    }

    /// Associativity the LRU-killer pattern is aimed at.
    pub fn conflict_ways(self) -> u32 {
        match self {
            StressLevel::Light => 2,
            StressLevel::Moderate => 4,
            StressLevel::Heavy => 8,
            StressLevel::Extreme => 16,
        }
    }

    /// Conflicting tags beyond the targeted associativity.
    pub fn extra_conflict_blocks(self) -> u32 {
        match self {
            StressLevel::Light => 1,
            StressLevel::Moderate => 2,
            StressLevel::Heavy => 3,
            StressLevel::Extreme => 4,
        }
    }

    /// (hot, cold) sizes for the temporal pattern, as fractions of the
    /// working set. The cold side grows much faster than the hot side
    /// shrinks, drowning recency information at high stress.
    pub fn hot_cold_ratios(self) -> (f64, f64) {
        match self {
            StressLevel::Light => (0.7, 0.3),
            StressLevel::Moderate => (0.5, 1.0),
            StressLevel::Heavy => (0.3, 2.5),
            StressLevel::Extreme => (0.2, 5.0),
        }
    }

    /// Zipf exponent; flatter (smaller) skew spreads accesses wider.
    pub fn zipf_skew(self) -> f64 {
        match self {
            StressLevel::Light => 1.3,
            StressLevel::Moderate => 1.0,
            StressLevel::Heavy => 0.8,
            StressLevel::Extreme => 0.6,
        }
    }

    /// Reused tail of the scan, as a fraction of the scanned blocks.
    pub fn reuse_fraction(self) -> f64 {
        match self {
            StressLevel::Light => 0.5,
            StressLevel::Moderate => 0.4,
            StressLevel::Heavy => 0.3,
            StressLevel::Extreme => 0.2,
        }
    }
}

/// The L1 shape a generator calibrates against.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct GeometryHint {
    pub cache_size_bytes: u32,
    pub block_bytes: u32,
    pub num_sets: u32,
}

impl Default for GeometryHint {
    fn default() -> Self {
        Self {
            cache_size_bytes: 32 * 1024,
            block_bytes: 64,
            num_sets: 128,
        }
    }
}

impl From<&CacheConfig> for GeometryHint {
    fn from(config: &CacheConfig) -> Self {
        Self {
            cache_size_bytes: config.size_bytes,
            block_bytes: config.block_bytes,
            num_sets: config.num_sets(),
        }
    }
}

impl GeometryHint {
    pub fn set_bytes(&self) -> u32 {
        self.num_sets * self.block_bytes
    }

    /// Stress-scaled working set, rounded to a whole number of blocks.
    pub fn working_set_bytes(&self, stress: StressLevel) -> u32 {
        let raw = (self.cache_size_bytes as f64 * stress.working_set_ratio()) as u32;
        let blocks = (raw / self.block_bytes).max(1);
        blocks * self.block_bytes
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    Sequential,
    Random,
    Strided,
    Temporal,
    WorkingSet,
    Thrashing,
    LruKiller,
    Zipfian,
    ScanReuse,
}

/// Generator selection for the CLI and the TOML `[traffic]` section.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct TrafficConfig {
    pub pattern: PatternKind,
    pub base_address: u32,
    pub count: usize,
    pub stress: StressLevel,
    pub stride: u32,
    pub seed: u64,
}

impl Config for TrafficConfig {}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            pattern: PatternKind::Sequential,
            base_address: 0x1000_0000,
            count: 10_000,
            stress: StressLevel::Moderate,
            stride: 0,
            seed: 0,
        }
    }
}
