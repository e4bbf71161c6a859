use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use super::addr::Geometry;
use super::block::CacheBlock;
use super::config::{CacheConfig, ConfigError, WritePolicy};
use super::policy;
use super::stats::CacheStats;

pub const DEFAULT_SEED: u64 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CacheLevel {
    L1,
    L2,
}

/// Outcome of one lookup at one cache level. `evicted` is false when the
/// chosen way was still invalid; `memory_accessed` is stamped by the
/// hierarchy once it knows whether the access fell through to memory.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AccessResult {
    pub hit: bool,
    pub set_index: u32,
    pub way_index: u32,
    pub tag: u32,
    pub evicted: bool,
    pub evicted_tag: Option<u32>,
    pub level: CacheLevel,
    pub memory_accessed: bool,
}

/// One set-associative cache level.
///
/// Blocks live in a single flat array indexed `set * ways + way`; sets are
/// never reallocated after construction and `reset` rewrites them in place.
/// The access clock is local to the instance, which keeps LRU/FIFO/LFU a
/// linear scan over at most `ways` candidates.
pub struct Cache {
    config: CacheConfig,
    geometry: Geometry,
    level: CacheLevel,
    blocks: Vec<CacheBlock>,
    clock: u64,
    stats: CacheStats,
    seed: u64,
    rng: StdRng,
}

impl Cache {
    pub fn new(config: CacheConfig) -> Result<Self, ConfigError> {
        Self::with_seed(config, CacheLevel::L1, DEFAULT_SEED)
    }

    pub fn with_level(config: CacheConfig, level: CacheLevel) -> Result<Self, ConfigError> {
        Self::with_seed(config, level, DEFAULT_SEED)
    }

    /// The seed drives RANDOM eviction only; deterministic policies ignore it.
    pub fn with_seed(
        config: CacheConfig,
        level: CacheLevel,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let geometry = Geometry::from_config(&config);
        let num_blocks = config.num_blocks() as usize;
        Ok(Self {
            config,
            geometry,
            level,
            blocks: vec![CacheBlock::default(); num_blocks],
            clock: 0,
            stats: CacheStats::default(),
            seed,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn level(&self) -> CacheLevel {
        self.level
    }

    pub fn access(&mut self, address: u32, is_write: bool) -> AccessResult {
        self.clock += 1;
        let now = self.clock;
        let parts = self.geometry.split(address);
        let ways = self.geometry.ways as usize;
        let base = parts.index as usize * ways;
        let write_back = self.config.write_policy == WritePolicy::WriteBack;

        let set = &mut self.blocks[base..base + ways];
        for (way, block) in set.iter_mut().enumerate() {
            if block.valid && block.tag == parts.tag {
                self.stats.record_hit();
                policy::touch_on_hit(self.config.policy, block, now);
                if is_write && write_back {
                    block.dirty = true;
                }
                return AccessResult {
                    hit: true,
                    set_index: parts.index,
                    way_index: way as u32,
                    tag: parts.tag,
                    evicted: false,
                    evicted_tag: None,
                    level: self.level,
                    memory_accessed: false,
                };
            }
        }

        // Miss. A free way is used before the policy is ever consulted.
        self.stats.record_miss();
        let victim = match set.iter().position(|b| !b.valid) {
            Some(free) => free,
            None => policy::victim_way(self.config.policy, set, &mut self.rng),
        };
        let evicted = set[victim].valid;
        let evicted_tag = evicted.then_some(set[victim].tag);
        if evicted && set[victim].dirty {
            self.stats.record_writeback();
        }
        set[victim].install(parts.tag, now, is_write && write_back);

        AccessResult {
            hit: false,
            set_index: parts.index,
            way_index: victim as u32,
            tag: parts.tag,
            evicted,
            evicted_tag,
            level: self.level,
            memory_accessed: false,
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Deep snapshot of every set, outermost index = set, inner = way.
    pub fn sets(&self) -> Vec<Vec<CacheBlock>> {
        self.blocks
            .chunks(self.geometry.ways as usize)
            .map(|set| set.to_vec())
            .collect()
    }

    /// Back to the construction-time state: blocks invalid, counters zero,
    /// RANDOM reseeded so a replay behaves like a fresh instance.
    pub fn reset(&mut self) {
        for block in &mut self.blocks {
            block.clear();
        }
        self.clock = 0;
        self.stats = CacheStats::default();
        self.rng = StdRng::seed_from_u64(self.seed);
    }

    pub fn calculate_amat(&self, hit_time: f64, miss_penalty: f64) -> f64 {
        hit_time + (1.0 - self.stats.hit_rate()) * miss_penalty
    }
}
