use crate::cache::{Cache, CacheLevel, CacheStats, ConfigError, DEFAULT_SEED};
use crate::mem::{MainMemory, MemoryConfig, MemoryRegion, MemoryStats};

use super::amat::{amat, LevelTerm};
use super::config::HierarchyConfig;
use super::result::{DataPath, HierarchyAccessResult, MemoryLevel};

pub const L1_HIT_CYCLES: u64 = 1;
pub const L2_HIT_CYCLES: u64 = 10;

// Memory transfer granularity when no cache level supplies a block size.
const FALLBACK_BLOCK_BYTES: u32 = 64;

/// Routes each access L1 → L2 → memory with independent lookups per level:
/// no inclusion or exclusion is enforced between levels, and each level
/// updates its own state on the same address. Every visited level charges
/// its hit time even when it misses.
pub struct Hierarchy {
    config: HierarchyConfig,
    l1: Option<Cache>,
    l2: Option<Cache>,
    memory: MainMemory,
    combined: CacheStats,
    total_cycles: u64,
}

impl Hierarchy {
    pub fn new(config: HierarchyConfig, memory: MemoryConfig) -> Result<Self, ConfigError> {
        Self::with_seed(config, memory, DEFAULT_SEED)
    }

    pub fn with_seed(
        config: HierarchyConfig,
        memory: MemoryConfig,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let l1 = config
            .l1_enabled
            .then(|| Cache::with_seed(config.l1, CacheLevel::L1, seed))
            .transpose()?;
        // Decorrelate the two RANDOM streams while staying a pure function
        // of the caller's seed.
        let l2 = config
            .l2_enabled
            .then(|| Cache::with_seed(config.l2, CacheLevel::L2, seed.wrapping_add(1)))
            .transpose()?;
        Ok(Self {
            config,
            l1,
            l2,
            memory: MainMemory::new(memory),
            combined: CacheStats::default(),
            total_cycles: 0,
        })
    }

    pub fn config(&self) -> &HierarchyConfig {
        &self.config
    }

    pub fn l1(&self) -> Option<&Cache> {
        self.l1.as_ref()
    }

    pub fn l2(&self) -> Option<&Cache> {
        self.l2.as_ref()
    }

    pub fn memory(&self) -> &MainMemory {
        &self.memory
    }

    fn transfer_block_bytes(&self) -> u32 {
        if let Some(l1) = &self.l1 {
            l1.config().block_bytes
        } else if let Some(l2) = &self.l2 {
            l2.config().block_bytes
        } else {
            FALLBACK_BLOCK_BYTES
        }
    }

    pub fn access(&mut self, address: u32, is_write: bool) -> HierarchyAccessResult {
        let block_bytes = self.transfer_block_bytes();
        let mut path = DataPath::new();
        let mut latency = 0u64;
        let mut l1_result = None;
        let mut l2_result = None;
        let mut memory_result = None;
        let mut hit = false;

        if let Some(l1) = &mut self.l1 {
            let before = l1.stats().writebacks();
            let result = l1.access(address, is_write);
            latency += L1_HIT_CYCLES;
            path.push(MemoryLevel::L1);
            hit = result.hit;
            l1_result = Some(result);
            if l1.stats().writebacks() > before {
                self.combined.record_writeback();
            }
        }

        if !hit {
            if let Some(l2) = &mut self.l2 {
                let before = l2.stats().writebacks();
                let result = l2.access(address, is_write);
                latency += L2_HIT_CYCLES;
                path.push(MemoryLevel::L2);
                hit = result.hit;
                l2_result = Some(result);
                if l2.stats().writebacks() > before {
                    self.combined.record_writeback();
                }
            }
        }

        if hit {
            self.combined.record_hit();
        } else {
            let result = self.memory.access(address, is_write, block_bytes);
            latency += result.latency_cycles;
            path.push(MemoryLevel::Memory);
            memory_result = Some(result);
            if let Some(r) = &mut l1_result {
                r.memory_accessed = true;
            }
            if let Some(r) = &mut l2_result {
                r.memory_accessed = true;
            }
            self.combined.record_miss();
        }

        self.total_cycles += latency;
        HierarchyAccessResult {
            l1: l1_result,
            l2: l2_result,
            memory: memory_result,
            total_latency_cycles: latency,
            data_path: path,
        }
    }

    /// Hits and misses aggregated across whichever levels are enabled; a hit
    /// anywhere counts once, a miss only when memory was reached.
    pub fn combined_stats(&self) -> CacheStats {
        self.combined
    }

    pub fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    pub fn memory_stats(&self) -> MemoryStats {
        self.memory.stats()
    }

    pub fn memory_regions(&self) -> Vec<MemoryRegion> {
        self.memory.regions()
    }

    /// AMAT from the stats observed so far. `memory_penalty` defaults to the
    /// configured memory latency.
    pub fn calculate_amat(
        &self,
        l1_hit_time: f64,
        l2_hit_time: f64,
        memory_penalty: Option<f64>,
    ) -> f64 {
        let penalty =
            memory_penalty.unwrap_or(self.memory.config().latency_cycles as f64);
        let l1 = self.l1.as_ref().map(|c| LevelTerm {
            hit_time: l1_hit_time,
            hit_rate: c.stats().hit_rate(),
        });
        let l2 = self.l2.as_ref().map(|c| LevelTerm {
            hit_time: l2_hit_time,
            hit_rate: c.stats().hit_rate(),
        });
        amat(l1, l2, penalty)
    }

    pub fn reset(&mut self) {
        if let Some(l1) = &mut self.l1 {
            l1.reset();
        }
        if let Some(l2) = &mut self.l2 {
            l2.reset();
        }
        self.memory.reset();
        self.combined = CacheStats::default();
        self.total_cycles = 0;
    }
}
