use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::cache::{Cache, CacheConfig, CacheLevel, ReplacementPolicy, WritePolicy};
use crate::hierarchy::L1_HIT_CYCLES;
use crate::mem::MemoryConfig;
use crate::sim::config::Config;
use crate::sim::trace::Access;

/// Cartesian product of single-level candidates. Combinations that violate
/// the geometry invariants never make it into the result list.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SingleSweepSpec {
    pub cache_sizes_kb: Vec<u32>,
    pub associativities: Vec<u32>,
    pub block_sizes: Vec<u32>,
    pub policies: Vec<ReplacementPolicy>,
    pub write_policy: WritePolicy,
    pub seed: u64,
}

impl Config for SingleSweepSpec {}

impl Default for SingleSweepSpec {
    fn default() -> Self {
        Self {
            cache_sizes_kb: vec![4, 16, 64],
            associativities: vec![1, 2, 4],
            block_sizes: vec![32, 64],
            policies: vec![
                ReplacementPolicy::Lru,
                ReplacementPolicy::Fifo,
                ReplacementPolicy::Lfu,
                ReplacementPolicy::Random,
            ],
            write_policy: WritePolicy::WriteBack,
            seed: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct OptimizationResult {
    pub config: CacheConfig,
    pub hit_rate: f64,
    pub amat: f64,
    pub score: f64,
}

/// Replays the trace against every valid candidate and ranks by a
/// cost-adjusted score: `(1/AMAT) / (1 + log2(size_kb) * 0.1)`. A stable
/// sort keeps equal scores in enumeration order, so non-RANDOM sweeps are
/// bitwise reproducible.
pub fn run_single_level_sweep(
    trace: &[Access],
    spec: &SingleSweepSpec,
    memory: &MemoryConfig,
) -> Vec<OptimizationResult> {
    let mut results = Vec::new();
    for &size_kb in &spec.cache_sizes_kb {
        for &ways in &spec.associativities {
            for &block_bytes in &spec.block_sizes {
                for &policy in &spec.policies {
                    let config = CacheConfig {
                        size_bytes: size_kb * 1024,
                        block_bytes,
                        ways,
                        policy,
                        write_policy: spec.write_policy,
                    };
                    if let Some(result) = evaluate(trace, config, memory, spec.seed) {
                        results.push(result);
                    }
                }
            }
        }
    }
    results.sort_by(by_score_descending);
    results
}

fn evaluate(
    trace: &[Access],
    config: CacheConfig,
    memory: &MemoryConfig,
    seed: u64,
) -> Option<OptimizationResult> {
    let mut cache = Cache::with_seed(config, CacheLevel::L1, seed).ok()?;
    for access in trace {
        cache.access(access.address, access.is_write);
    }
    let amat = cache.calculate_amat(L1_HIT_CYCLES as f64, memory.latency_cycles as f64);
    Some(OptimizationResult {
        config,
        hit_rate: cache.stats().hit_rate(),
        amat,
        score: score(amat, config.size_kb(), 0.1),
    })
}

pub(crate) fn score(amat: f64, total_size_kb: f64, cost_coefficient: f64) -> f64 {
    let cost_factor = total_size_kb.log2() * cost_coefficient;
    (1.0 / amat) / (1.0 + cost_factor)
}

pub(crate) fn by_score_descending<T>(a: &T, b: &T) -> Ordering
where
    T: HasScore,
{
    b.score()
        .partial_cmp(&a.score())
        .unwrap_or(Ordering::Equal)
}

pub(crate) trait HasScore {
    fn score(&self) -> f64;
}

impl HasScore for OptimizationResult {
    fn score(&self) -> f64 {
        self.score
    }
}
