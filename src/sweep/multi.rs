use serde::{Deserialize, Serialize};

use crate::cache::{CacheConfig, ReplacementPolicy, WritePolicy};
use crate::hierarchy::{Hierarchy, HierarchyConfig, L1_HIT_CYCLES, L2_HIT_CYCLES};
use crate::mem::MemoryConfig;
use crate::sim::config::Config;
use crate::sim::trace::Access;

use super::single::{by_score_descending, score, HasScore};

/// Two-level candidates: every (L1, L2) pairing of the given lists where the
/// L2 is strictly larger than the L1. Block size and policy are shared by
/// both levels of one candidate.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MultiSweepSpec {
    pub l1_sizes_kb: Vec<u32>,
    pub l2_sizes_kb: Vec<u32>,
    pub l1_ways: Vec<u32>,
    pub l2_ways: Vec<u32>,
    pub block_sizes: Vec<u32>,
    pub policies: Vec<ReplacementPolicy>,
    pub write_policy: WritePolicy,
    pub seed: u64,
}

impl Config for MultiSweepSpec {}

impl Default for MultiSweepSpec {
    fn default() -> Self {
        Self {
            l1_sizes_kb: vec![4, 16],
            l2_sizes_kb: vec![64, 256],
            l1_ways: vec![2, 4],
            l2_ways: vec![4, 8],
            block_sizes: vec![64],
            policies: vec![ReplacementPolicy::Lru],
            write_policy: WritePolicy::WriteBack,
            seed: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct MultiLevelOptimizationResult {
    pub config: HierarchyConfig,
    pub l1_hit_rate: f64,
    pub l2_hit_rate: f64,
    pub amat: f64,
    pub total_size_kb: f64,
    pub score: f64,
}

impl HasScore for MultiLevelOptimizationResult {
    fn score(&self) -> f64 {
        self.score
    }
}

/// The multi-level cost coefficient is half the single-level one: doubling
/// capacity across two levels is cheaper than in one monolithic array.
pub fn run_multi_level_sweep(
    trace: &[Access],
    spec: &MultiSweepSpec,
    memory: &MemoryConfig,
) -> Vec<MultiLevelOptimizationResult> {
    let mut results = Vec::new();
    for &l1_kb in &spec.l1_sizes_kb {
        for &l2_kb in &spec.l2_sizes_kb {
            if l2_kb <= l1_kb {
                continue;
            }
            for &l1_ways in &spec.l1_ways {
                for &l2_ways in &spec.l2_ways {
                    for &block_bytes in &spec.block_sizes {
                        for &policy in &spec.policies {
                            let config = HierarchyConfig {
                                l1: CacheConfig {
                                    size_bytes: l1_kb * 1024,
                                    block_bytes,
                                    ways: l1_ways,
                                    policy,
                                    write_policy: spec.write_policy,
                                },
                                l2: CacheConfig {
                                    size_bytes: l2_kb * 1024,
                                    block_bytes,
                                    ways: l2_ways,
                                    policy,
                                    write_policy: spec.write_policy,
                                },
                                l1_enabled: true,
                                l2_enabled: true,
                            };
                            if let Some(result) = evaluate(trace, config, memory, spec.seed) {
                                results.push(result);
                            }
                        }
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
    config: HierarchyConfig,
    memory: &MemoryConfig,
    seed: u64,
) -> Option<MultiLevelOptimizationResult> {
    let mut hierarchy = Hierarchy::with_seed(config, *memory, seed).ok()?;
    for access in trace {
        hierarchy.access(access.address, access.is_write);
    }
    let amat = hierarchy.calculate_amat(L1_HIT_CYCLES as f64, L2_HIT_CYCLES as f64, None);
    let total_size_kb = config.l1.size_kb() + config.l2.size_kb();
    Some(MultiLevelOptimizationResult {
        config,
        l1_hit_rate: hierarchy.l1().map(|c| c.stats().hit_rate()).unwrap_or(0.0),
        l2_hit_rate: hierarchy.l2().map(|c| c.stats().hit_rate()).unwrap_or(0.0),
        amat,
        total_size_kb,
        score: score(amat, total_size_kb, 0.05),
    })
}
