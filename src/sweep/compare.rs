use log::warn;
use serde::{Deserialize, Serialize};

use crate::cache::CacheStats;
use crate::hierarchy::{Hierarchy, HierarchyConfig, L1_HIT_CYCLES, L2_HIT_CYCLES};
use crate::mem::{MemoryConfig, MemoryStats};
use crate::sim::trace::Access;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NamedConfig {
    pub name: String,
    pub config: HierarchyConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonEntry {
    pub name: String,
    pub l1_stats: Option<CacheStats>,
    pub l2_stats: Option<CacheStats>,
    pub combined_hit_rate: f64,
    pub amat: f64,
    pub total_cycles: u64,
    pub memory_stats: MemoryStats,
}

/// Indices into the entry list, one winner per metric. Ties go to the
/// earliest entry in input order.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ComparisonWinners {
    pub best_hit_rate: usize,
    pub lowest_amat: usize,
    pub lowest_total_cycles: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub entries: Vec<ComparisonEntry>,
    pub winners: Option<ComparisonWinners>,
}

/// Replays one trace against every named configuration with a fresh engine
/// each, then picks winners per metric. An empty trace yields an empty
/// report rather than an error; a config that fails validation is dropped
/// with a warning.
pub fn compare_configs(
    trace: &[Access],
    configs: &[NamedConfig],
    memory: &MemoryConfig,
    seed: u64,
) -> ComparisonReport {
    if trace.is_empty() {
        return ComparisonReport {
            entries: Vec::new(),
            winners: None,
        };
    }

    let mut entries = Vec::with_capacity(configs.len());
    for named in configs {
        let mut hierarchy = match Hierarchy::with_seed(named.config, *memory, seed) {
            Ok(h) => h,
            Err(err) => {
                warn!("skipping '{}': {}", named.name, err);
                continue;
            }
        };
        for access in trace {
            hierarchy.access(access.address, access.is_write);
        }
        entries.push(ComparisonEntry {
            name: named.name.clone(),
            l1_stats: hierarchy.l1().map(|c| c.stats()),
            l2_stats: hierarchy.l2().map(|c| c.stats()),
            combined_hit_rate: combined_hit_rate(&hierarchy),
            amat: hierarchy.calculate_amat(L1_HIT_CYCLES as f64, L2_HIT_CYCLES as f64, None),
            total_cycles: hierarchy.total_cycles(),
            memory_stats: hierarchy.memory_stats(),
        });
    }

    let winners = pick_winners(&entries);
    ComparisonReport { entries, winners }
}

// Inclusion-exclusion over the enabled levels: an access hits the hierarchy
// if it hits L1, or misses L1 and hits L2.
fn combined_hit_rate(hierarchy: &Hierarchy) -> f64 {
    match (hierarchy.l1(), hierarchy.l2()) {
        (Some(l1), Some(l2)) => {
            let l1_rate = l1.stats().hit_rate();
            l1_rate + (1.0 - l1_rate) * l2.stats().hit_rate()
        }
        (Some(l1), None) => l1.stats().hit_rate(),
        (None, Some(l2)) => l2.stats().hit_rate(),
        (None, None) => 0.0,
    }
}

fn pick_winners(entries: &[ComparisonEntry]) -> Option<ComparisonWinners> {
    if entries.is_empty() {
        return None;
    }
    let mut winners = ComparisonWinners {
        best_hit_rate: 0,
        lowest_amat: 0,
        lowest_total_cycles: 0,
    };
    for (idx, entry) in entries.iter().enumerate().skip(1) {
        if entry.combined_hit_rate > entries[winners.best_hit_rate].combined_hit_rate {
            winners.best_hit_rate = idx;
        }
        if entry.amat < entries[winners.lowest_amat].amat {
            winners.lowest_amat = idx;
        }
        if entry.total_cycles < entries[winners.lowest_total_cycles].total_cycles {
            winners.lowest_total_cycles = idx;
        }
    }
    Some(winners)
}
