use serde::Serialize;

use crate::cache::CacheStats;
use crate::hierarchy::{Hierarchy, L1_HIT_CYCLES, L2_HIT_CYCLES};
use crate::mem::MemoryStats;

/// Flattened view of one level's counters for JSON output.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LevelSummary {
    pub hits: u64,
    pub misses: u64,
    pub total_accesses: u64,
    pub writebacks: u64,
    pub hit_rate: f64,
}

impl From<CacheStats> for LevelSummary {
    fn from(stats: CacheStats) -> Self {
        Self {
            hits: stats.hits(),
            misses: stats.misses(),
            total_accesses: stats.total_accesses(),
            writebacks: stats.writebacks(),
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Everything one replay produced, ready for `serde_json`.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub trace_length: usize,
    pub skipped_lines: usize,
    pub l1: Option<LevelSummary>,
    pub l2: Option<LevelSummary>,
    pub combined: LevelSummary,
    pub memory: MemoryStats,
    pub amat: f64,
    pub total_cycles: u64,
}

pub fn summarize(hierarchy: &Hierarchy, trace_length: usize, skipped_lines: usize) -> RunSummary {
    RunSummary {
        trace_length,
        skipped_lines,
        l1: hierarchy.l1().map(|c| c.stats().into()),
        l2: hierarchy.l2().map(|c| c.stats().into()),
        combined: hierarchy.combined_stats().into(),
        memory: hierarchy.memory_stats(),
        amat: hierarchy.calculate_amat(L1_HIT_CYCLES as f64, L2_HIT_CYCLES as f64, None),
        total_cycles: hierarchy.total_cycles(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::HierarchyConfig;
    use crate::mem::MemoryConfig;

    #[test]
    fn summary_reflects_replayed_trace() {
        let mut hierarchy =
            Hierarchy::new(HierarchyConfig::default(), MemoryConfig::default()).unwrap();
        hierarchy.access(0x0, false);
        hierarchy.access(0x0, false);

        let summary = summarize(&hierarchy, 2, 0);
        assert_eq!(summary.trace_length, 2);
        let l1 = summary.l1.unwrap();
        assert_eq!(l1.hits, 1);
        assert_eq!(l1.misses, 1);
        assert_eq!(summary.combined.total_accesses, 2);
        assert!(summary.amat > 1.0);
        assert!(summary.total_cycles > 0);
        assert!(serde_json::to_string(&summary).is_ok());
    }
}
