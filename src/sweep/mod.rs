mod compare;
mod multi;
mod single;

pub use compare::{
    compare_configs, ComparisonEntry, ComparisonReport, ComparisonWinners, NamedConfig,
};
pub use multi::{run_multi_level_sweep, MultiLevelOptimizationResult, MultiSweepSpec};
pub use single::{run_single_level_sweep, OptimizationResult, SingleSweepSpec};
