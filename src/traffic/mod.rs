mod config;
mod patterns;

pub use config::{GeometryHint, PatternKind, StressLevel, TrafficConfig};
pub use patterns::{
    generate, generate_lru_killer, generate_random, generate_scan_reuse, generate_sequential,
    generate_strided, generate_temporal, generate_thrashing, generate_working_set,
    generate_zipfian, pattern_info, PatternInfo,
};
