use rand::rngs::StdRng;
use rand::Rng;
use serde::Serialize;

use crate::sim::trace::Access;

use super::config::{GeometryHint, PatternKind, StressLevel, TrafficConfig};

/// Addresses one megabyte apart share a set index in any cache up to 1 MiB,
/// which is what the LRU-killer pattern relies on.
const CONFLICT_STRIDE: u32 = 1 << 20;

const SEQUENTIAL_WRITE_FRACTION: f64 = 0.25;
const RANDOM_WRITE_FRACTION: f64 = 0.30;
const WORKING_SET_WRITE_FRACTION: f64 = 0.125;
const ZIPF_WRITE_FRACTION: f64 = 0.20;

/// Documentation contract for one generator: what it emits, what it is
/// meant to expose, and how the stress level tunes it.
#[derive(Debug, Clone, Serialize)]
pub struct PatternInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub tests: &'static str,
    pub expected: &'static str,
    pub tuning: String,
}

/// Dispatches on the configured pattern kind.
pub fn generate(config: &TrafficConfig, hint: &GeometryHint, rng: &mut StdRng) -> Vec<Access> {
    let base = config.base_address;
    let count = config.count;
    let stress = config.stress;
    match config.pattern {
        PatternKind::Sequential => {
            generate_sequential(base, count, config.stride, hint, stress, rng)
        }
        PatternKind::Random => generate_random(base, count, hint, stress, rng),
        PatternKind::Strided => generate_strided(base, count, hint, stress),
        PatternKind::Temporal => generate_temporal(base, count, hint, stress),
        PatternKind::WorkingSet => generate_working_set(base, count, hint, stress, rng),
        PatternKind::Thrashing => generate_thrashing(base, count, hint, stress),
        PatternKind::LruKiller => generate_lru_killer(base, count, stress),
        PatternKind::Zipfian => generate_zipfian(base, count, hint, stress, rng),
        PatternKind::ScanReuse => generate_scan_reuse(base, count, hint, stress),
    }
}

/// Linear walk in block-sized (or caller-chosen) strides, wrapped inside the
/// stress-scaled working set. Roughly a quarter of the samples are writes.
pub fn generate_sequential(
    base: u32,
    count: usize,
    stride: u32,
    hint: &GeometryHint,
    stress: StressLevel,
    rng: &mut StdRng,
) -> Vec<Access> {
    let stride = stride.max(hint.block_bytes / 4).max(1);
    let start = align_down(base, hint.block_bytes);
    let span = hint.working_set_bytes(stress) as u64;
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let offset = (i as u64 * stride as u64) % span;
        out.push(Access {
            address: start.wrapping_add(offset as u32),
            is_write: rng.gen_bool(SEQUENTIAL_WRITE_FRACTION),
        });
    }
    out
}

/// Uniform block-aligned addresses inside the working set.
pub fn generate_random(
    base: u32,
    count: usize,
    hint: &GeometryHint,
    stress: StressLevel,
    rng: &mut StdRng,
) -> Vec<Access> {
    let start = align_down(base, hint.block_bytes);
    let span = hint.working_set_bytes(stress);
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let offset = align_down(rng.gen_range(0..span), hint.block_bytes);
        out.push(Access {
            address: start.wrapping_add(offset),
            is_write: rng.gen_bool(RANDOM_WRITE_FRACTION),
        });
    }
    out
}

/// Fixed stride of `set_bytes * multiplier`, read-only. At multiplier 1.0
/// every access lands in the same set and associativity decides everything.
pub fn generate_strided(
    base: u32,
    count: usize,
    hint: &GeometryHint,
    stress: StressLevel,
) -> Vec<Access> {
    let stride = ((hint.set_bytes() as f64 * stress.stride_multiplier()) as u32)
        .max(hint.block_bytes);
    let stride = align_down(stride, hint.block_bytes).max(hint.block_bytes);
    let span = (hint.working_set_bytes(stress) as u64).max(stride as u64 * 2);
    let start = align_down(base, hint.block_bytes);
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let offset = (i as u64 * stride as u64) % span;
        out.push(Access::read(
            start.wrapping_add(align_down(offset as u32, hint.block_bytes)),
        ));
    }
    out
}

/// Hot/cold mix: a small hot set revisited with a frequency gradient (lower
/// block indices more often), then one pass over a disjoint cold set. LFU
/// keeps the gradient's head; LRU forgets it during the cold scan.
pub fn generate_temporal(
    base: u32,
    count: usize,
    hint: &GeometryHint,
    stress: StressLevel,
) -> Vec<Access> {
    let block = hint.block_bytes;
    let ws = hint.working_set_bytes(stress) as f64;
    let (hot_ratio, cold_ratio) = stress.hot_cold_ratios();
    let hot_blocks = (((ws * hot_ratio) as u32 / block).max(1)) as u64;
    let cold_blocks = (((ws * cold_ratio) as u32 / block).max(1)) as u64;
    let hot_base = align_down(base, block);
    let cold_base = hot_base.wrapping_add((hot_blocks as u32).wrapping_mul(block));

    let mut out = Vec::with_capacity(count);
    'outer: loop {
        for idx in 0..hot_blocks {
            // 3.. down to 1 repeats across the hot range.
            let repeats = 1 + (2 * (hot_blocks - idx)) / hot_blocks;
            for _ in 0..repeats {
                if out.len() == count {
                    break 'outer;
                }
                out.push(Access::read(
                    hot_base.wrapping_add(idx as u32 * block),
                ));
            }
        }
        for idx in 0..cold_blocks {
            if out.len() == count {
                break 'outer;
            }
            out.push(Access::read(
                cold_base.wrapping_add(idx as u32 * block),
            ));
        }
    }
    out
}

/// Cycles block-by-block over a window of exactly the working-set size.
pub fn generate_working_set(
    base: u32,
    count: usize,
    hint: &GeometryHint,
    stress: StressLevel,
    rng: &mut StdRng,
) -> Vec<Access> {
    let block = hint.block_bytes;
    let window_blocks = (hint.working_set_bytes(stress) / block).max(1) as u64;
    let start = align_down(base, block);
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let idx = (i as u64 % window_blocks) as u32;
        out.push(Access {
            address: start.wrapping_add(idx * block),
            is_write: rng.gen_bool(WORKING_SET_WRITE_FRACTION),
        });
    }
    out
}

/// Read-only loop over a window deliberately larger than L1, so every block
/// is evicted before its next use.
pub fn generate_thrashing(
    base: u32,
    count: usize,
    hint: &GeometryHint,
    stress: StressLevel,
) -> Vec<Access> {
    let block = hint.block_bytes;
    let window = (hint.cache_size_bytes as f64 * stress.thrash_factor()) as u32;
    let window_blocks = (window / block).max(2) as u64;
    let start = align_down(base, block);
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let idx = (i as u64 % window_blocks) as u32;
        out.push(Access::read(start.wrapping_add(idx * block)));
    }
    out
}

/// Cycles over slightly more same-set tags than the targeted associativity,
/// spaced 1 MiB apart. Under LRU every access misses; RANDOM keeps a few.
pub fn generate_lru_killer(base: u32, count: usize, stress: StressLevel) -> Vec<Access> {
    let tags = (stress.conflict_ways() + stress.extra_conflict_blocks()) as u64;
    let start = align_down(base, CONFLICT_STRIDE);
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let idx = (i as u64 % tags) as u32;
        out.push(Access::read(start.wrapping_add(idx.wrapping_mul(CONFLICT_STRIDE))));
    }
    out
}

/// Inverse-CDF samples from a normalized 1/i^skew distribution over the
/// working set's blocks.
pub fn generate_zipfian(
    base: u32,
    count: usize,
    hint: &GeometryHint,
    stress: StressLevel,
    rng: &mut StdRng,
) -> Vec<Access> {
    let block = hint.block_bytes;
    let items = ((hint.working_set_bytes(stress) / block).max(8)) as usize;
    let skew = stress.zipf_skew();

    let mut cdf = Vec::with_capacity(items);
    let mut total = 0.0;
    for i in 0..items {
        total += 1.0 / ((i + 1) as f64).powf(skew);
        cdf.push(total);
    }
    for weight in &mut cdf {
        *weight /= total;
    }

    let start = align_down(base, block);
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let u: f64 = rng.gen();
        let item = cdf.partition_point(|&w| w < u).min(items - 1);
        out.push(Access {
            address: start.wrapping_add(item as u32 * block),
            is_write: rng.gen_bool(ZIPF_WRITE_FRACTION),
        });
    }
    out
}

/// Forward scan over the working set, then a reverse pass over its tail.
/// The reused tail rewards policies that kept the most recent blocks.
pub fn generate_scan_reuse(
    base: u32,
    count: usize,
    hint: &GeometryHint,
    stress: StressLevel,
) -> Vec<Access> {
    let block = hint.block_bytes;
    let scan_blocks = ((hint.working_set_bytes(stress) / block).max(2)) as u64;
    let reuse_blocks = ((scan_blocks as f64 * stress.reuse_fraction()) as u64).max(1);
    let start = align_down(base, block);
    let mut out = Vec::with_capacity(count);
    'outer: loop {
        for idx in 0..scan_blocks {
            if out.len() == count {
                break 'outer;
            }
            out.push(Access::read(start.wrapping_add(idx as u32 * block)));
        }
        for back in 0..reuse_blocks {
            if out.len() == count {
                break 'outer;
            }
            let idx = (scan_blocks - 1 - back) as u32;
            out.push(Access::read(start.wrapping_add(idx * block)));
        }
    }
    out
}

pub fn pattern_info(kind: PatternKind, stress: StressLevel) -> PatternInfo {
    let ws = stress.working_set_ratio();
    match kind {
        PatternKind::Sequential => PatternInfo {
            name: "sequential",
            description: "Linear walk in fixed strides with ~25% writes",
            tests: "Spatial locality and block-size amortization",
            expected: "High hit rate once the working set fits; misses once per block otherwise",
            tuning: format!("working set {ws}x L1, stride at least block/4"),
        },
        PatternKind::Random => PatternInfo {
            name: "random",
            description: "Uniform block-aligned addresses with ~30% writes",
            tests: "Behavior with no locality at all",
            expected: "Hit rate tracks the fraction of the working set the cache can hold",
            tuning: format!("addresses drawn from a {ws}x L1 range"),
        },
        PatternKind::Strided => PatternInfo {
            name: "strided",
            description: "Read-only stride of set_bytes times a stress multiplier",
            tests: "Set-conflict behavior and associativity",
            expected: "Severe conflict misses when the stride aliases into few sets",
            tuning: format!(
                "stride multiplier {} over one set's span",
                stress.stride_multiplier()
            ),
        },
        PatternKind::Temporal => PatternInfo {
            name: "temporal",
            description: "Gradient-weighted hot set plus a cold scan each round",
            tests: "Frequency vs recency: LFU against LRU",
            expected: "LFU retains the hot head through cold scans; LRU churns",
            tuning: format!("hot/cold ratios {:?} of the working set", stress.hot_cold_ratios()),
        },
        PatternKind::WorkingSet => PatternInfo {
            name: "working_set",
            description: "Round-robin over a fixed window with ~12.5% writes",
            tests: "Capacity: window fits or it does not",
            expected: "Near-perfect hits below capacity, steady misses above",
            tuning: format!("window {ws}x L1 capacity"),
        },
        PatternKind::Thrashing => PatternInfo {
            name: "thrashing",
            description: "Read-only cycle over a window larger than L1",
            tests: "Eviction before reuse under every policy",
            expected: "Hit rate collapses as the factor grows",
            tuning: format!("window {}x L1 capacity", stress.thrash_factor()),
        },
        PatternKind::LruKiller => PatternInfo {
            name: "lru_killer",
            description: "Same-set tags cycled 1 MiB apart, one more than fits",
            tests: "Worst case for recency-ordered eviction",
            expected: "Zero hits under LRU/FIFO at matching associativity; RANDOM saves some",
            tuning: format!(
                "{} tags against {}-way sets",
                stress.conflict_ways() + stress.extra_conflict_blocks(),
                stress.conflict_ways()
            ),
        },
        PatternKind::Zipfian => PatternInfo {
            name: "zipfian",
            description: "Zipf-distributed block popularity with ~20% writes",
            tests: "Skewed reuse typical of real workloads",
            expected: "Hot blocks stay resident; tail misses dominate at low skew",
            tuning: format!("skew {} over {ws}x L1 blocks", stress.zipf_skew()),
        },
        PatternKind::ScanReuse => PatternInfo {
            name: "scan_reuse",
            description: "Forward scan followed by reverse reuse of the tail",
            tests: "Retention of recently streamed data",
            expected: "Policies holding the scan tail convert the reuse pass to hits",
            tuning: format!(
                "reuse tail {}% of a {ws}x L1 scan",
                (stress.reuse_fraction() * 100.0) as u32
            ),
        },
    }
}

fn align_down(addr: u32, block: u32) -> u32 {
    addr & !(block - 1)
}
