use rand::rngs::StdRng;
use rand::Rng;

use super::block::CacheBlock;
use super::config::ReplacementPolicy;

/// Picks the victim way in a set where every way is valid. Free ways are the
/// cache's business; the policy never sees a set with an invalid block.
///
/// Tie-breaks resolve to the lowest way index. LFU breaks count ties on
/// recency first, so two equally-cold blocks fall back to LRU order.
pub(crate) fn victim_way(
    policy: ReplacementPolicy,
    set: &[CacheBlock],
    rng: &mut StdRng,
) -> usize {
    debug_assert!(set.iter().all(|b| b.valid));
    match policy {
        ReplacementPolicy::Lru => min_way(set, |b| b.last_access_time),
        ReplacementPolicy::Fifo => min_way(set, |b| b.insertion_time),
        ReplacementPolicy::Lfu => min_way(set, |b| (b.access_count, b.last_access_time)),
        ReplacementPolicy::Random => rng.gen_range(0..set.len()),
    }
}

/// Policy-side bookkeeping for a hit. FIFO deliberately leaves the insertion
/// stamp alone; RANDOM keeps no state at all.
pub(crate) fn touch_on_hit(policy: ReplacementPolicy, block: &mut CacheBlock, now: u64) {
    match policy {
        ReplacementPolicy::Lru => {
            block.last_access_time = now;
        }
        ReplacementPolicy::Lfu => {
            block.access_count = block.access_count.saturating_add(1);
            block.last_access_time = now;
        }
        ReplacementPolicy::Fifo | ReplacementPolicy::Random => {}
    }
}

// Strict less-than keeps the first (lowest-index) way on ties.
fn min_way<K: Ord>(set: &[CacheBlock], key: impl Fn(&CacheBlock) -> K) -> usize {
    let mut min_idx = 0;
    for (idx, block) in set.iter().enumerate().skip(1) {
        if key(block) < key(&set[min_idx]) {
            min_idx = idx;
        }
    }
    min_idx
}
