/// One cache level's contribution to the closed-form AMAT: its hit time and
/// observed hit rate. A level with zero accesses reports hit rate 0, which
/// the formula treats as always-miss.
#[derive(Debug, Clone, Copy)]
pub struct LevelTerm {
    pub hit_time: f64,
    pub hit_rate: f64,
}

/// Average memory access time over whichever levels are present.
pub fn amat(l1: Option<LevelTerm>, l2: Option<LevelTerm>, memory_penalty: f64) -> f64 {
    match (l1, l2) {
        (None, None) => memory_penalty,
        (Some(only), None) | (None, Some(only)) => {
            only.hit_time + (1.0 - only.hit_rate) * memory_penalty
        }
        (Some(l1), Some(l2)) => {
            l1.hit_time
                + (1.0 - l1.hit_rate) * (l2.hit_time + (1.0 - l2.hit_rate) * memory_penalty)
        }
    }
}
