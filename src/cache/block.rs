use serde::Serialize;

/// One cache block plus the metadata every replacement policy draws on.
/// Blocks are allocated once at construction and reused in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheBlock {
    pub valid: bool,
    pub dirty: bool,
    pub tag: u32,
    pub last_access_time: u64,
    pub insertion_time: u64,
    pub access_count: u64,
}

impl CacheBlock {
    pub fn clear(&mut self) {
        *self = CacheBlock::default();
    }

    /// Stamps the block with a freshly installed tag. The installing access
    /// itself counts as the first use.
    pub fn install(&mut self, tag: u32, now: u64, dirty: bool) {
        self.valid = true;
        self.dirty = dirty;
        self.tag = tag;
        self.last_access_time = now;
        self.insertion_time = now;
        self.access_count = 1;
    }
}
