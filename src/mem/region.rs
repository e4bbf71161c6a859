use serde::Serialize;

pub const NUM_REGIONS: usize = 16;

/// One slice of the observed working set. Boundaries move as the observed
/// address range grows; counters stay with their region index, so only the
/// snapshot taken after an access is authoritative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MemoryRegion {
    pub start_address: u32,
    pub end_address: u32,
    pub access_count: u64,
    pub read_count: u64,
    pub write_count: u64,
    pub last_access_time: u64,
}

/// Heat map over the observed address range, kept tight to [min, max] seen
/// so far. A fresh or reset map reports all-zero regions.
#[derive(Debug, Clone)]
pub struct RegionMap {
    regions: [MemoryRegion; NUM_REGIONS],
    min_seen: u32,
    max_seen: u32,
    touched: bool,
}

impl Default for RegionMap {
    fn default() -> Self {
        Self::new()
    }
}

impl RegionMap {
    pub fn new() -> Self {
        Self {
            regions: [MemoryRegion::default(); NUM_REGIONS],
            min_seen: 0,
            max_seen: 0,
            touched: false,
        }
    }

    /// Folds one wrapped address in and returns the index of the region that
    /// absorbed it.
    pub fn record(&mut self, address: u32, is_write: bool, now: u64) -> usize {
        if self.touched {
            self.min_seen = self.min_seen.min(address);
            self.max_seen = self.max_seen.max(address);
        } else {
            self.min_seen = address;
            self.max_seen = address;
            self.touched = true;
        }
        self.rebound();

        let idx = self.region_of(address);
        let region = &mut self.regions[idx];
        region.access_count += 1;
        if is_write {
            region.write_count += 1;
        } else {
            region.read_count += 1;
        }
        region.last_access_time = now;
        idx
    }

    pub fn snapshot(&self) -> Vec<MemoryRegion> {
        self.regions.to_vec()
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn region_size(&self) -> u64 {
        let span = (self.max_seen - self.min_seen) as u64 + 1;
        span.div_ceil(NUM_REGIONS as u64)
    }

    fn region_of(&self, address: u32) -> usize {
        let offset = (address - self.min_seen) as u64;
        ((offset / self.region_size()) as usize).min(NUM_REGIONS - 1)
    }

    // Spread [min_seen, max_seen] evenly over the sixteen regions.
    fn rebound(&mut self) {
        let size = self.region_size();
        for (i, region) in self.regions.iter_mut().enumerate() {
            let start = self.min_seen as u64 + i as u64 * size;
            let end = start + size - 1;
            region.start_address = start.min(u32::MAX as u64) as u32;
            region.end_address = end.min(u32::MAX as u64) as u32;
        }
    }
}
