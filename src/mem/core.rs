use std::collections::VecDeque;

use serde::Serialize;

use super::config::MemoryConfig;
use super::region::{MemoryRegion, RegionMap};

const HISTORY_CAPACITY: usize = 1000;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct MemoryAccessResult {
    /// Address after wrapping into the physical size.
    pub address: u32,
    pub is_write: bool,
    pub latency_cycles: u64,
    pub bytes_transferred: u64,
    pub region_index: usize,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct MemoryAccessRecord {
    pub cycle: u64,
    pub address: u32,
    pub is_write: bool,
    pub latency_cycles: u64,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct MemoryStats {
    pub total_reads: u64,
    pub total_writes: u64,
    pub total_accesses: u64,
    pub bytes_transferred: u64,
    pub average_latency: f64,
    pub bandwidth_utilization_pct: f64,
    pub peak_bandwidth_mb_s: f64,
    pub effective_bandwidth_mb_s: f64,
}

/// Flat-latency main memory with a burst correction and a 16-region heat map.
///
/// Latency is `latency_cycles` plus the cycles the burst occupies on the bus.
/// The model never stores data; it only accounts for traffic.
pub struct MainMemory {
    config: MemoryConfig,
    size_bytes: u64,
    regions: RegionMap,
    cycle: u64,
    reads: u64,
    writes: u64,
    bytes_transferred: u64,
    total_latency_cycles: u64,
    average_latency: f64,
    peak_bandwidth_mb_s: f64,
    history: VecDeque<MemoryAccessRecord>,
}

impl MainMemory {
    pub fn new(config: MemoryConfig) -> Self {
        Self {
            size_bytes: config.size_bytes(),
            peak_bandwidth_mb_s: config.peak_bandwidth_mb_s(),
            config,
            regions: RegionMap::new(),
            cycle: 0,
            reads: 0,
            writes: 0,
            bytes_transferred: 0,
            total_latency_cycles: 0,
            average_latency: 0.0,
            history: VecDeque::with_capacity(HISTORY_CAPACITY),
        }
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    /// Accounts for one block transfer. `block_size` is the cache block being
    /// filled or written back; the bus burst may be larger and wins.
    pub fn access(&mut self, address: u32, is_write: bool, block_size: u32) -> MemoryAccessResult {
        self.cycle += 1;
        let wrapped = ((address as u64) % self.size_bytes) as u32;
        let region_index = self.regions.record(wrapped, is_write, self.cycle);

        let bus_bytes = self.config.bus_bytes();
        let transfer = (block_size as u64).max(bus_bytes * self.config.burst_length as u64);
        let burst_cycles = transfer.div_ceil(bus_bytes);
        let latency = self.config.latency_cycles as u64 + burst_cycles;

        if is_write {
            self.writes += 1;
        } else {
            self.reads += 1;
        }
        self.bytes_transferred += transfer;
        self.total_latency_cycles += latency;

        // Single-pass running mean over memory accesses only.
        let n = self.reads + self.writes;
        self.average_latency += (latency as f64 - self.average_latency) / n as f64;

        if self.history.len() == HISTORY_CAPACITY {
            self.history.pop_front();
        }
        self.history.push_back(MemoryAccessRecord {
            cycle: self.cycle,
            address: wrapped,
            is_write,
            latency_cycles: latency,
        });

        MemoryAccessResult {
            address: wrapped,
            is_write,
            latency_cycles: latency,
            bytes_transferred: transfer,
            region_index,
        }
    }

    pub fn stats(&self) -> MemoryStats {
        let effective = self.effective_bandwidth_mb_s();
        let utilization = if self.peak_bandwidth_mb_s > 0.0 {
            100.0 * effective / self.peak_bandwidth_mb_s
        } else {
            0.0
        };
        MemoryStats {
            total_reads: self.reads,
            total_writes: self.writes,
            total_accesses: self.reads + self.writes,
            bytes_transferred: self.bytes_transferred,
            average_latency: self.average_latency,
            bandwidth_utilization_pct: utilization,
            peak_bandwidth_mb_s: self.peak_bandwidth_mb_s,
            effective_bandwidth_mb_s: effective,
        }
    }

    pub fn regions(&self) -> Vec<MemoryRegion> {
        self.regions.snapshot()
    }

    pub fn history(&self) -> impl Iterator<Item = &MemoryAccessRecord> {
        self.history.iter()
    }

    pub fn reset(&mut self) {
        self.regions.reset();
        self.cycle = 0;
        self.reads = 0;
        self.writes = 0;
        self.bytes_transferred = 0;
        self.total_latency_cycles = 0;
        self.average_latency = 0.0;
        self.peak_bandwidth_mb_s = self.config.peak_bandwidth_mb_s();
        self.history.clear();
    }

    // Same scale as the peak figure, so utilization stays a percentage.
    fn effective_bandwidth_mb_s(&self) -> f64 {
        if self.total_latency_cycles == 0 {
            return 0.0;
        }
        (self.bytes_transferred as f64 / self.total_latency_cycles as f64)
            * self.config.frequency_mhz as f64
            / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mem::config::MemoryType;

    fn memory() -> MainMemory {
        MainMemory::new(MemoryConfig {
            size_mb: 1,
            latency_cycles: 100,
            bus_width_bits: 64,
            frequency_mhz: 1000,
            memory_type: MemoryType::Ddr4,
            burst_length: 8,
        })
    }

    #[test]
    fn latency_includes_burst_cycles() {
        let mut mem = memory();
        // transfer = max(16, 8 * 8) = 64 bytes, burst = 64 / 8 = 8 cycles
        let result = mem.access(0x0, false, 16);
        assert_eq!(result.latency_cycles, 108);
        assert_eq!(result.bytes_transferred, 64);
    }

    #[test]
    fn large_blocks_win_over_burst() {
        let mut mem = memory();
        let result = mem.access(0x0, false, 256);
        assert_eq!(result.bytes_transferred, 256);
        assert_eq!(result.latency_cycles, 100 + 256 / 8);
    }

    #[test]
    fn addresses_wrap_into_physical_size() {
        let mut mem = memory();
        // 1 MiB memory: 0x10_0001 wraps to 0x1.
        let result = mem.access(0x0010_0001, false, 64);
        assert_eq!(result.address, 0x1);
    }

    #[test]
    fn running_mean_tracks_uniform_latencies() {
        let mut mem = memory();
        for i in 0..10 {
            mem.access(i * 64, false, 64);
        }
        let stats = mem.stats();
        assert_eq!(stats.total_accesses, 10);
        assert!((stats.average_latency - 108.0).abs() < 1e-9);
    }

    #[test]
    fn read_write_counters_split() {
        let mut mem = memory();
        mem.access(0, false, 64);
        mem.access(64, true, 64);
        mem.access(128, true, 64);
        let stats = mem.stats();
        assert_eq!(stats.total_reads, 1);
        assert_eq!(stats.total_writes, 2);
    }

    #[test]
    fn effective_bandwidth_never_exceeds_sane_bounds() {
        let mut mem = memory();
        for i in 0..100 {
            mem.access(i * 64, i % 2 == 0, 64);
        }
        let stats = mem.stats();
        assert!(stats.effective_bandwidth_mb_s > 0.0);
        assert!(stats.bandwidth_utilization_pct > 0.0);
        assert!(stats.bandwidth_utilization_pct <= 100.0);
    }

    #[test]
    fn history_is_bounded() {
        let mut mem = memory();
        for i in 0..1500u32 {
            mem.access(i * 64, false, 64);
        }
        assert_eq!(mem.history().count(), 1000);
        // Oldest entries were evicted first.
        assert_eq!(mem.history().next().unwrap().cycle, 501);
    }

    #[test]
    fn reset_clears_everything() {
        let mut mem = memory();
        mem.access(0x40, true, 64);
        mem.reset();
        let stats = mem.stats();
        assert_eq!(stats.total_accesses, 0);
        assert_eq!(stats.bytes_transferred, 0);
        assert_eq!(stats.average_latency, 0.0);
        assert_eq!(mem.history().count(), 0);
        assert!(mem.regions().iter().all(|r| r.access_count == 0));
        assert_eq!(stats.peak_bandwidth_mb_s, mem.config().peak_bandwidth_mb_s());
    }
}
