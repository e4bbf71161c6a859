use serde::{Deserialize, Serialize};

use crate::sim::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryType {
    Ddr3,
    Ddr4,
    Ddr5,
    Sram,
    Custom,
}

impl MemoryType {
    /// DDR parts transfer on both clock edges, doubling peak bandwidth.
    pub fn data_rate_factor(self) -> u32 {
        match self {
            MemoryType::Ddr3 | MemoryType::Ddr4 | MemoryType::Ddr5 => 2,
            MemoryType::Sram | MemoryType::Custom => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct MemoryConfig {
    pub size_mb: u32,
    pub latency_cycles: u32,
    pub bus_width_bits: u32,
    pub frequency_mhz: u32,
    pub memory_type: MemoryType,
    pub burst_length: u32,
}

impl Config for MemoryConfig {}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            size_mb: 1024,
            latency_cycles: 100,
            bus_width_bits: 64,
            frequency_mhz: 2400,
            memory_type: MemoryType::Ddr4,
            burst_length: 8,
        }
    }
}

impl MemoryConfig {
    pub fn size_bytes(&self) -> u64 {
        self.size_mb as u64 * 1024 * 1024
    }

    pub fn bus_bytes(&self) -> u64 {
        (self.bus_width_bits / 8).max(1) as u64
    }

    /// Theoretical peak in MB/s for this part.
    pub fn peak_bandwidth_mb_s(&self) -> f64 {
        (self.bus_width_bits as f64
            * self.frequency_mhz as f64
            * self.memory_type.data_rate_factor() as f64)
            / 8000.0
    }
}
