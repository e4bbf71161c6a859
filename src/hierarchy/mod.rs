mod amat;
mod config;
mod core;
mod result;

pub use amat::{amat, LevelTerm};
pub use config::HierarchyConfig;
pub use core::{Hierarchy, L1_HIT_CYCLES, L2_HIT_CYCLES};
pub use result::{DataPath, HierarchyAccessResult, MemoryLevel};
