use log::warn;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use toml::Value;

/// Loads one `[section]` of a TOML config file. A missing section falls back
/// to defaults with a warning; a malformed one is a configuration-file bug
/// and aborts.
pub trait Config: DeserializeOwned + Default {
    fn from_section(section: Option<&Value>) -> Self {
        match section {
            Some(value) => value.clone().try_into().expect("cannot deserialize config"),
            None => {
                warn!("config section not found");
                Self::default()
            }
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SimConfig {
    pub trace: String,
    pub log_level: String,
    pub seed: u64,
}

impl Config for SimConfig {}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            trace: "".to_string(),
            log_level: "warn".to_string(),
            seed: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheConfig, ReplacementPolicy, WritePolicy};
    use crate::mem::{MemoryConfig, MemoryType};

    #[test]
    fn missing_section_yields_defaults() {
        let config = SimConfig::from_section(None);
        assert_eq!(config.seed, 0);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn cache_section_deserializes() {
        let root: Value = toml::from_str(
            r#"
            [l1]
            size_bytes = 8192
            block_bytes = 32
            ways = 2
            policy = "lfu"
            "#,
        )
        .unwrap();
        let config = CacheConfig::from_section(root.get("l1"));
        assert_eq!(config.size_bytes, 8192);
        assert_eq!(config.block_bytes, 32);
        assert_eq!(config.ways, 2);
        assert_eq!(config.policy, ReplacementPolicy::Lfu);
        // Unset keys keep their defaults.
        assert_eq!(config.write_policy, WritePolicy::WriteBack);
    }

    #[test]
    fn memory_section_deserializes() {
        let root: Value = toml::from_str(
            r#"
            [memory]
            latency_cycles = 150
            memory_type = "sram"
            "#,
        )
        .unwrap();
        let config = MemoryConfig::from_section(root.get("memory"));
        assert_eq!(config.latency_cycles, 150);
        assert_eq!(config.memory_type, MemoryType::Sram);
    }
}
