use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use mischief_game::config::ActivityConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize)]
pub struct SimConfig {
    #[serde(default)]
    pub simulation: SimulationSection,
    pub logging: LoggingSection,
    #[serde(default)]
    pub activities: ActivityConfig,
}

#[derive(Debug, Deserialize)]
pub struct SimulationSection {
    /// Ticks to run before exiting.
    #[serde(default = "default_ticks")]
    pub ticks: u64,
    /// Fixed seed for reproducible runs. Absent = entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_true")]
    pub mob_griefing: bool,
    /// Ticks between summary log lines. 0 = only at the end.
    #[serde(default = "default_report_interval")]
    pub report_interval: u64,
    /// Mobs to spawn, by type ID.
    #[serde(default = "default_mobs")]
    pub mobs: Vec<MobSpawn>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MobSpawn {
    pub type_id: String,
    #[serde(default = "default_count")]
    pub count: u32,
}

fn default_ticks() -> u64 {
    1200
}

fn default_true() -> bool {
    true
}

fn default_report_interval() -> u64 {
    200
}

fn default_count() -> u32 {
    1
}

fn default_mobs() -> Vec<MobSpawn> {
    vec![
        MobSpawn {
            type_id: "minecraft:zombie".into(),
            count: 4,
        },
        MobSpawn {
            type_id: "minecraft:creeper".into(),
            count: 1,
        },
    ]
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            ticks: default_ticks(),
            seed: None,
            mob_griefing: true,
            report_interval: default_report_interval(),
            mobs: default_mobs(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoggingSection {
    pub level: String,
}

impl SimConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let fiddle = &self.activities.fiddle;
        if fiddle.cooldown_min > fiddle.cooldown_max {
            return Err(ConfigError::Invalid(format!(
                "fiddle.cooldown_min ({}) exceeds fiddle.cooldown_max ({})",
                fiddle.cooldown_min, fiddle.cooldown_max
            )));
        }
        let scan = &self.activities.scan;
        if scan.range_xz <= 0 || scan.range_y < 0 {
            return Err(ConfigError::Invalid(format!(
                "scan ranges must be positive (range_xz = {}, range_y = {})",
                scan.range_xz, scan.range_y
            )));
        }
        if self.activities.idle.reach <= 0.0 {
            return Err(ConfigError::Invalid("idle.reach must be positive".into()));
        }
        Ok(())
    }
}
