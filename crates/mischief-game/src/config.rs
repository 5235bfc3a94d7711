//! Activity configuration, deserialized from the host's config file.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityConfig {
    #[serde(default)]
    pub scan: ScanSection,
    #[serde(default)]
    pub idle: IdleSection,
    #[serde(default)]
    pub grief: GriefSection,
    #[serde(default)]
    pub fiddle: FiddleSection,
    #[serde(default)]
    pub hide: HideSection,
    #[serde(default)]
    pub door_breaking: DoorBreakingSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScanSection {
    /// Horizontal scan radius.
    #[serde(default = "default_range_xz")]
    pub range_xz: i32,
    /// Vertical scan radius.
    #[serde(default = "default_range_y")]
    pub range_y: i32,
    /// Samples per scan attempt.
    #[serde(default = "default_scan_count")]
    pub count: u32,
    /// Ticks between scan attempts of one mob.
    #[serde(default = "default_scan_interval")]
    pub interval: u32,
    /// Samples allowed per tick across all mobs.
    #[serde(default = "default_global_budget")]
    pub global_budget: u32,
}

fn default_range_xz() -> i32 {
    12
}

fn default_range_y() -> i32 {
    4
}

fn default_scan_count() -> u32 {
    32
}

fn default_scan_interval() -> u32 {
    20
}

fn default_global_budget() -> u32 {
    512
}

impl Default for ScanSection {
    fn default() -> Self {
        Self {
            range_xz: default_range_xz(),
            range_y: default_range_y(),
            count: default_scan_count(),
            interval: default_scan_interval(),
            global_budget: default_global_budget(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdleSection {
    /// Ticks a mob may pursue one candidate before giving up.
    #[serde(default = "default_give_up_ticks")]
    pub give_up_ticks: u32,
    /// Reach distance from the eyes to a block center.
    #[serde(default = "default_reach")]
    pub reach: f32,
    /// Navigation speed multiplier while seeking.
    #[serde(default = "default_move_speed")]
    pub move_speed: f32,
    /// Ticks between line-of-sight checks.
    #[serde(default = "default_sight_interval")]
    pub sight_interval: u32,
}

fn default_give_up_ticks() -> u32 {
    400
}

fn default_reach() -> f32 {
    4.5
}

fn default_move_speed() -> f32 {
    1.0
}

fn default_sight_interval() -> u32 {
    4
}

impl Default for IdleSection {
    fn default() -> Self {
        Self {
            give_up_ticks: default_give_up_ticks(),
            reach: default_reach(),
            move_speed: default_move_speed(),
            sight_interval: default_sight_interval(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GriefSection {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_break_speed")]
    pub break_speed: f32,
    /// Blocks that need a tool can only be broken with an adequate one.
    #[serde(default = "default_true")]
    pub requires_tools: bool,
    #[serde(default = "default_true")]
    pub break_lights: bool,
    #[serde(default = "default_true")]
    pub break_beds: bool,
    /// Containers whose loot table has already been rolled.
    #[serde(default = "default_true")]
    pub break_lootable: bool,
    #[serde(default = "default_true")]
    pub leave_drops: bool,
    /// Explosive mobs blow up at their target instead of breaking it.
    #[serde(default = "default_true")]
    pub explosive_mobs: bool,
    #[serde(default)]
    pub targets: Vec<String>,
    #[serde(default)]
    pub blacklist: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_break_speed() -> f32 {
    1.0
}

impl Default for GriefSection {
    fn default() -> Self {
        Self {
            enabled: true,
            break_speed: default_break_speed(),
            requires_tools: true,
            break_lights: true,
            break_beds: true,
            break_lootable: true,
            leave_drops: true,
            explosive_mobs: true,
            targets: Vec::new(),
            blacklist: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FiddleSection {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_fiddle_cooldown_min")]
    pub cooldown_min: u32,
    #[serde(default = "default_fiddle_cooldown_max")]
    pub cooldown_max: u32,
    #[serde(default)]
    pub targets: Vec<String>,
    #[serde(default)]
    pub blacklist: Vec<String>,
}

fn default_fiddle_cooldown_min() -> u32 {
    80
}

fn default_fiddle_cooldown_max() -> u32 {
    160
}

impl Default for FiddleSection {
    fn default() -> Self {
        Self {
            enabled: true,
            cooldown_min: default_fiddle_cooldown_min(),
            cooldown_max: default_fiddle_cooldown_max(),
            targets: Vec::new(),
            blacklist: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HideSection {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_hide_targets")]
    pub targets: Vec<String>,
    #[serde(default)]
    pub blacklist: Vec<String>,
}

fn default_hide_targets() -> Vec<String> {
    [
        "minecraft:stone",
        "minecraft:cobblestone",
        "minecraft:stone_bricks",
        "minecraft:dirt",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for HideSection {
    fn default() -> Self {
        Self {
            enabled: false,
            targets: default_hide_targets(),
            blacklist: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DoorBreakingSection {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub requires_tools: bool,
    #[serde(default = "default_break_speed")]
    pub break_speed: f32,
    #[serde(default = "default_true")]
    pub leave_drops: bool,
    #[serde(default = "default_door_targets")]
    pub targets: Vec<String>,
    #[serde(default)]
    pub blacklist: Vec<String>,
}

fn default_door_targets() -> Vec<String> {
    [
        "minecraft:oak_door",
        "minecraft:spruce_door",
        "minecraft:oak_trapdoor",
        "minecraft:oak_fence_gate",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for DoorBreakingSection {
    fn default() -> Self {
        Self {
            enabled: true,
            requires_tools: false,
            break_speed: default_break_speed(),
            leave_drops: true,
            targets: default_door_targets(),
            blacklist: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: ActivityConfig = toml::from_str("").unwrap();
        assert_eq!(config.scan.range_xz, 12);
        assert_eq!(config.scan.global_budget, 512);
        assert_eq!(config.idle.give_up_ticks, 400);
        assert!(config.grief.enabled);
        assert!(config.grief.requires_tools);
        assert_eq!(config.fiddle.cooldown_min, 80);
        assert_eq!(config.fiddle.cooldown_max, 160);
        assert!(!config.hide.enabled);
        assert_eq!(config.hide.targets.len(), 4);
        assert!(config.door_breaking.enabled);
        assert!(!config.door_breaking.requires_tools);
    }

    #[test]
    fn partial_sections_fill_defaults() {
        let toml_str = r#"
            [grief]
            break_speed = 2.5
            blacklist = ["minecraft:chest"]

            [hide]
            enabled = true
        "#;
        let config: ActivityConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.grief.break_speed, 2.5);
        assert_eq!(config.grief.blacklist, vec!["minecraft:chest".to_string()]);
        assert!(config.grief.break_lights);
        assert!(config.hide.enabled);
        assert_eq!(config.hide.targets[0], "minecraft:stone");
        assert_eq!(config.scan.count, 32);
    }
}
