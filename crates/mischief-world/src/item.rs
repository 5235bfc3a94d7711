//! Held tools: tier, dig speed, and harvest adequacy.

use serde::Deserialize;

use crate::block_registry::{BlockInfo, ToolType};

/// Tool material tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolTier {
    Wood,
    Stone,
    Iron,
    Diamond,
    Netherite,
    Gold,
}

impl ToolTier {
    /// Harvest level used for "can this tier mine that block" checks.
    pub fn harvest_level(self) -> u8 {
        match self {
            ToolTier::Wood | ToolTier::Gold => 0,
            ToolTier::Stone => 1,
            ToolTier::Iron => 2,
            ToolTier::Diamond => 3,
            ToolTier::Netherite => 4,
        }
    }

    /// Base dig speed of a matching tool of this tier.
    pub fn speed(self) -> f32 {
        match self {
            ToolTier::Wood => 2.0,
            ToolTier::Stone => 4.0,
            ToolTier::Iron => 6.0,
            ToolTier::Diamond => 8.0,
            ToolTier::Netherite => 9.0,
            ToolTier::Gold => 12.0,
        }
    }
}

/// The item a mob holds in its main hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeldItem {
    pub tool: ToolType,
    /// `None` for tierless items (shears, empty hand).
    pub tier: Option<ToolTier>,
    /// Efficiency enchantment level.
    pub efficiency: u8,
}

impl Default for HeldItem {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl HeldItem {
    pub const EMPTY: HeldItem = HeldItem {
        tool: ToolType::None,
        tier: None,
        efficiency: 0,
    };

    pub fn tool(tool: ToolType, tier: ToolTier) -> Self {
        Self {
            tool,
            tier: Some(tier),
            efficiency: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tool == ToolType::None
    }

    /// Whether this item can harvest `block` (always true for blocks without a tool requirement).
    pub fn tool_matches(&self, block: &BlockInfo) -> bool {
        let Some(required) = block.harvest_tier else {
            return true;
        };
        match self.tier {
            Some(tier) => {
                self.tool == block.tool_type && tier.harvest_level() >= required.harvest_level()
            }
            None => false,
        }
    }

    /// Raw dig speed of this item against `block`, before enchantments and effects.
    pub fn dig_speed(&self, block: &BlockInfo) -> f32 {
        if self.tool == ToolType::None || self.tool != block.tool_type {
            return 1.0;
        }
        match (self.tool, self.tier) {
            (ToolType::Shears, _) => 5.0,
            (_, Some(tier)) => tier.speed(),
            (_, None) => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block_registry::BlockRegistry;

    #[test]
    fn empty_hand_cannot_harvest_stone() {
        let registry = BlockRegistry::new();
        let stone = registry.state("minecraft:stone").unwrap();
        assert!(!HeldItem::EMPTY.tool_matches(stone.info()));
        assert_eq!(HeldItem::EMPTY.dig_speed(stone.info()), 1.0);
    }

    #[test]
    fn tier_gates_obsidian() {
        let registry = BlockRegistry::new();
        let obsidian = registry.state("minecraft:obsidian").unwrap();
        let iron = HeldItem::tool(ToolType::Pickaxe, ToolTier::Iron);
        let diamond = HeldItem::tool(ToolType::Pickaxe, ToolTier::Diamond);
        assert!(!iron.tool_matches(obsidian.info()));
        assert!(diamond.tool_matches(obsidian.info()));
    }

    #[test]
    fn wrong_tool_type_uses_base_speed() {
        let registry = BlockRegistry::new();
        let stone = registry.state("minecraft:stone").unwrap();
        let axe = HeldItem::tool(ToolType::Axe, ToolTier::Diamond);
        assert_eq!(axe.dig_speed(stone.info()), 1.0);
        assert!(!axe.tool_matches(stone.info()));
    }

    #[test]
    fn gold_is_fast_but_weak() {
        let registry = BlockRegistry::new();
        let iron_ore = registry.state("minecraft:iron_ore").unwrap();
        let gold = HeldItem::tool(ToolType::Pickaxe, ToolTier::Gold);
        assert_eq!(gold.dig_speed(iron_ore.info()), 12.0);
        assert!(!gold.tool_matches(iron_ore.info()));
    }

    #[test]
    fn dirt_harvestable_by_hand() {
        let registry = BlockRegistry::new();
        let dirt = registry.state("minecraft:dirt").unwrap();
        assert!(HeldItem::EMPTY.tool_matches(dirt.info()));
    }
}
