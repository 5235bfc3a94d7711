//! Mob type definitions.
//!
//! Which block activities a mob type takes part in, plus the stats the
//! activities read (hitbox, speed, held tool).

use mischief_world::{HeldItem, ToolTier, ToolType};

/// Definition of a mob type.
#[derive(Debug, Clone)]
pub struct MobDefinition {
    /// Identifier, e.g. `"minecraft:zombie"`.
    pub type_id: String,
    pub display_name: String,
    pub movement_speed: f32,
    pub bb_width: f32,
    pub bb_height: f32,
    pub held_item: HeldItem,
    /// Blows up instead of digging.
    pub explosive: bool,
    /// Breaks closed doors that block its path.
    pub breaks_doors: bool,
    /// Hides, griefs, and fiddles while idle.
    pub mischievous: bool,
    /// Strolls around when nothing else is going on.
    pub wanders: bool,
}

impl MobDefinition {
    pub fn new(type_id: &str, display_name: &str, speed: f32, width: f32, height: f32) -> Self {
        Self {
            type_id: type_id.into(),
            display_name: display_name.into(),
            movement_speed: speed,
            bb_width: width,
            bb_height: height,
            held_item: HeldItem::EMPTY,
            explosive: false,
            breaks_doors: false,
            mischievous: false,
            wanders: true,
        }
    }
}

/// Registry of supported mob types.
pub struct MobRegistry {
    mobs: Vec<MobDefinition>,
}

impl Default for MobRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MobRegistry {
    /// Build the registry with the built-in mob types.
    pub fn new() -> Self {
        let zombie = MobDefinition {
            breaks_doors: true,
            mischievous: true,
            ..MobDefinition::new("minecraft:zombie", "Zombie", 0.23, 0.6, 1.95)
        };
        let skeleton = MobDefinition {
            mischievous: true,
            ..MobDefinition::new("minecraft:skeleton", "Skeleton", 0.25, 0.6, 1.99)
        };
        let creeper = MobDefinition {
            explosive: true,
            mischievous: true,
            ..MobDefinition::new("minecraft:creeper", "Creeper", 0.2, 0.6, 1.7)
        };
        let vindicator = MobDefinition {
            held_item: HeldItem::tool(ToolType::Axe, ToolTier::Iron),
            breaks_doors: true,
            mischievous: true,
            ..MobDefinition::new("minecraft:vindicator", "Vindicator", 0.35, 0.6, 1.95)
        };
        let pig = MobDefinition::new("minecraft:pig", "Pig", 0.25, 0.9, 0.9);
        Self {
            mobs: vec![zombie, skeleton, creeper, vindicator, pig],
        }
    }

    /// Look up a mob definition by type ID.
    pub fn get(&self, type_id: &str) -> Option<&MobDefinition> {
        self.mobs.iter().find(|m| m.type_id == type_id)
    }

    /// Add or replace a mob definition.
    pub fn register(&mut self, def: MobDefinition) {
        if let Some(existing) = self.mobs.iter_mut().find(|m| m.type_id == def.type_id) {
            *existing = def;
        } else {
            self.mobs.push(def);
        }
    }

    pub fn len(&self) -> usize {
        self.mobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mobs.is_empty()
    }
}
