//! Block property registry mapping block names to static block info.
//!
//! Provides hardness, solidity, shape, light emission, and tool data for the
//! vanilla blocks mobs interact with. Block ids are indices into the static table.

use std::collections::HashMap;

use crate::item::ToolTier;

/// Tool types relevant for mining speed calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolType {
    None,
    Pickaxe,
    Axe,
    Shovel,
    Hoe,
    Sword,
    Shears,
}

/// Coarse shape/behavior class of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Air,
    Liquid,
    /// Full solid cube.
    Cube,
    /// Solid but not a full cube (slabs, fences, anvils).
    Partial,
    /// Non-colliding decoration (flowers, grass, rails).
    Plant,
    Door,
    Trapdoor,
    FenceGate,
    Button,
    Lever,
    Bed,
    /// Lootable storage block (chest, barrel).
    Container,
    Torch,
    Farmland,
}

/// Properties for a single block type.
#[derive(Debug, Clone)]
pub struct BlockInfo {
    /// Namespaced block identifier, e.g. `"minecraft:stone"`.
    pub name: &'static str,
    /// Mining hardness. `-1.0` = unbreakable, `0.0` = instant break.
    pub hardness: f32,
    /// Whether entities collide with this block (closed state for doors).
    pub is_solid: bool,
    pub kind: BlockKind,
    /// The preferred tool type for faster mining.
    pub tool_type: ToolType,
    /// Minimum tier of `tool_type` required to harvest, if any.
    pub harvest_tier: Option<ToolTier>,
    /// Emitted light level (0-15).
    pub light: u8,
}

impl BlockInfo {
    /// Whether a correct tool is needed to harvest this block.
    pub fn requires_tool(&self) -> bool {
        self.harvest_tier.is_some()
    }

    pub fn is_door_like(&self) -> bool {
        matches!(
            self.kind,
            BlockKind::Door | BlockKind::Trapdoor | BlockKind::FenceGate
        )
    }

    pub fn is_switch(&self) -> bool {
        matches!(self.kind, BlockKind::Button | BlockKind::Lever)
    }
}

/// Index of a block in the static block table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockId(pub u16);

impl BlockId {
    pub fn info(self) -> &'static BlockInfo {
        &BLOCK_DATA[self.0 as usize]
    }
}

/// A block type plus the mutable properties mobs care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockState {
    pub id: BlockId,
    /// Door/trapdoor/gate open flag.
    pub open: bool,
    /// Button/lever powered flag.
    pub powered: bool,
}

impl BlockState {
    pub const AIR: BlockState = BlockState {
        id: BlockId(0),
        open: false,
        powered: false,
    };

    pub fn new(id: BlockId) -> Self {
        Self {
            id,
            open: false,
            powered: false,
        }
    }

    pub fn info(&self) -> &'static BlockInfo {
        self.id.info()
    }

    pub fn is_air(&self) -> bool {
        self.info().kind == BlockKind::Air
    }

    pub fn is_liquid(&self) -> bool {
        self.info().kind == BlockKind::Liquid
    }

    /// Same block type, ignoring open/powered properties.
    pub fn same_block(&self, other: &BlockState) -> bool {
        self.id == other.id
    }

    /// Whether entities and collider rays are stopped by this block.
    pub fn has_collision(&self) -> bool {
        let info = self.info();
        info.is_solid && !(info.is_door_like() && self.open)
    }

    pub fn is_full_cube(&self) -> bool {
        self.info().kind == BlockKind::Cube
    }
}

/// Registry mapping block names to block ids.
pub struct BlockRegistry {
    by_name: HashMap<&'static str, BlockId>,
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockRegistry {
    /// Build the registry by indexing every entry of the static table.
    pub fn new() -> Self {
        let by_name = BLOCK_DATA
            .iter()
            .enumerate()
            .map(|(i, info)| (info.name, BlockId(i as u16)))
            .collect();
        Self { by_name }
    }

    pub fn id(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    /// Default state for a named block.
    pub fn state(&self, name: &str) -> Option<BlockState> {
        self.id(name).map(BlockState::new)
    }

    /// Get block hardness. Returns `None` for unknown blocks.
    pub fn hardness(&self, name: &str) -> Option<f32> {
        self.id(name).map(|id| id.info().hardness)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

// Helper macro to reduce boilerplate in the data array.
macro_rules! block {
    ($name:expr, $hardness:expr, $kind:ident, solid, $tool:ident) => {
        block!($name, $hardness, $kind, true, $tool, None, 0)
    };
    ($name:expr, $hardness:expr, $kind:ident, non_solid, $tool:ident) => {
        block!($name, $hardness, $kind, false, $tool, None, 0)
    };
    ($name:expr, $hardness:expr, $kind:ident, solid, $tool:ident, $tier:ident) => {
        block!($name, $hardness, $kind, true, $tool, Some(ToolTier::$tier), 0)
    };
    ($name:expr, $hardness:expr, $kind:ident, non_solid, $tool:ident, light $light:expr) => {
        block!($name, $hardness, $kind, false, $tool, None, $light)
    };
    ($name:expr, $hardness:expr, $kind:ident, solid, $tool:ident, light $light:expr) => {
        block!($name, $hardness, $kind, true, $tool, None, $light)
    };
    ($name:expr, $hardness:expr, $kind:ident, $solid:expr, $tool:ident, $tier:expr, $light:expr) => {
        BlockInfo {
            name: $name,
            hardness: $hardness,
            is_solid: $solid,
            kind: BlockKind::$kind,
            tool_type: ToolType::$tool,
            harvest_tier: $tier,
            light: $light,
        }
    };
}

/// Static block table. Index 0 must stay air.
static BLOCK_DATA: &[BlockInfo] = &[
    // ===== Special =====
    block!("minecraft:air", 0.0, Air, non_solid, None),
    block!("minecraft:bedrock", -1.0, Cube, solid, None),
    block!("minecraft:barrier", -1.0, Cube, solid, None),
    block!("minecraft:water", 100.0, Liquid, non_solid, None),
    block!("minecraft:lava", 100.0, Liquid, non_solid, None, light 15),
    // ===== Terrain =====
    block!("minecraft:stone", 1.5, Cube, solid, Pickaxe, Wood),
    block!("minecraft:cobblestone", 2.0, Cube, solid, Pickaxe, Wood),
    block!("minecraft:stone_bricks", 1.5, Cube, solid, Pickaxe, Wood),
    block!("minecraft:obsidian", 50.0, Cube, solid, Pickaxe, Diamond),
    block!("minecraft:iron_ore", 3.0, Cube, solid, Pickaxe, Stone),
    block!("minecraft:dirt", 0.5, Cube, solid, Shovel),
    block!("minecraft:grass_block", 0.6, Cube, solid, Shovel),
    block!("minecraft:sand", 0.5, Cube, solid, Shovel),
    block!("minecraft:gravel", 0.6, Cube, solid, Shovel),
    block!("minecraft:farmland", 0.6, Farmland, solid, Shovel),
    block!("minecraft:oak_log", 2.0, Cube, solid, Axe),
    block!("minecraft:oak_planks", 2.0, Cube, solid, Axe),
    block!("minecraft:oak_leaves", 0.2, Cube, solid, Hoe),
    block!("minecraft:glass", 0.3, Cube, solid, None),
    block!("minecraft:wool", 0.8, Cube, solid, Shears),
    block!("minecraft:oak_slab", 2.0, Partial, solid, Axe),
    block!("minecraft:oak_fence", 2.0, Partial, solid, Axe),
    block!("minecraft:short_grass", 0.0, Plant, non_solid, None),
    block!("minecraft:poppy", 0.0, Plant, non_solid, None),
    block!("minecraft:wheat", 0.0, Plant, non_solid, None),
    // ===== Light sources =====
    block!("minecraft:torch", 0.0, Torch, non_solid, None, light 14),
    block!("minecraft:wall_torch", 0.0, Torch, non_solid, None, light 14),
    block!("minecraft:redstone_torch", 0.0, Torch, non_solid, None, light 7),
    block!("minecraft:lantern", 3.5, Partial, solid, Pickaxe, light 15),
    block!("minecraft:glowstone", 0.3, Cube, solid, None, light 15),
    block!("minecraft:jack_o_lantern", 1.0, Cube, solid, Axe, light 15),
    // ===== Beds =====
    block!("minecraft:red_bed", 0.2, Bed, solid, None),
    block!("minecraft:white_bed", 0.2, Bed, solid, None),
    // ===== Containers =====
    block!("minecraft:chest", 2.5, Container, solid, Axe),
    block!("minecraft:barrel", 2.5, Container, solid, Axe),
    block!("minecraft:furnace", 3.5, Cube, solid, Pickaxe, Wood),
    block!("minecraft:crafting_table", 2.5, Cube, solid, Axe),
    // ===== Doors and gates =====
    block!("minecraft:oak_door", 3.0, Door, solid, Axe),
    block!("minecraft:spruce_door", 3.0, Door, solid, Axe),
    block!("minecraft:iron_door", 5.0, Door, solid, Pickaxe, Wood),
    block!("minecraft:oak_trapdoor", 3.0, Trapdoor, solid, Axe),
    block!("minecraft:oak_fence_gate", 2.0, FenceGate, solid, Axe),
    // ===== Switches =====
    block!("minecraft:stone_button", 0.5, Button, non_solid, Pickaxe),
    block!("minecraft:oak_button", 0.5, Button, non_solid, Axe),
    block!("minecraft:lever", 0.5, Lever, non_solid, None),
    // ===== Command blocks =====
    block!("minecraft:command_block", -1.0, Cube, solid, None),
    block!("minecraft:structure_block", -1.0, Cube, solid, None),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_block_hardness() {
        let registry = BlockRegistry::new();
        assert_eq!(registry.hardness("minecraft:stone"), Some(1.5));
        assert_eq!(registry.hardness("minecraft:bedrock"), Some(-1.0));
        assert_eq!(registry.hardness("minecraft:air"), Some(0.0));
        assert_eq!(registry.hardness("minecraft:dirt"), Some(0.5));
    }

    #[test]
    fn air_is_index_zero() {
        let registry = BlockRegistry::new();
        assert_eq!(registry.id("minecraft:air"), Some(BlockId(0)));
        assert!(BlockState::AIR.is_air());
    }

    #[test]
    fn unknown_block_no_hardness() {
        let registry = BlockRegistry::new();
        assert_eq!(registry.hardness("minecraft:unobtainium"), None);
        assert!(registry.state("minecraft:unobtainium").is_none());
    }

    #[test]
    fn open_door_has_no_collision() {
        let registry = BlockRegistry::new();
        let mut door = registry.state("minecraft:oak_door").unwrap();
        assert!(door.has_collision());
        door.open = true;
        assert!(!door.has_collision());
        assert!(door.same_block(&registry.state("minecraft:oak_door").unwrap()));
    }

    #[test]
    fn stone_requires_pickaxe() {
        let registry = BlockRegistry::new();
        let stone = registry.state("minecraft:stone").unwrap();
        assert!(stone.info().requires_tool());
        assert_eq!(stone.info().tool_type, ToolType::Pickaxe);
        let dirt = registry.state("minecraft:dirt").unwrap();
        assert!(!dirt.info().requires_tool());
    }

    #[test]
    fn torch_emits_light() {
        let registry = BlockRegistry::new();
        let torch = registry.state("minecraft:torch").unwrap();
        assert_eq!(torch.info().light, 14);
        assert!(!torch.has_collision());
    }

    #[test]
    fn no_duplicate_names() {
        let registry = BlockRegistry::new();
        assert_eq!(registry.len(), BLOCK_DATA.len());
    }
}
