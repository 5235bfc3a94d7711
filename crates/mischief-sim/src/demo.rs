//! The demo level: a grass field with a walled hut full of things to break.

use mischief_world::{BlockPos, BlockRegistry, BlockState, Level, VoxelLevel};

pub const FLOOR_Y: i32 = 0;
/// Half-width of the field.
pub const FIELD_RADIUS: i32 = 24;
/// Mobs spawn within this distance of the origin.
pub const SPAWN_RADIUS: i32 = 10;

/// Hut corners, walls included.
const HUT_MIN: (i32, i32) = (4, 4);
const HUT_MAX: (i32, i32) = (10, 10);
const HUT_HEIGHT: i32 = 3;

pub fn build_level() -> VoxelLevel {
    let registry = BlockRegistry::new();
    let block = |name: &str| registry.state(name).unwrap_or(BlockState::AIR);
    let mut level = VoxelLevel::new(-16, 64);
    let y = FLOOR_Y + 1;

    level.fill(
        BlockPos::new(-FIELD_RADIUS, FLOOR_Y, -FIELD_RADIUS),
        BlockPos::new(FIELD_RADIUS, FLOOR_Y, FIELD_RADIUS),
        block("minecraft:grass_block"),
    );

    // Hollow hut of stone bricks with a plank roof.
    level.fill(
        BlockPos::new(HUT_MIN.0, y, HUT_MIN.1),
        BlockPos::new(HUT_MAX.0, y + HUT_HEIGHT - 1, HUT_MAX.1),
        block("minecraft:stone_bricks"),
    );
    level.fill(
        BlockPos::new(HUT_MIN.0 + 1, y, HUT_MIN.1 + 1),
        BlockPos::new(HUT_MAX.0 - 1, y + HUT_HEIGHT - 1, HUT_MAX.1 - 1),
        BlockState::AIR,
    );
    level.fill(
        BlockPos::new(HUT_MIN.0, y + HUT_HEIGHT, HUT_MIN.1),
        BlockPos::new(HUT_MAX.0, y + HUT_HEIGHT, HUT_MAX.1),
        block("minecraft:oak_planks"),
    );

    // Two-tall door in the west wall, a window in the south wall.
    let door = block("minecraft:oak_door");
    level.set_block(BlockPos::new(HUT_MIN.0, y, 7), door);
    level.set_block(BlockPos::new(HUT_MIN.0, y + 1, 7), door);
    level.set_block(BlockPos::new(7, y + 1, HUT_MIN.1), block("minecraft:glass"));

    // Furnishings.
    level.set_block(BlockPos::new(5, y, 5), block("minecraft:torch"));
    level.set_block(BlockPos::new(9, y, 9), block("minecraft:torch"));
    level.set_block(BlockPos::new(9, y, 5), block("minecraft:red_bed"));
    level.set_block(BlockPos::new(5, y, 9), block("minecraft:chest"));
    level.set_block(BlockPos::new(7, y, 9), block("minecraft:chest"));
    level.set_pending_loot(BlockPos::new(7, y, 9), true);
    level.set_block(BlockPos::new(9, y, 7), block("minecraft:lever"));

    // Outdoor odds and ends.
    level.set_block(BlockPos::new(-6, y, -6), block("minecraft:lantern"));
    level.set_block(BlockPos::new(-3, y, 5), block("minecraft:oak_button"));
    level.set_block(BlockPos::new(0, y, -8), block("minecraft:oak_fence_gate"));
    level.set_block(BlockPos::new(-8, y, 2), block("minecraft:glowstone"));
    level.fill(
        BlockPos::new(-12, y, -12),
        BlockPos::new(-10, y + 1, -10),
        block("minecraft:cobblestone"),
    );

    level
}

#[cfg(test)]
mod tests {
    use super::*;
    use mischief_world::BlockView;

    #[test]
    fn hut_is_closed_with_a_door() {
        let level = build_level();
        let y = FLOOR_Y + 1;
        assert_eq!(
            level.block_state(BlockPos::new(HUT_MIN.0, y, 7)).info().name,
            "minecraft:oak_door"
        );
        assert!(level.block_state(BlockPos::new(7, y, 7)).is_air());
        assert!(level.block_state(BlockPos::new(HUT_MIN.0, y, 5)).has_collision());
        assert!(level.has_pending_loot(BlockPos::new(7, y, 9)));
        assert!(!level.has_pending_loot(BlockPos::new(5, y, 9)));
    }
}
