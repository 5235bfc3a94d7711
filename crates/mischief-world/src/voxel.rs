//! Sparse in-memory level with a voxel-traversal raycaster.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::block_registry::{BlockKind, BlockState};
use crate::level::{AgentId, BlockView, CollisionMode, HitResult, Level, LevelError, Raycast};
use crate::types::{BlockPos, Face, Vec3};

/// A sparse block map. Unset positions inside the vertical bounds are air.
pub struct VoxelLevel {
    blocks: HashMap<BlockPos, BlockState>,
    pending_loot: HashSet<BlockPos>,
    hidden: HashMap<BlockPos, AgentId>,
    /// Blocks dropped as items, in break order.
    drops: Vec<(BlockPos, &'static str)>,
    min_y: i32,
    max_y: i32,
    mob_griefing: bool,
}

impl VoxelLevel {
    pub fn new(min_y: i32, max_y: i32) -> Self {
        Self {
            blocks: HashMap::new(),
            pending_loot: HashSet::new(),
            hidden: HashMap::new(),
            drops: Vec::new(),
            min_y,
            max_y,
            mob_griefing: true,
        }
    }

    pub fn set_mob_griefing(&mut self, enabled: bool) {
        self.mob_griefing = enabled;
    }

    /// Mark a container as still holding an unrolled loot table.
    pub fn set_pending_loot(&mut self, pos: BlockPos, pending: bool) {
        if pending {
            self.pending_loot.insert(pos);
        } else {
            self.pending_loot.remove(&pos);
        }
    }

    /// Fill an axis-aligned box (inclusive) with `state`.
    pub fn fill(&mut self, from: BlockPos, to: BlockPos, state: BlockState) {
        for x in from.x.min(to.x)..=from.x.max(to.x) {
            for y in from.y.min(to.y)..=from.y.max(to.y) {
                for z in from.z.min(to.z)..=from.z.max(to.z) {
                    self.set_block(BlockPos::new(x, y, z), state);
                }
            }
        }
    }

    pub fn in_bounds(&self, pos: BlockPos) -> bool {
        pos.y >= self.min_y && pos.y <= self.max_y
    }

    pub fn drops(&self) -> &[(BlockPos, &'static str)] {
        &self.drops
    }

    pub fn hidden_at(&self, pos: BlockPos) -> Option<AgentId> {
        self.hidden.get(&pos).copied()
    }

    pub fn hidden_count(&self) -> usize {
        self.hidden.len()
    }

    /// Door halves above and below `pos` that belong to the same door.
    fn door_partner(&self, pos: BlockPos, state: &BlockState) -> Option<BlockPos> {
        if state.info().kind != BlockKind::Door {
            return None;
        }
        [pos.above(), pos.below()]
            .into_iter()
            .find(|p| self.block_state(*p).same_block(state))
    }

    fn stops_ray(state: &BlockState, mode: CollisionMode) -> bool {
        match mode {
            CollisionMode::Collider => state.has_collision(),
            CollisionMode::Outline => !state.is_air() && !state.is_liquid(),
        }
    }
}

impl BlockView for VoxelLevel {
    fn block_state(&self, pos: BlockPos) -> BlockState {
        self.blocks.get(&pos).copied().unwrap_or(BlockState::AIR)
    }

    fn has_pending_loot(&self, pos: BlockPos) -> bool {
        self.pending_loot.contains(&pos)
    }

    fn mob_griefing(&self) -> bool {
        self.mob_griefing
    }
}

impl Raycast for VoxelLevel {
    /// Amanatides-Woo traversal of every cell the segment `from -> to` passes through.
    fn cast_ray(&self, from: Vec3, to: Vec3, mode: CollisionMode) -> HitResult {
        let dir = to - from;
        let mut cell = from.block_pos();
        let end = to.block_pos();

        let axis = |origin: f32, d: f32, cell: i32| -> (i32, f32, f32) {
            if d > 0.0 {
                (1, ((cell + 1) as f32 - origin) / d, 1.0 / d)
            } else if d < 0.0 {
                (-1, (cell as f32 - origin) / d, -1.0 / d)
            } else {
                (0, f32::INFINITY, f32::INFINITY)
            }
        };
        let (step_x, mut t_max_x, t_delta_x) = axis(from.x, dir.x, cell.x);
        let (step_y, mut t_max_y, t_delta_y) = axis(from.y, dir.y, cell.y);
        let (step_z, mut t_max_z, t_delta_z) = axis(from.z, dir.z, cell.z);

        let mut face = Face::Up;
        loop {
            if Self::stops_ray(&self.block_state(cell), mode) {
                return HitResult::Block { pos: cell, face };
            }
            if cell == end {
                return HitResult::Miss;
            }
            if t_max_x <= t_max_y && t_max_x <= t_max_z {
                if t_max_x > 1.0 {
                    return HitResult::Miss;
                }
                cell.x += step_x;
                t_max_x += t_delta_x;
                face = if step_x > 0 { Face::West } else { Face::East };
            } else if t_max_y <= t_max_z {
                if t_max_y > 1.0 {
                    return HitResult::Miss;
                }
                cell.y += step_y;
                t_max_y += t_delta_y;
                face = if step_y > 0 { Face::Down } else { Face::Up };
            } else {
                if t_max_z > 1.0 {
                    return HitResult::Miss;
                }
                cell.z += step_z;
                t_max_z += t_delta_z;
                face = if step_z > 0 { Face::North } else { Face::South };
            }
        }
    }
}

impl Level for VoxelLevel {
    fn set_block(&mut self, pos: BlockPos, state: BlockState) {
        if !self.in_bounds(pos) {
            return;
        }
        if state.is_air() {
            self.blocks.remove(&pos);
        } else {
            self.blocks.insert(pos, state);
        }
    }

    fn destroy_block(&mut self, pos: BlockPos, drops: bool, breaker: Option<AgentId>) -> bool {
        let state = self.block_state(pos);
        if state.is_air() {
            return false;
        }
        let partner = self.door_partner(pos, &state);
        self.set_block(pos, BlockState::AIR);
        self.pending_loot.remove(&pos);
        if let Some(agent) = self.hidden.remove(&pos) {
            debug!("Hidden mob {agent} released from {pos}");
        }
        if drops {
            self.drops.push((pos, state.info().name));
        }
        if let Some(other) = partner {
            self.set_block(other, BlockState::AIR);
        }
        debug!(
            "Block {} at {pos} destroyed by {:?} (drops: {drops})",
            state.info().name,
            breaker
        );
        true
    }

    fn use_block(&mut self, pos: BlockPos, agent: AgentId) -> Result<BlockState, LevelError> {
        if !self.in_bounds(pos) {
            return Err(LevelError::OutOfBounds(pos));
        }
        let mut state = self.block_state(pos);
        let info = state.info();
        match info.kind {
            BlockKind::Door | BlockKind::Trapdoor | BlockKind::FenceGate => {
                state.open = !state.open;
                let partner = self.door_partner(pos, &state);
                self.set_block(pos, state);
                if let Some(other) = partner {
                    let mut other_state = self.block_state(other);
                    other_state.open = state.open;
                    self.set_block(other, other_state);
                }
            }
            BlockKind::Button | BlockKind::Lever => {
                state.powered = !state.powered;
                self.set_block(pos, state);
            }
            _ => {
                return Err(LevelError::NotInteractable {
                    name: info.name,
                    pos,
                })
            }
        }
        debug!("Mob {agent} used {} at {pos}", info.name);
        Ok(state)
    }

    fn hide_agent(&mut self, pos: BlockPos, agent: AgentId) -> Result<(), LevelError> {
        if !self.in_bounds(pos) {
            return Err(LevelError::OutOfBounds(pos));
        }
        let state = self.block_state(pos);
        if !state.is_full_cube() {
            return Err(LevelError::CannotHide {
                name: state.info().name,
                pos,
            });
        }
        if self.hidden.contains_key(&pos) {
            return Err(LevelError::Occupied(pos));
        }
        self.hidden.insert(pos, agent);
        Ok(())
    }

    fn detonate(&mut self, agent: AgentId, center: Vec3, radius: f32) -> usize {
        let r = radius.ceil() as i32;
        let origin = center.block_pos();
        let radius_sq = radius * radius;
        let mut destroyed = 0;
        for dx in -r..=r {
            for dy in -r..=r {
                for dz in -r..=r {
                    let pos = origin.offset(dx, dy, dz);
                    if pos.center_distance_sq(&center) > radius_sq {
                        continue;
                    }
                    let state = self.block_state(pos);
                    if state.is_air() || state.is_liquid() || state.info().hardness < 0.0 {
                        continue;
                    }
                    if self.destroy_block(pos, false, Some(agent)) {
                        destroyed += 1;
                    }
                }
            }
        }
        debug!("Mob {agent} detonated at {origin}, {destroyed} blocks destroyed");
        destroyed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block_registry::BlockRegistry;

    fn level_with(blocks: &[(BlockPos, &str)]) -> VoxelLevel {
        let registry = BlockRegistry::new();
        let mut level = VoxelLevel::new(-64, 320);
        for (pos, name) in blocks {
            level.set_block(*pos, registry.state(name).unwrap());
        }
        level
    }

    #[test]
    fn ray_hits_first_solid_block() {
        let level = level_with(&[
            (BlockPos::new(3, 0, 0), "minecraft:stone"),
            (BlockPos::new(5, 0, 0), "minecraft:dirt"),
        ]);
        let hit = level.cast_ray(
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::new(5.5, 0.5, 0.5),
            CollisionMode::Collider,
        );
        assert_eq!(
            hit,
            HitResult::Block {
                pos: BlockPos::new(3, 0, 0),
                face: Face::West
            }
        );
    }

    #[test]
    fn ray_misses_in_open_air() {
        let level = level_with(&[]);
        let hit = level.cast_ray(
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::new(4.5, 2.5, -3.5),
            CollisionMode::Collider,
        );
        assert_eq!(hit, HitResult::Miss);
    }

    #[test]
    fn collider_ray_passes_torch_outline_ray_does_not() {
        let level = level_with(&[(BlockPos::new(2, 0, 0), "minecraft:torch")]);
        let from = Vec3::new(0.5, 0.5, 0.5);
        let to = Vec3::new(4.5, 0.5, 0.5);
        assert_eq!(level.cast_ray(from, to, CollisionMode::Collider), HitResult::Miss);
        assert!(matches!(
            level.cast_ray(from, to, CollisionMode::Outline),
            HitResult::Block { .. }
        ));
    }

    #[test]
    fn torch_emits_light_through_view() {
        let level = level_with(&[(BlockPos::new(0, 0, 0), "minecraft:torch")]);
        let torch = level.block_state(BlockPos::new(0, 0, 0));
        assert_eq!(level.light_emission(&torch, BlockPos::new(0, 0, 0)), 14);
    }

    #[test]
    fn destroying_door_removes_both_halves() {
        let mut level = level_with(&[
            (BlockPos::new(0, 0, 0), "minecraft:oak_door"),
            (BlockPos::new(0, 1, 0), "minecraft:oak_door"),
        ]);
        assert!(level.destroy_block(BlockPos::new(0, 1, 0), true, Some(7)));
        assert!(level.block_state(BlockPos::new(0, 0, 0)).is_air());
        assert_eq!(level.drops().len(), 1);
    }

    #[test]
    fn use_door_toggles_open() {
        let mut level = level_with(&[
            (BlockPos::new(0, 0, 0), "minecraft:oak_door"),
            (BlockPos::new(0, 1, 0), "minecraft:oak_door"),
        ]);
        let state = level.use_block(BlockPos::new(0, 0, 0), 1).unwrap();
        assert!(state.open);
        assert!(level.block_state(BlockPos::new(0, 1, 0)).open);
    }

    #[test]
    fn use_stone_is_an_error() {
        let mut level = level_with(&[(BlockPos::new(0, 0, 0), "minecraft:stone")]);
        let err = level.use_block(BlockPos::new(0, 0, 0), 1).unwrap_err();
        assert!(matches!(err, LevelError::NotInteractable { .. }));
    }

    #[test]
    fn hide_requires_full_cube_and_vacancy() {
        let mut level = level_with(&[
            (BlockPos::new(0, 0, 0), "minecraft:stone"),
            (BlockPos::new(1, 0, 0), "minecraft:torch"),
        ]);
        assert!(level.hide_agent(BlockPos::new(0, 0, 0), 1).is_ok());
        assert!(matches!(
            level.hide_agent(BlockPos::new(0, 0, 0), 2),
            Err(LevelError::Occupied(_))
        ));
        assert!(matches!(
            level.hide_agent(BlockPos::new(1, 0, 0), 3),
            Err(LevelError::CannotHide { .. })
        ));
        assert_eq!(level.hidden_at(BlockPos::new(0, 0, 0)), Some(1));
    }

    #[test]
    fn detonate_spares_bedrock() {
        let mut level = level_with(&[
            (BlockPos::new(0, 0, 0), "minecraft:bedrock"),
            (BlockPos::new(1, 0, 0), "minecraft:dirt"),
        ]);
        let destroyed = level.detonate(9, Vec3::new(0.5, 1.0, 0.5), 3.0);
        assert_eq!(destroyed, 1);
        assert!(!level.block_state(BlockPos::new(0, 0, 0)).is_air());
    }
}
