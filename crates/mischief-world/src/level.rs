//! Level collaborator traits consumed by the mob AI.
//!
//! The AI never owns the world: it reads block state and casts rays through
//! [`BlockView`]/[`Raycast`] and requests mutations through [`Level`].

use thiserror::Error;

use crate::block_registry::BlockState;
use crate::types::{BlockPos, Face, Vec3};

/// Runtime id of an agent (mob) in the host simulation.
pub type AgentId = u64;

/// Faults reported by the level when a mob tries to interact with a block.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("position {0} is outside the loaded level")]
    OutOfBounds(BlockPos),

    #[error("block {name} at {pos} has no interaction")]
    NotInteractable { name: &'static str, pos: BlockPos },

    #[error("block {name} at {pos} cannot hold a hidden mob")]
    CannotHide { name: &'static str, pos: BlockPos },

    #[error("block at {0} already holds a hidden mob")]
    Occupied(BlockPos),
}

/// Which block shapes stop a ray.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionMode {
    /// Only blocks entities collide with.
    Collider,
    /// Every non-air, non-liquid block.
    Outline,
}

/// Result of a block raycast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitResult {
    Miss,
    Block { pos: BlockPos, face: Face },
}

/// Read-only block queries.
pub trait BlockView {
    fn block_state(&self, pos: BlockPos) -> BlockState;

    /// Light emitted by the block at `pos` (0-15).
    fn light_emission(&self, state: &BlockState, _pos: BlockPos) -> u8 {
        state.info().light
    }

    /// Whether the container at `pos` still has an unrolled loot table.
    fn has_pending_loot(&self, pos: BlockPos) -> bool;

    /// World "mob griefing" policy.
    fn mob_griefing(&self) -> bool;

    fn is_liquid(&self, state: &BlockState) -> bool {
        state.is_liquid()
    }

    /// Hardness of `state` at `pos`. Negative means unbreakable.
    fn destroy_speed(&self, state: &BlockState, _pos: BlockPos) -> f32 {
        state.info().hardness
    }
}

pub trait Raycast {
    fn cast_ray(&self, from: Vec3, to: Vec3, mode: CollisionMode) -> HitResult;
}

/// Mutable level access for block-affecting mob actions.
pub trait Level: BlockView + Raycast {
    fn set_block(&mut self, pos: BlockPos, state: BlockState);

    /// Remove the block at `pos`, optionally dropping it. Returns `false` if nothing was there.
    fn destroy_block(&mut self, pos: BlockPos, drops: bool, breaker: Option<AgentId>) -> bool;

    /// Right-click the block at `pos` on behalf of `agent`. Returns the new state.
    fn use_block(&mut self, pos: BlockPos, agent: AgentId) -> Result<BlockState, LevelError>;

    /// Store `agent` inside the block at `pos`.
    fn hide_agent(&mut self, pos: BlockPos, agent: AgentId) -> Result<(), LevelError>;

    /// Explode `agent` at `center`. Returns the number of destroyed blocks.
    fn detonate(&mut self, agent: AgentId, center: Vec3, radius: f32) -> usize;
}
