//! World model: block registry, tools, geometry, and the level collaborator traits.

pub mod block_registry;
pub mod item;
pub mod level;
pub mod types;
pub mod voxel;

pub use block_registry::{BlockId, BlockInfo, BlockKind, BlockRegistry, BlockState, ToolType};
pub use item::{HeldItem, ToolTier};
pub use level::{AgentId, BlockView, CollisionMode, HitResult, Level, LevelError, Raycast};
pub use types::{BlockPos, Face, Vec3};
pub use voxel::VoxelLevel;
