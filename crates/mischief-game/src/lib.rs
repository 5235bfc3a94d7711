//! Game logic: ECS world, mob types, and the block activity AI.

pub mod ai;
pub mod components;
pub mod config;
pub mod game_world;
pub mod mob_registry;
