//! ECS components for mobs.

use std::collections::VecDeque;

use bevy_ecs::prelude::*;

use mischief_world::{BlockPos, Vec3};

use crate::ai::goal::Navigator;
use crate::ai::pathfinding;

/// Marker: this entity is a mob.
#[derive(Component, Debug)]
pub struct Mob;

/// The identifier type string, e.g. `"minecraft:zombie"`.
#[derive(Component, Debug, Clone)]
pub struct MobType(pub String);

/// Base movement speed in blocks/tick (copied from MobDefinition at spawn time).
#[derive(Component, Debug, Clone, Copy)]
pub struct MovementSpeed(pub f32);

/// Rotation angles in degrees.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Rotation {
    pub yaw: f32,
    pub head_yaw: f32,
}

/// Waypoint follower and look control of one mob.
#[derive(Component, Debug, Default)]
pub struct PathNavigator {
    /// Block the mob stood in when last synced.
    origin: BlockPos,
    path: VecDeque<BlockPos>,
    /// Multiplier on the mob's base speed for the current path.
    speed: f32,
    can_pass_doors: bool,
    look_target: Option<Vec3>,
}

impl PathNavigator {
    pub fn new(can_pass_doors: bool) -> Self {
        Self {
            can_pass_doors,
            speed: 1.0,
            ..Default::default()
        }
    }

    /// Record where the mob is before its goals run.
    pub fn sync(&mut self, position: Vec3) {
        self.origin = position.block_pos();
    }

    pub fn current_waypoint(&self) -> Option<BlockPos> {
        self.path.front().copied()
    }

    /// Drop the waypoint just reached.
    pub fn advance(&mut self) {
        self.path.pop_front();
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn remaining(&self) -> usize {
        self.path.len()
    }

    pub fn take_look_target(&mut self) -> Option<Vec3> {
        self.look_target.take()
    }
}

impl Navigator for PathNavigator {
    fn path_to(&mut self, target: BlockPos, speed: f32) -> bool {
        let path = pathfinding::find_path(self.origin, target);
        if path.is_empty() {
            return false;
        }
        self.path = path.into();
        self.speed = speed;
        true
    }

    fn is_path_active(&self) -> bool {
        !self.path.is_empty()
    }

    fn stop(&mut self) {
        self.path.clear();
    }

    fn next_waypoints(&self, lookahead: usize) -> Vec<BlockPos> {
        self.path.iter().take(lookahead).copied().collect()
    }

    fn can_pass_doors(&self) -> bool {
        self.can_pass_doors
    }

    fn look_at(&mut self, target: Vec3) {
        self.look_target = Some(target);
    }
}
