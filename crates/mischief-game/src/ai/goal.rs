//! Goal capability set and the per-tick context handed to goals.

use bevy_ecs::prelude::Component;
use bitflags::bitflags;

use mischief_world::{AgentId, BlockPos, BlockState, HeldItem, Level, Vec3};

use super::budget::ScanBudget;

bitflags! {
    /// Controls a running goal claims exclusively. Two goals sharing a flag
    /// never run at the same time.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct ControlFlags: u8 {
        const MOVE = 1 << 0;
        const LOOK = 1 << 1;
        const JUMP = 1 << 2;
    }
}

/// Active potion effects relevant to digging. Values are amplifiers (0 = level I).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PotionEffects {
    pub haste: Option<u8>,
    pub mining_fatigue: Option<u8>,
}

/// Snapshot of the mob running a goal.
#[derive(Component, Debug, Clone)]
pub struct AgentState {
    pub id: AgentId,
    /// Feet position.
    pub position: Vec3,
    pub width: f32,
    pub height: f32,
    pub eye_height: f32,
    pub on_ground: bool,
    /// Eyes are inside a liquid.
    pub submerged: bool,
    /// Movement was blocked horizontally during the last tick.
    pub horizontal_collision: bool,
    pub held_item: HeldItem,
    pub aqua_affinity: bool,
    pub effects: PotionEffects,
    /// Explodes instead of breaking blocks.
    pub explosive: bool,
    /// The mob is busy fighting; idle activities do not start.
    pub has_attack_target: bool,
}

impl AgentState {
    pub fn new(id: AgentId, position: Vec3, width: f32, height: f32) -> Self {
        Self {
            id,
            position,
            width,
            height,
            eye_height: height * 0.85,
            on_ground: true,
            submerged: false,
            horizontal_collision: false,
            held_item: HeldItem::EMPTY,
            aqua_affinity: false,
            effects: PotionEffects::default(),
            explosive: false,
            has_attack_target: false,
        }
    }

    pub fn eye_position(&self) -> Vec3 {
        Vec3::new(
            self.position.x,
            self.position.y + self.eye_height,
            self.position.z,
        )
    }

    /// Center of the bounding box.
    pub fn body_center(&self) -> Vec3 {
        Vec3::new(
            self.position.x,
            self.position.y + self.height * 0.5,
            self.position.z,
        )
    }

    pub fn block_pos(&self) -> BlockPos {
        self.position.block_pos()
    }
}

/// Path-following and look control of a single mob.
pub trait Navigator {
    /// Start pathing toward `target`. Returns `false` if no path could be planned.
    fn path_to(&mut self, target: BlockPos, speed: f32) -> bool;

    /// A path exists and has not been finished.
    fn is_path_active(&self) -> bool;

    fn stop(&mut self);

    /// Up to `lookahead` upcoming waypoints, nearest first.
    fn next_waypoints(&self, lookahead: usize) -> Vec<BlockPos>;

    /// Paths may be routed through doors.
    fn can_pass_doors(&self) -> bool;

    fn look_at(&mut self, target: Vec3);
}

/// Sound, particle, and progress feedback for block actions.
pub trait Effects {
    /// Arm swing plus block hit sound.
    fn swing_and_hit(&mut self, agent: AgentId, pos: BlockPos, state: BlockState);

    fn break_particles(&mut self, pos: BlockPos, state: BlockState);

    /// Crack overlay in tenths (0-9); `-1` clears it.
    fn report_break_progress(&mut self, agent: AgentId, pos: BlockPos, tenths: i8);

    fn interaction_particles(&mut self, agent: AgentId, pos: BlockPos);

    /// The mob entered a block and should leave the world.
    fn agent_hidden(&mut self, agent: AgentId, pos: BlockPos);

    /// The mob blew itself up and should leave the world.
    fn agent_exploded(&mut self, agent: AgentId, position: Vec3);
}

/// Everything a goal may read or affect during one tick.
pub struct GoalContext<'a> {
    pub agent: &'a AgentState,
    pub level: &'a mut dyn Level,
    pub nav: &'a mut dyn Navigator,
    pub effects: &'a mut dyn Effects,
    pub budget: &'a ScanBudget,
    pub tick: u64,
}

/// A single goal in a mob's goal list.
///
/// The host scheduler calls `can_start` on idle goals, `start` once when a goal
/// is selected, `tick` every tick while it runs, and `stop` when it ends or is
/// preempted.
pub trait Goal: Send + Sync + std::fmt::Debug {
    /// Lower = higher priority.
    fn priority(&self) -> u32;

    /// Controls this goal claims while running.
    fn control_flags(&self) -> ControlFlags;

    /// Replaces `control_flags` for arbitration when `Some`.
    fn overrides_control_flags(&self) -> Option<ControlFlags> {
        None
    }

    /// Can this goal start right now?
    fn can_start(&mut self, ctx: &mut GoalContext<'_>) -> bool;

    /// Should this goal keep running?
    fn should_continue(&self, ctx: &GoalContext<'_>) -> bool;

    /// Whether a higher-priority goal may preempt this one.
    fn is_interruptible(&self) -> bool {
        true
    }

    fn start(&mut self, _ctx: &mut GoalContext<'_>) {}

    fn tick(&mut self, ctx: &mut GoalContext<'_>);

    fn stop(&mut self, _ctx: &mut GoalContext<'_>) {}
}
