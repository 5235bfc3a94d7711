//! Per-tick block destruction progress.
//!
//! Mirrors player digging: dig speed from the held tool, efficiency, haste,
//! mining fatigue, and environment penalties, divided by the block's hardness
//! scaled for harvest adequacy.

use mischief_world::{BlockInfo, BlockKind, BlockPos, BlockRegistry, BlockState};

use super::activity::Candidate;
use super::goal::{AgentState, GoalContext};

/// Hardness scale when the held tool can harvest the block.
const ADEQUATE_TOOL_SCALE: f32 = 30.0;
/// Hardness scale otherwise.
const INADEQUATE_TOOL_SCALE: f32 = 100.0;
/// Speed divisor for digging underwater or while airborne.
const ENVIRONMENT_PENALTY: f32 = 5.0;

/// Everything about the digger that affects dig speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DigModifiers {
    /// Raw speed of the held item against the block (1.0 bare-handed).
    pub tool_speed: f32,
    /// The held item can harvest the block.
    pub tool_adequate: bool,
    pub efficiency: u8,
    pub haste: Option<u8>,
    pub fatigue: Option<u8>,
    pub submerged: bool,
    pub aqua_affinity: bool,
    pub on_ground: bool,
}

impl Default for DigModifiers {
    fn default() -> Self {
        Self {
            tool_speed: 1.0,
            tool_adequate: false,
            efficiency: 0,
            haste: None,
            fatigue: None,
            submerged: false,
            aqua_affinity: false,
            on_ground: true,
        }
    }
}

impl DigModifiers {
    pub fn for_agent(agent: &AgentState, block: &BlockInfo) -> Self {
        let held = &agent.held_item;
        Self {
            tool_speed: held.dig_speed(block),
            tool_adequate: held.tool_matches(block),
            efficiency: held.efficiency,
            haste: agent.effects.haste,
            fatigue: agent.effects.mining_fatigue,
            submerged: agent.submerged,
            aqua_affinity: agent.aqua_affinity,
            on_ground: agent.on_ground,
        }
    }
}

/// Dig speed after enchantment, potion, and environment modifiers.
pub fn dig_speed(m: &DigModifiers) -> f32 {
    let mut speed = m.tool_speed;
    if speed > 1.0 && m.efficiency > 0 {
        let level = m.efficiency as f32;
        speed += level * level + 1.0;
    }
    if let Some(amp) = m.haste {
        speed *= 1.0 + (amp as f32 + 1.0) * 0.2;
    }
    if let Some(amp) = m.fatigue {
        speed *= match amp {
            0 => 0.3,
            1 => 0.09,
            2 => 0.0027,
            _ => 8.1e-4,
        };
    }
    if m.submerged && !m.aqua_affinity {
        speed /= ENVIRONMENT_PENALTY;
    }
    if !m.on_ground {
        speed /= ENVIRONMENT_PENALTY;
    }
    speed
}

/// Progress added in one tick. Unbreakable blocks never progress and
/// zero-hardness blocks complete at once.
pub fn progress_delta(hardness: f32, m: &DigModifiers, break_speed: f32) -> f32 {
    if hardness < 0.0 {
        return 0.0;
    }
    if hardness == 0.0 {
        return 1.0;
    }
    let scale = if m.tool_adequate {
        ADEQUATE_TOOL_SCALE
    } else {
        INADEQUATE_TOOL_SCALE
    };
    dig_speed(m) / (hardness * scale) * break_speed
}

/// Outcome of one destruction tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigStep {
    InProgress,
    Completed,
}

/// Accumulated damage on the current target. Owned by one mob.
#[derive(Debug, Clone, PartialEq)]
pub struct DestructionProgress {
    /// In `[0, 1)`.
    pub accumulated: f32,
    pub hit_phase_counter: u32,
    /// Last tenth sent to the crack overlay, `-1` for none.
    pub last_reported_tenth: i8,
}

impl Default for DestructionProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl DestructionProgress {
    pub fn new() -> Self {
        Self {
            accumulated: 0.0,
            hit_phase_counter: 0,
            last_reported_tenth: -1,
        }
    }

    /// Add `delta`. On reaching 1.0 the progress resets and `Completed` is returned.
    pub fn advance(&mut self, delta: f32) -> DigStep {
        self.accumulated += delta;
        if self.accumulated >= 1.0 {
            self.reset();
            DigStep::Completed
        } else {
            DigStep::InProgress
        }
    }

    /// Counts a tick and returns `true` once every `cadence` ticks.
    pub fn next_hit(&mut self, cadence: u32) -> bool {
        let due = self.hit_phase_counter % cadence.max(1) == 0;
        self.hit_phase_counter = self.hit_phase_counter.wrapping_add(1);
        due
    }

    /// The current tenth when it differs from the last reported one.
    pub fn take_report(&mut self) -> Option<i8> {
        let tenth = (self.accumulated * 10.0) as i8;
        if tenth == self.last_reported_tenth {
            return None;
        }
        self.last_reported_tenth = tenth;
        Some(tenth)
    }

    pub fn is_started(&self) -> bool {
        self.accumulated > 0.0
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Destruction settings for one destructive activity.
#[derive(Debug, Clone)]
pub struct DestructionModel {
    pub break_speed: f32,
    /// Ticks between swing/hit effects.
    pub hit_cadence: u32,
    pub leave_drops: bool,
    /// Replacement for broken farmland.
    farmland_remnant: BlockState,
}

impl DestructionModel {
    pub const GRIEF_HIT_CADENCE: u32 = 5;
    pub const DOOR_HIT_CADENCE: u32 = 16;

    pub fn new(break_speed: f32, hit_cadence: u32, leave_drops: bool, registry: &BlockRegistry) -> Self {
        Self {
            break_speed,
            hit_cadence,
            leave_drops,
            farmland_remnant: registry.state("minecraft:dirt").unwrap_or(BlockState::AIR),
        }
    }

    /// Advance destruction of `target` by one tick, applying effects and the
    /// break itself on completion.
    pub fn tick(
        &self,
        progress: &mut DestructionProgress,
        ctx: &mut GoalContext<'_>,
        target: &Candidate,
    ) -> DigStep {
        let state = ctx.level.block_state(target.pos);
        let hardness = ctx.level.destroy_speed(&state, target.pos);
        let modifiers = DigModifiers::for_agent(ctx.agent, state.info());
        let delta = progress_delta(hardness, &modifiers, self.break_speed);

        if progress.next_hit(self.hit_cadence) {
            ctx.effects.swing_and_hit(ctx.agent.id, target.pos, state);
        }

        match progress.advance(delta) {
            DigStep::Completed => {
                self.finish(ctx, target.pos, state);
                DigStep::Completed
            }
            DigStep::InProgress => {
                if let Some(tenth) = progress.take_report() {
                    ctx.effects
                        .report_break_progress(ctx.agent.id, target.pos, tenth);
                }
                DigStep::InProgress
            }
        }
    }

    /// The one break side effect of a completed dig.
    fn finish(&self, ctx: &mut GoalContext<'_>, pos: BlockPos, state: BlockState) {
        ctx.effects.report_break_progress(ctx.agent.id, pos, -1);
        ctx.effects.break_particles(pos, state);
        if state.info().kind == BlockKind::Farmland {
            ctx.level.set_block(pos, self.farmland_remnant);
        } else {
            ctx.level
                .destroy_block(pos, self.leave_drops, Some(ctx.agent.id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::activity::ActivityKind;
    use crate::ai::budget::ScanBudget;
    use crate::ai::testing::{RecordingEffects, StubNav};
    use mischief_world::{Level, Vec3, VoxelLevel};

    fn ticks_to_break(hardness: f32, m: &DigModifiers, break_speed: f32) -> u32 {
        let delta = progress_delta(hardness, m, break_speed);
        let mut progress = DestructionProgress::new();
        let mut ticks = 0;
        loop {
            ticks += 1;
            let before = progress.accumulated;
            match progress.advance(delta) {
                DigStep::Completed => return ticks,
                DigStep::InProgress => assert!(progress.accumulated >= before),
            }
            assert!(ticks < 100_000, "never completed");
        }
    }

    #[test]
    fn wrong_tool_stone_takes_150_ticks() {
        let m = DigModifiers::default();
        assert!((progress_delta(1.5, &m, 1.0) - 1.0 / 150.0).abs() < 1e-7);
        let ticks = ticks_to_break(1.5, &m, 1.0);
        assert!((149..=151).contains(&ticks), "ticks={ticks}");
    }

    #[test]
    fn adequate_tool_uses_smaller_scale() {
        let m = DigModifiers {
            tool_adequate: true,
            ..Default::default()
        };
        assert!((progress_delta(1.5, &m, 1.0) - 1.0 / 45.0).abs() < 1e-7);
    }

    #[test]
    fn unbreakable_never_progresses() {
        let m = DigModifiers::default();
        assert_eq!(progress_delta(-1.0, &m, 10.0), 0.0);
    }

    #[test]
    fn instant_break_for_zero_hardness() {
        assert_eq!(ticks_to_break(0.0, &DigModifiers::default(), 1.0), 1);
    }

    #[test]
    fn efficiency_only_applies_to_fast_tools() {
        let bare = DigModifiers {
            efficiency: 5,
            ..Default::default()
        };
        assert_eq!(dig_speed(&bare), 1.0);

        let pick = DigModifiers {
            tool_speed: 6.0,
            efficiency: 3,
            ..Default::default()
        };
        assert_eq!(dig_speed(&pick), 6.0 + 9.0 + 1.0);
    }

    #[test]
    fn potions_scale_speed() {
        let haste = DigModifiers {
            haste: Some(1),
            ..Default::default()
        };
        assert!((dig_speed(&haste) - 1.4).abs() < 1e-6);

        let fatigue = DigModifiers {
            fatigue: Some(0),
            ..Default::default()
        };
        assert!((dig_speed(&fatigue) - 0.3).abs() < 1e-6);
    }

    #[test]
    fn environment_penalties_stack() {
        let wet_and_falling = DigModifiers {
            submerged: true,
            on_ground: false,
            ..Default::default()
        };
        assert!((dig_speed(&wet_and_falling) - 1.0 / 25.0).abs() < 1e-7);

        let with_affinity = DigModifiers {
            submerged: true,
            aqua_affinity: true,
            ..Default::default()
        };
        assert_eq!(dig_speed(&with_affinity), 1.0);
    }

    #[test]
    fn break_speed_multiplier_scales_delta() {
        let m = DigModifiers::default();
        let base = progress_delta(2.0, &m, 1.0);
        assert!((progress_delta(2.0, &m, 3.0) - base * 3.0).abs() < 1e-7);
    }

    #[test]
    fn completion_resets_to_zero() {
        let mut progress = DestructionProgress::new();
        assert_eq!(progress.advance(0.6), DigStep::InProgress);
        assert_eq!(progress.advance(0.6), DigStep::Completed);
        assert_eq!(progress.accumulated, 0.0);
        assert_eq!(progress.last_reported_tenth, -1);
    }

    #[test]
    fn hit_cadence() {
        let mut progress = DestructionProgress::new();
        let hits: Vec<bool> = (0..11).map(|_| progress.next_hit(5)).collect();
        assert_eq!(hits.iter().filter(|h| **h).count(), 3);
        assert!(hits[0] && hits[5] && hits[10]);
    }

    #[test]
    fn door_breach_swings_every_sixteen_ticks() {
        let registry = BlockRegistry::new();
        let mut level = VoxelLevel::new(-64, 320);
        let pos = BlockPos::new(1, 0, 0);
        let door = registry.state("minecraft:oak_door").unwrap();
        level.set_block(pos, door);
        let agent = AgentState::new(1, Vec3::new(0.5, 0.0, 0.5), 0.6, 1.95);
        let mut nav = StubNav::default();
        let mut effects = RecordingEffects::default();
        let budget = ScanBudget::new(0);
        let model =
            DestructionModel::new(1.0, DestructionModel::DOOR_HIT_CADENCE, true, &registry);
        let target = Candidate::new(pos, door, ActivityKind::BreakingDoor);
        let mut progress = DestructionProgress::new();

        let mut swings = Vec::new();
        for tick in 0..33 {
            let before = effects.hits;
            let mut ctx = GoalContext {
                agent: &agent,
                level: &mut level,
                nav: &mut nav,
                effects: &mut effects,
                budget: &budget,
                tick,
            };
            let step = model.tick(&mut progress, &mut ctx, &target);
            assert_eq!(step, DigStep::InProgress);
            if effects.hits > before {
                swings.push(tick);
            }
        }
        assert_eq!(swings, vec![0, 16, 32]);
    }

    #[test]
    fn reports_only_on_tenth_change() {
        let mut progress = DestructionProgress::new();
        progress.advance(0.05);
        assert_eq!(progress.take_report(), Some(0));
        progress.advance(0.02);
        assert_eq!(progress.take_report(), None);
        progress.advance(0.1);
        assert_eq!(progress.take_report(), Some(1));
    }
}
