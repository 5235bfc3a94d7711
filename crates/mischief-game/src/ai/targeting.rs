//! Candidate acquisition strategies for the activity state machine.

use rand::rngs::StdRng;

use mischief_world::{BlockPos, Level};

use super::activity::{ActivityKind, ActivitySet, Candidate};
use super::classifier::ActivityClassifier;
use super::goal::{AgentState, ControlFlags, GoalContext};
use super::scanner::TargetScanner;

/// Inputs a strategy needs besides the goal context.
pub struct AcquireContext<'a> {
    pub classifier: &'a ActivityClassifier,
    /// Activities allowed right now.
    pub enabled: ActivitySet,
    pub rng: &'a mut StdRng,
}

/// How the state machine finds a candidate and when the pursuit ends on its own.
pub trait TargetingStrategy: Send + Sync + std::fmt::Debug {
    fn acquire(&mut self, ctx: &mut GoalContext<'_>, acq: AcquireContext<'_>) -> Option<Candidate>;

    /// Called when the machine starts pursuing `candidate`.
    fn on_start(&mut self, _agent: &AgentState, _candidate: &Candidate) {}

    /// The pursuit is over regardless of the candidate's state.
    fn is_finished(&self, _agent: &AgentState, _candidate: &Candidate) -> bool {
        false
    }

    /// Whether the candidate is still worth pursuing from where the mob stands.
    fn still_applies(
        &self,
        _level: &dyn Level,
        _agent: &AgentState,
        _candidate: &Candidate,
    ) -> bool {
        true
    }

    /// The machine paths toward candidates itself.
    fn steers(&self) -> bool {
        true
    }

    fn overrides_control_flags(&self) -> Option<ControlFlags> {
        None
    }
}

/// Periodic weighted-random scan around the mob.
#[derive(Debug, Clone)]
pub struct FreeScan {
    scanner: TargetScanner,
    interval: u32,
    delay: u32,
}

impl FreeScan {
    pub fn new(scanner: TargetScanner, interval: u32) -> Self {
        Self {
            scanner,
            interval,
            delay: 0,
        }
    }
}

impl TargetingStrategy for FreeScan {
    fn acquire(&mut self, ctx: &mut GoalContext<'_>, acq: AcquireContext<'_>) -> Option<Candidate> {
        if ctx.agent.has_attack_target || acq.enabled.is_empty() {
            return None;
        }
        if self.delay > 0 {
            self.delay -= 1;
            return None;
        }
        self.delay = self.interval;

        let level: &dyn Level = &*ctx.level;
        let agent = ctx.agent;
        let classifier = acq.classifier;
        let enabled = acq.enabled;
        self.scanner
            .find(agent.block_pos(), acq.rng, ctx.budget, |pos| {
                let state = level.block_state(pos);
                classifier
                    .classify(level, agent, &state, pos, enabled)
                    .map(|kind| Candidate::new(pos, state, kind))
            })
    }
}

/// Looks for a closed door on the mob's path after it bumps into something.
#[derive(Debug, Clone, Default)]
pub struct PathLookahead {
    /// Horizontal offset from the mob to the door when the pursuit started.
    approach: Option<(f32, f32)>,
}

impl PathLookahead {
    /// Waypoints inspected beyond the mob's own footprint.
    pub const LOOKAHEAD: usize = 2;
    /// Squared horizontal distance to the door beyond which the breach stops.
    pub const DOOR_REACH_SQ: f32 = 4.0;

    pub fn new() -> Self {
        Self::default()
    }

    /// Columns the mob stands in: every block its bounding box overlaps at the feet.
    fn footprint(agent: &AgentState) -> Vec<BlockPos> {
        let half = agent.width * 0.5;
        let y = agent.position.y.floor() as i32;
        let min_x = (agent.position.x - half).floor() as i32;
        let max_x = (agent.position.x + half).floor() as i32;
        let min_z = (agent.position.z - half).floor() as i32;
        let max_z = (agent.position.z + half).floor() as i32;
        let mut out = Vec::new();
        for x in min_x..=max_x {
            for z in min_z..=max_z {
                out.push(BlockPos::new(x, y, z));
            }
        }
        out
    }

    fn offset_to(agent: &AgentState, pos: BlockPos) -> (f32, f32) {
        let center = pos.center();
        (center.x - agent.position.x, center.z - agent.position.z)
    }

    fn within_reach(agent: &AgentState, pos: BlockPos) -> bool {
        let (dx, dz) = Self::offset_to(agent, pos);
        dx * dx + dz * dz <= Self::DOOR_REACH_SQ
    }
}

impl TargetingStrategy for PathLookahead {
    fn acquire(&mut self, ctx: &mut GoalContext<'_>, acq: AcquireContext<'_>) -> Option<Candidate> {
        if !acq.enabled.contains(ActivitySet::BREAKING_DOOR) {
            return None;
        }
        let agent = ctx.agent;
        if !agent.horizontal_collision || !ctx.nav.is_path_active() || !ctx.nav.can_pass_doors() {
            return None;
        }

        let mut columns = Self::footprint(agent);
        columns.extend(ctx.nav.next_waypoints(Self::LOOKAHEAD));
        let height = agent.height.ceil() as i32;
        let level: &dyn Level = &*ctx.level;

        columns
            .into_iter()
            .flat_map(|base| (0..height.max(1)).map(move |dy| base.offset(0, dy, 0)))
            .filter(|pos| Self::within_reach(agent, *pos))
            .filter_map(|pos| {
                let state = level.block_state(pos);
                acq.classifier
                    .qualifies(level, agent, &state, pos, ActivityKind::BreakingDoor)
                    .then(|| Candidate::new(pos, state, ActivityKind::BreakingDoor))
            })
            .max_by_key(|candidate| candidate.pos.y)
    }

    fn on_start(&mut self, agent: &AgentState, candidate: &Candidate) {
        self.approach = Some(Self::offset_to(agent, candidate.pos));
    }

    /// The mob walked past the door: its offset to the door flipped direction.
    fn is_finished(&self, agent: &AgentState, candidate: &Candidate) -> bool {
        let Some((dx0, dz0)) = self.approach else {
            return false;
        };
        let (dx1, dz1) = Self::offset_to(agent, candidate.pos);
        dx0 * dx1 + dz0 * dz1 < 0.0
    }

    /// The door is still closed and the mob still stands next to it.
    fn still_applies(
        &self,
        level: &dyn Level,
        agent: &AgentState,
        candidate: &Candidate,
    ) -> bool {
        !level.block_state(candidate.pos).open && Self::within_reach(agent, candidate.pos)
    }

    fn steers(&self) -> bool {
        false
    }

    /// Door breaking claims no controls so the mob keeps following its path.
    fn overrides_control_flags(&self) -> Option<ControlFlags> {
        Some(ControlFlags::empty())
    }
}
