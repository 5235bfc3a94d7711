//! Line-of-sight checks from a mob's eyes to its candidate block.

use mischief_world::{BlockPos, CollisionMode, HitResult, Level, Vec3};

use super::activity::Candidate;
use super::classifier::ActivityClassifier;
use super::goal::AgentState;

/// Ray endpoints sit just inside the target cube so the last traversed cell
/// is the target itself.
const FACE_INSET: f32 = 0.499;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SightOutcome {
    Unreachable,
    /// The candidate (possibly retargeted) at this position can be acted on.
    Reachable(BlockPos),
}

#[derive(Debug, Clone, Copy)]
pub struct SightTracer {
    reach_sq: f32,
}

impl SightTracer {
    pub fn new(reach: f32) -> Self {
        Self {
            reach_sq: reach * reach,
        }
    }

    /// Whether `pos` is within reach of the agent's eyes.
    pub fn in_reach(&self, agent: &AgentState, pos: BlockPos) -> bool {
        pos.center_distance_sq(&agent.eye_position()) <= self.reach_sq
    }

    /// Cast up to three rays at the faces of `candidate` nearest the agent.
    ///
    /// A ray that misses counts as a hit on the candidate. A ray stopped by
    /// another block that qualifies for the same activity replaces the
    /// candidate with that block.
    pub fn check<L: Level + ?Sized>(
        &self,
        level: &L,
        agent: &AgentState,
        candidate: &mut Candidate,
        classifier: &ActivityClassifier,
    ) -> SightOutcome {
        if !self.in_reach(agent, candidate.pos) {
            return SightOutcome::Unreachable;
        }
        let eye = agent.eye_position();
        for target in face_targets(eye, candidate.pos) {
            match level.cast_ray(eye, target, CollisionMode::Collider) {
                HitResult::Miss => return SightOutcome::Reachable(candidate.pos),
                HitResult::Block { pos, .. } if pos == candidate.pos => {
                    return SightOutcome::Reachable(pos);
                }
                HitResult::Block { pos, .. } => {
                    let state = level.block_state(pos);
                    if classifier.qualifies(level, agent, &state, pos, candidate.activity) {
                        *candidate = Candidate::new(pos, state, candidate.activity);
                        return SightOutcome::Reachable(pos);
                    }
                }
            }
        }
        SightOutcome::Unreachable
    }
}

/// Centers of the x-, y-, and z-facing faces of `pos` that face `eye`.
fn face_targets(eye: Vec3, pos: BlockPos) -> [Vec3; 3] {
    let center = pos.center();
    let toward = |from: f32, to: f32| (from - to).signum() * FACE_INSET;
    [
        Vec3::new(center.x + toward(eye.x, center.x), center.y, center.z),
        Vec3::new(center.x, center.y + toward(eye.y, center.y), center.z),
        Vec3::new(center.x, center.y, center.z + toward(eye.z, center.z)),
    ]
}
