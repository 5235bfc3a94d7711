//! Collaborator doubles shared by the AI unit tests.

use mischief_world::{AgentId, BlockPos, BlockState, Vec3};

use super::goal::{Effects, Navigator};

#[derive(Debug, Default)]
pub struct StubNav {
    pub active: bool,
    pub doors: bool,
    /// Whether `path_to` succeeds and leaves a path active.
    pub accept_paths: bool,
    pub waypoints: Vec<BlockPos>,
    pub path_requests: Vec<BlockPos>,
    pub looked_at: Option<Vec3>,
}

impl Navigator for StubNav {
    fn path_to(&mut self, target: BlockPos, _speed: f32) -> bool {
        self.path_requests.push(target);
        self.active = self.accept_paths;
        self.accept_paths
    }

    fn is_path_active(&self) -> bool {
        self.active
    }

    fn stop(&mut self) {
        self.active = false;
    }

    fn next_waypoints(&self, lookahead: usize) -> Vec<BlockPos> {
        self.waypoints.iter().take(lookahead).copied().collect()
    }

    fn can_pass_doors(&self) -> bool {
        self.doors
    }

    fn look_at(&mut self, target: Vec3) {
        self.looked_at = Some(target);
    }
}

#[derive(Debug, Default)]
pub struct RecordingEffects {
    pub hits: u32,
    pub breaks: Vec<BlockPos>,
    pub progress: Vec<i8>,
    pub interactions: Vec<BlockPos>,
    pub hidden: Vec<(AgentId, BlockPos)>,
    pub exploded: Vec<AgentId>,
}

impl Effects for RecordingEffects {
    fn swing_and_hit(&mut self, _agent: AgentId, _pos: BlockPos, _state: BlockState) {
        self.hits += 1;
    }

    fn break_particles(&mut self, pos: BlockPos, _state: BlockState) {
        self.breaks.push(pos);
    }

    fn report_break_progress(&mut self, _agent: AgentId, _pos: BlockPos, tenths: i8) {
        self.progress.push(tenths);
    }

    fn interaction_particles(&mut self, _agent: AgentId, pos: BlockPos) {
        self.interactions.push(pos);
    }

    fn agent_hidden(&mut self, agent: AgentId, pos: BlockPos) {
        self.hidden.push((agent, pos));
    }

    fn agent_exploded(&mut self, agent: AgentId, _position: Vec3) {
        self.exploded.push(agent);
    }
}
