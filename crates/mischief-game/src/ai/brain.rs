//! GoalSelector ECS component: priority arbitration over a mob's goals.

use bevy_ecs::prelude::*;
use tracing::trace;

use super::goal::{ControlFlags, Goal, GoalContext};

/// Every control a goal can claim, in lock-slot order.
const CONTROLS: [ControlFlags; 3] = [ControlFlags::MOVE, ControlFlags::LOOK, ControlFlags::JUMP];

struct GoalEntry {
    goal: Box<dyn Goal>,
    running: bool,
}

/// Holds a mob's goals and decides which of them run each tick.
///
/// A goal may start when every control it claims is free, or held by an
/// interruptible goal of lower priority (which is then stopped). Goals that
/// claim no controls run alongside everything else.
#[derive(Component)]
pub struct GoalSelector {
    entries: Vec<GoalEntry>,
    /// Index of the goal holding each control slot.
    locks: [Option<usize>; 3],
}

impl GoalSelector {
    /// Create a selector; goals are ordered by priority, ties keep insertion order.
    pub fn new(mut goals: Vec<Box<dyn Goal>>) -> Self {
        goals.sort_by_key(|g| g.priority());
        Self {
            entries: goals
                .into_iter()
                .map(|goal| GoalEntry {
                    goal,
                    running: false,
                })
                .collect(),
            locks: [None; 3],
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Running goals, highest priority first.
    pub fn running(&self) -> impl Iterator<Item = &dyn Goal> {
        self.entries
            .iter()
            .filter(|e| e.running)
            .map(|e| e.goal.as_ref())
    }

    /// One arbitration round followed by a tick of every running goal.
    pub fn tick(&mut self, ctx: &mut GoalContext<'_>) {
        for index in 0..self.entries.len() {
            let entry = &self.entries[index];
            if entry.running && !entry.goal.should_continue(ctx) {
                self.stop_goal(index, ctx);
            }
        }

        for index in 0..self.entries.len() {
            if self.entries[index].running {
                continue;
            }
            let claims = Self::claims(self.entries[index].goal.as_ref());
            if !self.can_claim(index, claims) || !self.entries[index].goal.can_start(ctx) {
                continue;
            }
            for (slot, control) in CONTROLS.iter().enumerate() {
                if !claims.contains(*control) {
                    continue;
                }
                if let Some(holder) = self.locks[slot] {
                    self.stop_goal(holder, ctx);
                }
                self.locks[slot] = Some(index);
            }
            trace!("Mob {} starting goal {:?}", ctx.agent.id, self.entries[index].goal);
            let entry = &mut self.entries[index];
            entry.goal.start(ctx);
            entry.running = true;
        }

        for entry in self.entries.iter_mut().filter(|e| e.running) {
            entry.goal.tick(ctx);
        }
    }

    fn claims(goal: &dyn Goal) -> ControlFlags {
        goal.overrides_control_flags()
            .unwrap_or_else(|| goal.control_flags())
    }

    fn can_claim(&self, index: usize, claims: ControlFlags) -> bool {
        let priority = self.entries[index].goal.priority();
        CONTROLS
            .iter()
            .enumerate()
            .filter(|(_, control)| claims.contains(**control))
            .all(|(slot, _)| match self.locks[slot] {
                None => true,
                Some(holder) => {
                    let held = &self.entries[holder].goal;
                    held.is_interruptible() && priority < held.priority()
                }
            })
    }

    fn stop_goal(&mut self, index: usize, ctx: &mut GoalContext<'_>) {
        let entry = &mut self.entries[index];
        if !entry.running {
            return;
        }
        trace!("Mob {} stopping goal {:?}", ctx.agent.id, entry.goal);
        entry.goal.stop(ctx);
        entry.running = false;
        for lock in self.locks.iter_mut() {
            if *lock == Some(index) {
                *lock = None;
            }
        }
    }
}

impl std::fmt::Debug for GoalSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoalSelector")
            .field("goal_count", &self.entries.len())
            .field(
                "running",
                &self
                    .entries
                    .iter()
                    .enumerate()
                    .filter(|(_, e)| e.running)
                    .map(|(i, _)| i)
                    .collect::<Vec<_>>(),
            )
            .field("locks", &self.locks)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::budget::ScanBudget;
    use crate::ai::goal::AgentState;
    use crate::ai::testing::{RecordingEffects, StubNav};
    use mischief_world::{Vec3, VoxelLevel};
    use std::sync::{Arc, Mutex};

    /// Scripted goal that logs its lifecycle into a shared journal.
    #[derive(Debug)]
    struct Scripted {
        name: &'static str,
        priority: u32,
        flags: ControlFlags,
        wants_start: Arc<Mutex<bool>>,
        interruptible: bool,
        journal: Arc<Mutex<Vec<String>>>,
    }

    impl Scripted {
        fn new(name: &'static str, priority: u32, journal: &Arc<Mutex<Vec<String>>>) -> Self {
            Self {
                name,
                priority,
                flags: ControlFlags::MOVE | ControlFlags::LOOK,
                wants_start: Arc::new(Mutex::new(true)),
                interruptible: true,
                journal: Arc::clone(journal),
            }
        }

        fn log(&self, event: &str) {
            self.journal
                .lock()
                .unwrap()
                .push(format!("{}:{event}", self.name));
        }
    }

    impl Goal for Scripted {
        fn priority(&self) -> u32 {
            self.priority
        }
        fn control_flags(&self) -> ControlFlags {
            self.flags
        }
        fn can_start(&mut self, _ctx: &mut GoalContext<'_>) -> bool {
            *self.wants_start.lock().unwrap()
        }
        fn should_continue(&self, _ctx: &GoalContext<'_>) -> bool {
            true
        }
        fn is_interruptible(&self) -> bool {
            self.interruptible
        }
        fn start(&mut self, _ctx: &mut GoalContext<'_>) {
            self.log("start");
        }
        fn tick(&mut self, _ctx: &mut GoalContext<'_>) {
            self.log("tick");
        }
        fn stop(&mut self, _ctx: &mut GoalContext<'_>) {
            self.log("stop");
        }
    }

    struct Rig {
        level: VoxelLevel,
        agent: AgentState,
        nav: StubNav,
        effects: RecordingEffects,
        budget: ScanBudget,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                level: VoxelLevel::new(0, 16),
                agent: AgentState::new(1, Vec3::ZERO, 0.6, 1.8),
                nav: StubNav::default(),
                effects: RecordingEffects::default(),
                budget: ScanBudget::new(0),
            }
        }

        fn tick(&mut self, selector: &mut GoalSelector) {
            let mut ctx = GoalContext {
                agent: &self.agent,
                level: &mut self.level,
                nav: &mut self.nav,
                effects: &mut self.effects,
                budget: &self.budget,
                tick: 0,
            };
            selector.tick(&mut ctx);
        }
    }

    fn drain(journal: &Arc<Mutex<Vec<String>>>) -> Vec<String> {
        std::mem::take(&mut *journal.lock().unwrap())
    }

    #[test]
    fn higher_priority_preempts_interruptible_goal() {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let stroll = Scripted::new("stroll", 7, &journal);
        let mischief = Scripted::new("mischief", 5, &journal);
        let gate = Arc::clone(&mischief.wants_start);
        *gate.lock().unwrap() = false;
        let mut selector = GoalSelector::new(vec![Box::new(stroll), Box::new(mischief)]);
        let mut rig = Rig::new();

        rig.tick(&mut selector);
        assert_eq!(drain(&journal), vec!["stroll:start", "stroll:tick"]);

        *gate.lock().unwrap() = true;
        rig.tick(&mut selector);
        assert_eq!(
            drain(&journal),
            vec!["stroll:stop", "mischief:start", "mischief:tick"]
        );
    }

    #[test]
    fn uninterruptible_goal_keeps_its_controls() {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let mut digging = Scripted::new("digging", 5, &journal);
        digging.interruptible = false;
        let panic = Scripted::new("panic", 1, &journal);
        let gate = Arc::clone(&panic.wants_start);
        *gate.lock().unwrap() = false;
        let mut selector = GoalSelector::new(vec![Box::new(digging), Box::new(panic)]);
        let mut rig = Rig::new();

        rig.tick(&mut selector);
        drain(&journal);
        *gate.lock().unwrap() = true;
        rig.tick(&mut selector);
        assert_eq!(drain(&journal), vec!["digging:tick"]);
    }

    #[test]
    fn flagless_goal_runs_alongside() {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let mut door = Scripted::new("door", 1, &journal);
        door.flags = ControlFlags::empty();
        let stroll = Scripted::new("stroll", 7, &journal);
        let mut selector = GoalSelector::new(vec![Box::new(stroll), Box::new(door)]);
        let mut rig = Rig::new();

        rig.tick(&mut selector);
        assert_eq!(
            drain(&journal),
            vec!["door:start", "stroll:start", "door:tick", "stroll:tick"]
        );
        assert_eq!(selector.running().count(), 2);
    }
}
