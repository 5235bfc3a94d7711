//! Per-mob-type goal lists.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use mischief_world::{BlockPos, BlockRegistry};

use super::classifier::ActivityClassifier;
use super::goal::{ControlFlags, Goal, GoalContext};
use super::state_machine::ActivityStateMachine;
use crate::config::ActivityConfig;
use crate::mob_registry::MobDefinition;

pub const DOOR_BREACH_PRIORITY: u32 = 1;
pub const MISCHIEF_PRIORITY: u32 = 5;
pub const STROLL_PRIORITY: u32 = 7;

/// Shared inputs for building goal lists.
pub struct GoalFactory<'a> {
    pub config: &'a ActivityConfig,
    pub classifier: Arc<ActivityClassifier>,
    pub registry: &'a BlockRegistry,
}

impl GoalFactory<'_> {
    /// Create the goal list for a mob type. `seed` makes the goals' random
    /// choices reproducible.
    pub fn create_goals(&self, def: &MobDefinition, seed: Option<u64>) -> Vec<Box<dyn Goal>> {
        let rng = |salt: u64| match seed {
            Some(seed) => StdRng::seed_from_u64(seed ^ salt),
            None => StdRng::from_entropy(),
        };
        let mut goals: Vec<Box<dyn Goal>> = Vec::new();
        if def.breaks_doors {
            let mut door = ActivityStateMachine::door_breaching(
                DOOR_BREACH_PRIORITY,
                self.config,
                Arc::clone(&self.classifier),
                self.registry,
            );
            if let Some(seed) = seed {
                door = door.with_seed(seed ^ 0xD00B);
            }
            goals.push(Box::new(door));
        }
        if def.mischievous {
            let mut mischief = ActivityStateMachine::idle(
                MISCHIEF_PRIORITY,
                self.config,
                Arc::clone(&self.classifier),
                self.registry,
            );
            if let Some(seed) = seed {
                mischief = mischief.with_seed(seed ^ 0x1D1E);
            }
            goals.push(Box::new(mischief));
        }
        if def.wanders {
            goals.push(Box::new(RandomStroll::new(rng(0x57A0))));
        }
        goals
    }
}

/// Wander to a random nearby spot, then rest a while.
#[derive(Debug)]
pub struct RandomStroll {
    cooldown_until: u64,
    started_at: u64,
    target: Option<BlockPos>,
    rng: StdRng,
}

impl RandomStroll {
    const RANGE: i32 = 10;
    /// Strolls that take longer than this are abandoned.
    const MAX_TICKS: u64 = 200;

    pub fn new(rng: StdRng) -> Self {
        Self {
            cooldown_until: 0,
            started_at: 0,
            target: None,
            rng,
        }
    }
}

impl Goal for RandomStroll {
    fn priority(&self) -> u32 {
        STROLL_PRIORITY
    }

    fn control_flags(&self) -> ControlFlags {
        ControlFlags::MOVE
    }

    fn can_start(&mut self, ctx: &mut GoalContext<'_>) -> bool {
        if !ctx.agent.on_ground || ctx.tick < self.cooldown_until {
            return false;
        }
        let dx = self.rng.gen_range(-Self::RANGE..=Self::RANGE);
        let dz = self.rng.gen_range(-Self::RANGE..=Self::RANGE);
        let target = ctx.agent.block_pos().offset(dx, 0, dz);
        if ctx.level.block_state(target).has_collision() {
            return false;
        }
        self.target = Some(target);
        true
    }

    fn should_continue(&self, ctx: &GoalContext<'_>) -> bool {
        ctx.nav.is_path_active() && ctx.tick.saturating_sub(self.started_at) < Self::MAX_TICKS
    }

    fn start(&mut self, ctx: &mut GoalContext<'_>) {
        self.started_at = ctx.tick;
        if let Some(target) = self.target {
            ctx.nav.path_to(target, 1.0);
        }
    }

    fn tick(&mut self, _ctx: &mut GoalContext<'_>) {}

    fn stop(&mut self, ctx: &mut GoalContext<'_>) {
        ctx.nav.stop();
        self.target = None;
        self.cooldown_until = ctx.tick + self.rng.gen_range(40..120);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mob_registry::MobRegistry;

    fn factory_goals(type_id: &str) -> Vec<Box<dyn Goal>> {
        let config = ActivityConfig::default();
        let registry = BlockRegistry::new();
        let factory = GoalFactory {
            config: &config,
            classifier: Arc::new(ActivityClassifier::from_config(&config, &registry)),
            registry: &registry,
        };
        let mobs = MobRegistry::new();
        factory.create_goals(mobs.get(type_id).unwrap(), Some(3))
    }

    #[test]
    fn zombie_gets_door_mischief_and_stroll() {
        let goals = factory_goals("minecraft:zombie");
        let priorities: Vec<u32> = goals.iter().map(|g| g.priority()).collect();
        assert_eq!(
            priorities,
            vec![DOOR_BREACH_PRIORITY, MISCHIEF_PRIORITY, STROLL_PRIORITY]
        );
        assert_eq!(goals[0].overrides_control_flags(), Some(ControlFlags::empty()));
        assert_eq!(goals[1].overrides_control_flags(), None);
    }

    #[test]
    fn pig_only_strolls() {
        let goals = factory_goals("minecraft:pig");
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].control_flags(), ControlFlags::MOVE);
    }

    #[test]
    fn creeper_has_no_door_goal() {
        let goals = factory_goals("minecraft:creeper");
        assert_eq!(goals.len(), 2);
        assert!(goals.iter().all(|g| g.priority() != DOOR_BREACH_PRIORITY));
    }
}
