//! ECS game world: bevy_ecs World, mob spawning, tick systems, and event bus.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bevy_ecs::prelude::*;
use tracing::{debug, info};

use mischief_world::{AgentId, BlockPos, BlockRegistry, BlockState, Vec3, VoxelLevel};

use crate::ai::brain::GoalSelector;
use crate::ai::budget::ScanBudget;
use crate::ai::classifier::ActivityClassifier;
use crate::ai::goal::{AgentState, Effects, Navigator};
use crate::ai::mob_goals::GoalFactory;
use crate::ai::system::{system_goal_tick, system_mob_movement, system_remove_departed};
use crate::components::*;
use crate::config::ActivityConfig;
use crate::mob_registry::MobRegistry;

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// The level every mob acts on.
#[derive(Resource)]
pub struct LevelResource(pub VoxelLevel);

/// Outgoing events queued by ECS operations for the host to consume.
#[derive(Resource, Default)]
pub struct OutgoingEvents {
    pub events: Vec<GameEvent>,
    /// Mobs that hid or exploded this tick and must be despawned.
    pub departed: Vec<AgentId>,
}

/// Global tick counter.
#[derive(Resource, Default)]
pub struct TickCounter(pub u64);

/// Thread-safe agent ID allocator.
#[derive(Resource)]
pub struct AgentIdAllocator {
    next: AtomicU64,
}

impl AgentIdAllocator {
    pub fn new(start: AgentId) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }

    /// Allocate the next unique agent ID.
    pub fn allocate(&self) -> AgentId {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

// ---------------------------------------------------------------------------
// Game events (ECS → host)
// ---------------------------------------------------------------------------

/// Events produced by the game world, consumed by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    MobSpawned {
        agent: AgentId,
        mob_type: String,
        position: Vec3,
    },
    /// Arm swing with a block hit sound.
    BlockHit {
        agent: AgentId,
        pos: BlockPos,
        block: &'static str,
    },
    BlockBroken {
        pos: BlockPos,
        block: &'static str,
    },
    /// Crack overlay update; `-1` clears it.
    BreakProgress {
        agent: AgentId,
        pos: BlockPos,
        tenths: i8,
    },
    BlockUsed { agent: AgentId, pos: BlockPos },
    MobHidden { agent: AgentId, pos: BlockPos },
    MobExploded { agent: AgentId, position: Vec3 },
    /// The mob entity was despawned.
    MobRemoved { agent: AgentId },
}

impl Effects for OutgoingEvents {
    fn swing_and_hit(&mut self, agent: AgentId, pos: BlockPos, state: BlockState) {
        self.events.push(GameEvent::BlockHit {
            agent,
            pos,
            block: state.info().name,
        });
    }

    fn break_particles(&mut self, pos: BlockPos, state: BlockState) {
        self.events.push(GameEvent::BlockBroken {
            pos,
            block: state.info().name,
        });
    }

    fn report_break_progress(&mut self, agent: AgentId, pos: BlockPos, tenths: i8) {
        self.events
            .push(GameEvent::BreakProgress { agent, pos, tenths });
    }

    fn interaction_particles(&mut self, agent: AgentId, pos: BlockPos) {
        self.events.push(GameEvent::BlockUsed { agent, pos });
    }

    fn agent_hidden(&mut self, agent: AgentId, pos: BlockPos) {
        self.events.push(GameEvent::MobHidden { agent, pos });
        self.departed.push(agent);
    }

    fn agent_exploded(&mut self, agent: AgentId, position: Vec3) {
        self.events
            .push(GameEvent::MobExploded { agent, position });
        self.departed.push(agent);
    }
}

// ---------------------------------------------------------------------------
// GameWorld
// ---------------------------------------------------------------------------

/// The ECS game world.
pub struct GameWorld {
    pub world: World,
    pub mob_registry: MobRegistry,
    pub block_registry: BlockRegistry,
    pub config: ActivityConfig,
    classifier: Arc<ActivityClassifier>,
    /// Base seed for mob goals; `None` draws from entropy.
    seed: Option<u64>,
}

impl GameWorld {
    /// Create a game world around `level`.
    pub fn new(level: VoxelLevel, config: ActivityConfig) -> Self {
        let block_registry = BlockRegistry::new();
        let classifier = Arc::new(ActivityClassifier::from_config(&config, &block_registry));

        let mut world = World::new();
        world.insert_resource(LevelResource(level));
        world.insert_resource(OutgoingEvents::default());
        world.insert_resource(TickCounter::default());
        world.insert_resource(AgentIdAllocator::new(1));
        world.insert_resource(ScanBudget::new(config.scan.global_budget));

        Self {
            world,
            mob_registry: MobRegistry::new(),
            block_registry,
            config,
            classifier,
            seed: None,
        }
    }

    /// Make every mob spawned from now on behave reproducibly.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Run one game tick: goals, movement, departed cleanup.
    pub fn tick(&mut self) {
        self.world.resource_mut::<TickCounter>().0 += 1;
        system_goal_tick(&mut self.world);
        system_mob_movement(&mut self.world);
        system_remove_departed(&mut self.world);
    }

    /// Drain all pending outgoing events.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.world.resource_mut::<OutgoingEvents>().events)
    }

    /// Return the current tick count.
    pub fn current_tick(&self) -> u64 {
        self.world.resource::<TickCounter>().0
    }

    /// Spawn a mob standing at `position`. Returns `None` if the type is unknown.
    pub fn spawn_mob(&mut self, type_id: &str, position: Vec3) -> Option<AgentId> {
        let def = self.mob_registry.get(type_id)?.clone();
        let id = self.world.resource::<AgentIdAllocator>().allocate();

        let factory = GoalFactory {
            config: &self.config,
            classifier: Arc::clone(&self.classifier),
            registry: &self.block_registry,
        };
        let seed = self
            .seed
            .map(|s| s ^ id.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        let goals = factory.create_goals(&def, seed);

        let mut agent = AgentState::new(id, position, def.bb_width, def.bb_height);
        agent.held_item = def.held_item;
        agent.explosive = def.explosive;

        self.world.spawn((
            agent,
            PathNavigator::new(def.breaks_doors),
            GoalSelector::new(goals),
            Mob,
            MobType(def.type_id.clone()),
            MovementSpeed(def.movement_speed),
            Rotation::default(),
        ));

        debug!("Spawned {} as mob {id} at {position:?}", def.display_name);
        self.world
            .resource_mut::<OutgoingEvents>()
            .events
            .push(GameEvent::MobSpawned {
                agent: id,
                mob_type: def.type_id,
                position,
            });
        Some(id)
    }

    /// Send a mob walking toward `target`. Returns `false` if the mob is
    /// unknown or no path could be planned.
    pub fn command_move(&mut self, agent: AgentId, target: BlockPos) -> bool {
        let mut query = self
            .world
            .query_filtered::<(&AgentState, &mut PathNavigator), With<Mob>>();
        for (state, mut nav) in query.iter_mut(&mut self.world) {
            if state.id == agent {
                nav.sync(state.position);
                return nav.path_to(target, 1.0);
            }
        }
        false
    }

    pub fn level(&self) -> &VoxelLevel {
        &self.world.resource::<LevelResource>().0
    }

    pub fn level_mut(&mut self) -> &mut VoxelLevel {
        &mut self.world.resource_mut::<LevelResource>().into_inner().0
    }

    pub fn mob_count(&mut self) -> usize {
        let mut query = self.world.query_filtered::<Entity, With<Mob>>();
        query.iter(&self.world).count()
    }

    /// Snapshot of a mob's state.
    pub fn agent(&mut self, agent: AgentId) -> Option<AgentState> {
        let mut query = self.world.query_filtered::<&AgentState, With<Mob>>();
        query.iter(&self.world).find(|a| a.id == agent).cloned()
    }

    /// Log a one-line summary of the population.
    pub fn log_summary(&mut self) {
        let budget = self.world.resource::<ScanBudget>();
        let (used, capacity) = (budget.used(), budget.capacity());
        let tick = self.current_tick();
        let mobs = self.mob_count();
        let hidden = self.level().hidden_count();
        info!("Tick {tick}: {mobs} mobs, {hidden} hidden, scan budget {used}/{capacity}");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mob_registry::MobDefinition;
    use mischief_world::{BlockView, Level};

    /// A 32×32 stone floor at y = 0; mobs stand at y = 1.
    fn flat_world(config: ActivityConfig) -> GameWorld {
        let registry = BlockRegistry::new();
        let mut level = VoxelLevel::new(-16, 64);
        level.fill(
            BlockPos::new(-16, 0, -16),
            BlockPos::new(16, 0, 16),
            registry.state("minecraft:stone").unwrap(),
        );
        GameWorld::new(level, config).with_seed(99)
    }

    fn state(world: &GameWorld, name: &str) -> BlockState {
        world.block_registry.state(name).unwrap()
    }

    #[test]
    fn spawn_emits_event_and_assigns_ids() {
        let mut world = flat_world(ActivityConfig::default());
        let a = world.spawn_mob("minecraft:zombie", Vec3::new(0.5, 1.0, 0.5)).unwrap();
        let b = world.spawn_mob("minecraft:pig", Vec3::new(2.5, 1.0, 0.5)).unwrap();
        assert_ne!(a, b);
        assert!(world.spawn_mob("minecraft:ender_dragon", Vec3::ZERO).is_none());
        assert_eq!(world.mob_count(), 2);

        let events = world.drain_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], GameEvent::MobSpawned { agent, .. } if *agent == a));
        assert!(world.drain_events().is_empty());
    }

    #[test]
    fn zombie_breaks_nearby_torches() {
        let mut world = flat_world(ActivityConfig::default());
        let torch = state(&world, "minecraft:torch");
        world.level_mut().fill(BlockPos::new(-2, 1, -2), BlockPos::new(2, 1, 2), torch);
        world.level_mut().set_block(BlockPos::new(0, 1, 0), BlockState::AIR);
        world.spawn_mob("minecraft:zombie", Vec3::new(0.5, 1.0, 0.5));

        let mut broken = Vec::new();
        for _ in 0..600 {
            world.tick();
            for event in world.drain_events() {
                if let GameEvent::BlockBroken { pos, block } = event {
                    broken.push((pos, block));
                }
            }
        }

        assert!(!broken.is_empty());
        for (pos, block) in &broken {
            assert_eq!(*block, "minecraft:torch");
            assert!(world.level().block_state(*pos).is_air());
        }
        assert!(world.level().drops().iter().any(|(_, b)| *b == "minecraft:torch"));
    }

    #[test]
    fn mob_griefing_off_leaves_blocks_alone() {
        let mut world = flat_world(ActivityConfig::default());
        world.level_mut().set_mob_griefing(false);
        let torch = state(&world, "minecraft:torch");
        world.level_mut().fill(BlockPos::new(-2, 1, -2), BlockPos::new(2, 1, 2), torch);
        world.level_mut().set_block(BlockPos::new(0, 1, 0), BlockState::AIR);
        world.spawn_mob("minecraft:zombie", Vec3::new(0.5, 1.0, 0.5));

        for _ in 0..300 {
            world.tick();
        }
        assert!(!world
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::BlockBroken { .. })));
    }

    #[test]
    fn door_breaker_walks_through_broken_door() {
        let mut world = flat_world(ActivityConfig::default());
        let stone = state(&world, "minecraft:stone");
        let door = state(&world, "minecraft:oak_door");
        // Wall across x = 4 with a door at z = 0.
        world
            .level_mut()
            .fill(BlockPos::new(4, 1, -6), BlockPos::new(4, 3, 6), stone);
        world.level_mut().set_block(BlockPos::new(4, 1, 0), door);
        world.level_mut().set_block(BlockPos::new(4, 2, 0), door);

        world.mob_registry.register(MobDefinition {
            breaks_doors: true,
            wanders: false,
            ..MobDefinition::new("test:brute", "Brute", 0.23, 0.6, 1.95)
        });
        let id = world
            .spawn_mob("test:brute", Vec3::new(1.5, 1.0, 0.5))
            .unwrap();
        assert!(world.command_move(id, BlockPos::new(8, 1, 0)));

        let mut door_broken = false;
        for _ in 0..400 {
            world.tick();
            door_broken |= world.drain_events().iter().any(|e| {
                matches!(e, GameEvent::BlockBroken { block, .. } if *block == "minecraft:oak_door")
            });
        }

        assert!(door_broken);
        assert!(world.level().block_state(BlockPos::new(4, 1, 0)).is_air());
        assert!(world.level().block_state(BlockPos::new(4, 2, 0)).is_air());
        let agent = world.agent(id).unwrap();
        assert!(agent.position.x > 8.0);
        assert!(!agent.horizontal_collision);
    }

    #[test]
    fn creeper_explodes_and_is_removed() {
        let mut world = flat_world(ActivityConfig::default());
        let torch = state(&world, "minecraft:torch");
        world.level_mut().fill(BlockPos::new(-2, 1, -2), BlockPos::new(2, 1, 2), torch);
        world.level_mut().set_block(BlockPos::new(0, 1, 0), BlockState::AIR);
        let id = world
            .spawn_mob("minecraft:creeper", Vec3::new(0.5, 1.0, 0.5))
            .unwrap();

        let mut events = Vec::new();
        for _ in 0..600 {
            world.tick();
            events.extend(world.drain_events());
            if world.mob_count() == 0 {
                break;
            }
        }

        assert_eq!(world.mob_count(), 0);
        assert!(world.agent(id).is_none());
        let exploded = events
            .iter()
            .position(|e| matches!(e, GameEvent::MobExploded { agent, .. } if *agent == id));
        let removed = events
            .iter()
            .position(|e| matches!(e, GameEvent::MobRemoved { agent } if *agent == id));
        assert!(exploded.unwrap() < removed.unwrap());
    }

    #[test]
    fn scan_budget_caps_samples_across_mobs() {
        let mut config = ActivityConfig::default();
        config.scan.global_budget = 40;
        let mut world = flat_world(config);
        for i in 0..6 {
            world.spawn_mob("minecraft:zombie", Vec3::new(i as f32 * 2.0 + 0.5, 1.0, 0.5));
        }

        world.tick();
        let budget = world.world.resource::<ScanBudget>();
        assert_eq!(budget.used(), 40);
        assert_eq!(budget.remaining(), 0);
    }

    #[test]
    fn command_move_walks_to_target() {
        let mut world = flat_world(ActivityConfig::default());
        world.mob_registry.register(MobDefinition {
            wanders: false,
            ..MobDefinition::new("test:walker", "Walker", 0.25, 0.6, 1.8)
        });
        let id = world.spawn_mob("test:walker", Vec3::new(0.5, 1.0, 0.5)).unwrap();
        assert!(world.command_move(id, BlockPos::new(5, 1, 3)));
        assert!(!world.command_move(999, BlockPos::new(5, 1, 3)));

        for _ in 0..60 {
            world.tick();
        }
        let agent = world.agent(id).unwrap();
        assert_eq!(agent.block_pos(), BlockPos::new(5, 1, 3));
    }
}
