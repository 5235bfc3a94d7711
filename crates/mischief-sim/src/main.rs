mod config;
mod demo;

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use config::SimConfig;
use mischief_game::game_world::{GameEvent, GameWorld};
use mischief_world::Vec3;

fn event_kind(event: &GameEvent) -> &'static str {
    match event {
        GameEvent::MobSpawned { .. } => "spawned",
        GameEvent::BlockHit { .. } => "hits",
        GameEvent::BlockBroken { .. } => "blocks broken",
        GameEvent::BreakProgress { .. } => "progress updates",
        GameEvent::BlockUsed { .. } => "blocks used",
        GameEvent::MobHidden { .. } => "hidden",
        GameEvent::MobExploded { .. } => "exploded",
        GameEvent::MobRemoved { .. } => "removed",
    }
}

fn main() {
    let config = match SimConfig::load("sim.toml") {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load sim.toml: {e}");
            std::process::exit(1);
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let sim = &config.simulation;
    let seed = sim.seed.unwrap_or_else(rand::random);
    info!(
        "Mischief simulation v{} starting: {} ticks, seed {seed}",
        env!("CARGO_PKG_VERSION"),
        sim.ticks
    );

    let mut level = demo::build_level();
    level.set_mob_griefing(sim.mob_griefing);
    let mut world = GameWorld::new(level, config.activities.clone()).with_seed(seed);

    let mut rng = StdRng::seed_from_u64(seed);
    for spawn in &sim.mobs {
        for _ in 0..spawn.count {
            let x = rng.gen_range(-demo::SPAWN_RADIUS..=demo::SPAWN_RADIUS) as f32 + 0.5;
            let z = rng.gen_range(-demo::SPAWN_RADIUS..=demo::SPAWN_RADIUS) as f32 + 0.5;
            if world
                .spawn_mob(&spawn.type_id, Vec3::new(x, demo::FLOOR_Y as f32 + 1.0, z))
                .is_none()
            {
                warn!("Unknown mob type {:?}, skipping", spawn.type_id);
                break;
            }
        }
    }
    info!("Spawned {} mobs", world.mob_count());

    let mut totals: BTreeMap<&'static str, u64> = BTreeMap::new();
    for _ in 0..sim.ticks {
        world.tick();
        for event in world.drain_events() {
            *totals.entry(event_kind(&event)).or_default() += 1;
        }
        if sim.report_interval > 0 && world.current_tick() % sim.report_interval == 0 {
            world.log_summary();
        }
    }

    world.log_summary();
    for (kind, count) in &totals {
        info!("  {kind}: {count}");
    }
    info!("{} blocks dropped as items", world.level().drops().len());
}
