//! Tick systems: goal arbitration, movement along paths, and removal of mobs
//! that left the world.

use bevy_ecs::prelude::*;
use tracing::debug;

use mischief_world::{BlockView, Vec3};

use crate::components::*;
use crate::game_world::{GameEvent, LevelResource, OutgoingEvents, TickCounter};

use super::brain::GoalSelector;
use super::budget::ScanBudget;
use super::goal::{AgentState, GoalContext};
use super::pathfinding;

/// Distance at which a waypoint counts as reached.
const WAYPOINT_REACHED: f32 = 0.2;

/// Runs every mob's goal selector against the shared level.
///
/// The scan budget is refilled first, so mobs draw from it in query order.
pub fn system_goal_tick(world: &mut World) {
    let tick = world.resource::<TickCounter>().0;
    world.resource::<ScanBudget>().reset();

    world.resource_scope(|world, mut level: Mut<LevelResource>| {
        world.resource_scope(|world, mut events: Mut<OutgoingEvents>| {
            world.resource_scope(|world, budget: Mut<ScanBudget>| {
                let mut query = world
                    .query_filtered::<(&AgentState, &mut PathNavigator, &mut GoalSelector), With<Mob>>();
                for (agent, mut nav, mut selector) in query.iter_mut(world) {
                    nav.sync(agent.position);
                    let mut ctx = GoalContext {
                        agent,
                        level: &mut level.0,
                        nav: &mut *nav,
                        effects: &mut *events,
                        budget: &*budget,
                        tick,
                    };
                    selector.tick(&mut ctx);
                }
            });
        });
    });
}

/// Moves mobs toward their current waypoint and turns them toward whatever
/// their goals looked at.
///
/// Only the column under the mob's center is checked for collision; a mob
/// that would walk into a solid block stops and is flagged as colliding.
pub fn system_mob_movement(world: &mut World) {
    world.resource_scope(|world, level: Mut<LevelResource>| {
        let mut query = world.query_filtered::<(
            &mut AgentState,
            &mut PathNavigator,
            &mut Rotation,
            &MovementSpeed,
        ), With<Mob>>();
        for (mut agent, mut nav, mut rot, speed) in query.iter_mut(world) {
            if let Some(look) = nav.take_look_target() {
                rot.head_yaw =
                    pathfinding::yaw_toward(agent.position.x, agent.position.z, look.x, look.z);
            }

            let Some(waypoint) = nav.current_waypoint() else {
                agent.horizontal_collision = false;
                continue;
            };
            let goal = waypoint.center();
            let (vx, vz) = pathfinding::move_toward_flat(
                agent.position.x,
                agent.position.z,
                goal.x,
                goal.z,
                speed.0 * nav.speed(),
            );
            let next = Vec3::new(agent.position.x + vx, agent.position.y, agent.position.z + vz);
            let feet = next.block_pos();
            let blocked = (0..agent.height.ceil().max(1.0) as i32)
                .any(|dy| level.0.block_state(feet.offset(0, dy, 0)).has_collision());

            agent.horizontal_collision = blocked;
            if blocked {
                continue;
            }
            if vx != 0.0 || vz != 0.0 {
                rot.yaw = pathfinding::yaw_toward(agent.position.x, agent.position.z, next.x, next.z);
            }
            agent.position = next;
            if pathfinding::distance_xz(next.x, next.z, goal.x, goal.z) < WAYPOINT_REACHED {
                nav.advance();
            }
        }
    });
}

/// Despawns mobs that hid inside a block or blew up during this tick.
pub fn system_remove_departed(world: &mut World) {
    let departed = std::mem::take(&mut world.resource_mut::<OutgoingEvents>().departed);
    if departed.is_empty() {
        return;
    }

    let to_remove: Vec<(Entity, u64)> = {
        let mut query = world.query_filtered::<(Entity, &AgentState), With<Mob>>();
        query
            .iter(world)
            .filter(|(_, agent)| departed.contains(&agent.id))
            .map(|(entity, agent)| (entity, agent.id))
            .collect()
    };

    for (entity, id) in to_remove {
        world.despawn(entity);
        debug!("Mob {id} left the world");
        world
            .resource_mut::<OutgoingEvents>()
            .events
            .push(GameEvent::MobRemoved { agent: id });
    }
}
