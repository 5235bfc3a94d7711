//! Straight-line pathing on flat terrain.

use mischief_world::BlockPos;

/// Longest path the planner will produce, in waypoints.
pub const MAX_PATH_LEN: usize = 48;

/// Velocity `(vx, vz)` that moves from `(current_x, current_z)` toward
/// `(goal_x, goal_z)` at `speed` blocks/tick.
pub fn move_toward_flat(
    current_x: f32,
    current_z: f32,
    goal_x: f32,
    goal_z: f32,
    speed: f32,
) -> (f32, f32) {
    let dx = goal_x - current_x;
    let dz = goal_z - current_z;
    let dist = (dx * dx + dz * dz).sqrt();

    if dist < 0.01 {
        return (0.0, 0.0);
    }

    // Never overshoot the goal.
    let step = speed.min(dist);
    (dx / dist * step, dz / dist * step)
}

/// Yaw angle (0..360 degrees) from one position facing another.
///
/// 0 = south (+Z), 90 = west (-X), 180 = north (-Z), 270 = east (+X).
pub fn yaw_toward(from_x: f32, from_z: f32, to_x: f32, to_z: f32) -> f32 {
    let dx = to_x - from_x;
    let dz = to_z - from_z;
    let yaw = (-dx).atan2(dz).to_degrees();
    ((yaw % 360.0) + 360.0) % 360.0
}

/// Block columns on the straight line from `start` to `goal`, excluding the
/// start column and including the goal. Waypoints keep the start's height.
///
/// Returns an empty path when the goal is farther than [`MAX_PATH_LEN`].
pub fn find_path(start: BlockPos, goal: BlockPos) -> Vec<BlockPos> {
    let dx = goal.x - start.x;
    let dz = goal.z - start.z;
    let steps = dx.abs().max(dz.abs());
    if steps == 0 || steps as usize > MAX_PATH_LEN {
        return Vec::new();
    }
    (1..=steps)
        .map(|i| {
            let x = start.x + (dx as f32 * i as f32 / steps as f32).round() as i32;
            let z = start.z + (dz as f32 * i as f32 / steps as f32).round() as i32;
            BlockPos::new(x, start.y, z)
        })
        .collect()
}

/// Distance between two positions in the XZ plane.
pub fn distance_xz(x1: f32, z1: f32, x2: f32, z2: f32) -> f32 {
    let dx = x2 - x1;
    let dz = z2 - z1;
    (dx * dx + dz * dz).sqrt()
}
