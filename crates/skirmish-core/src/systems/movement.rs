//! Steering - waypoint following with arrival damping and obstacle
//! avoidance, constrained by terrain slope and bounds.

use crate::components::{Attributes, PathState, Position, Vec3};
use crate::config::{TerrainConfig, UNIT_HEIGHT_OFFSET};
use crate::generation::Obstacle;
use crate::nav::Terrain;

/// Distance at which a waypoint counts as reached
pub const ARRIVAL_RADIUS: f32 = 0.5;
/// Units slow down inside this distance of their destination
pub const SLOWING_RADIUS: f32 = 3.5;
/// Extra clearance added to obstacle radii when steering around them
pub const AVOID_CLEARANCE: f32 = 1.6;

/// Advance one unit for this frame.
///
/// Heads for the next path waypoint, or straight at `target_pos` when no
/// path is available. The final velocity is the arrival-damped seek vector
/// plus a repulsion from every obstacle ahead of the unit. Moves that would
/// cross a slope steeper than the configured maximum are rejected; the
/// position is clamped to terrain bounds and snapped to the surface.
pub fn move_unit(
    pos: &mut Position,
    path: &mut PathState,
    attrs: &Attributes,
    target_pos: Vec3,
    obstacles: &[Obstacle],
    terrain: &Terrain,
    config: &TerrainConfig,
    dt: f32,
) {
    let destination = match &path.path {
        Some(waypoints) if path.path_index < waypoints.len() => {
            let waypoint = waypoints[path.path_index];
            if pos.world.distance(&waypoint) < ARRIVAL_RADIUS {
                // Reached this waypoint; aim at the next one next frame
                path.path_index += 1;
                return;
            }
            waypoint
        }
        _ => target_pos,
    };

    // Seek with arrival damping
    let mut desired = (destination - pos.world).horizontal();
    let dist = desired.length();
    let speed = if dist < SLOWING_RADIUS {
        attrs.speed * (dist / SLOWING_RADIUS)
    } else {
        attrs.speed
    };
    desired = desired.with_length(speed);

    // Repulsion from obstacles ahead of the forward vector
    let mut avoid = Vec3::ZERO;
    let forward = desired.normalize();
    for obs in obstacles {
        let offset = obs.position - pos.world;
        if offset.dot(&forward) <= 0.0 {
            continue;
        }
        let danger = (AVOID_CLEARANCE + obs.radius) * 2.0;
        let dist_obs = offset.length();
        if dist_obs < danger {
            let strength = (danger - dist_obs) / danger;
            avoid += offset.normalize() * (-strength * attrs.speed);
        }
    }

    let steering = desired + avoid;
    if steering.length_squared() == 0.0 {
        return;
    }

    let step = steering.length() * dt;
    let direction = steering.normalize();
    let candidate = pos.world + direction * step;

    // Reject the move if the terrain between here and there is too steep
    let h1 = terrain.height_at(pos.world.x, pos.world.z);
    let h2 = terrain.height_at(candidate.x, candidate.z);
    let horizontal = pos.world.horizontal_distance(&candidate);
    let slope = if horizontal > 0.0 {
        (h2 - h1).abs() / horizontal
    } else {
        0.0
    };
    if slope <= config.max_slope {
        pos.world = candidate;
        pos.facing = direction.x.atan2(direction.z);
    }

    // Clamp to terrain bounds and snap to the surface
    let half = config.terrain_size / 2.0;
    pos.world.x = pos.world.x.clamp(-half, half);
    pos.world.z = pos.world.z.clamp(-half, half);
    pos.world.y = terrain.height_at(pos.world.x, pos.world.z) + UNIT_HEIGHT_OFFSET;
}
