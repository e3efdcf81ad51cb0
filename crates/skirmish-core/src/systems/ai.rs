//! Per-unit AI - the sequential per-frame pass over every living unit:
//! targeting, path maintenance, movement or attack.
//!
//! Units are processed one at a time in spawn order, and damage is applied
//! immediately, so a unit killed early in the pass is already dead for
//! everyone processed after it.

use hecs::World;
use log::trace;

use crate::components::{
    Attributes, CombatState, PathState, Position, ProjectileKind, UnitClass, Vec3,
};
use crate::config::SimConfig;
use crate::generation::Obstacle;
use crate::nav::{find_path, Terrain};

use super::combat::{deal_damage, line_of_sight, RANGED_THRESHOLD};
use super::events::EventQueue;
use super::movement::move_unit;
use super::projectiles::ProjectileSpawn;
use super::targeting::{collect_rows, find_nearest_enemy, row_of};

/// Run one AI frame for every living unit. Returns the shots fired this
/// frame, to be spawned before the projectile pass.
pub fn unit_ai_system(
    world: &mut World,
    terrain: &Terrain,
    obstacles: &[Obstacle],
    config: &SimConfig,
    dt: f32,
    events: &mut EventQueue,
) -> Vec<ProjectileSpawn> {
    let mut rows = collect_rows(world);
    let mut spawns = Vec::new();

    for idx in 0..rows.len() {
        if !rows[idx].alive {
            continue;
        }
        let entity = rows[idx].entity;
        let team = rows[idx].team;

        let Ok(class) = world.get::<&UnitClass>(entity).map(|c| *c) else {
            continue;
        };
        let Ok(attrs) = world.get::<&Attributes>(entity).map(|a| *a) else {
            continue;
        };
        let mut combat = match world.get::<&mut CombatState>(entity) {
            Ok(mut state) => std::mem::take(&mut *state),
            Err(_) => continue,
        };
        let mut path = match world.get::<&mut PathState>(entity) {
            Ok(mut state) => std::mem::take(&mut *state),
            Err(_) => continue,
        };

        combat.cooldown -= dt;

        // 1. Targeting: keep the current target while it lives, otherwise
        // pick the nearest living enemy (dropping any stale path)
        let current = combat
            .target
            .and_then(|t| row_of(&rows, t))
            .filter(|&t| rows[t].alive);
        let target_idx = match current {
            Some(t) => Some(t),
            None => {
                let found = find_nearest_enemy(&rows, idx);
                combat.target = found.map(|t| rows[t].entity);
                path.clear();
                found
            }
        };
        let Some(target_idx) = target_idx else {
            // No enemies left; idle
            write_back(world, entity, combat, path);
            continue;
        };
        let target_entity = rows[target_idx].entity;
        let target_pos = rows[target_idx].pos;
        let my_pos = rows[idx].pos;

        // 2. Path maintenance: recompute when there is no path, the target
        // changed, or the target drifted more than a cell from the goal the
        // path was computed against
        let needs_repath = path.path.is_none()
            || path.computed_for != Some(target_entity)
            || path
                .goal
                .map_or(true, |goal| goal.distance(&target_pos) > terrain.grid.cell_size());
        if needs_repath {
            let route = find_path(&terrain.grid, my_pos, target_pos);
            if route.is_none() {
                trace!("unit {entity:?}: no route to target, falling back to direct movement");
            }
            path.set(route, target_entity, target_pos);
        } else if let Some(waypoints) = &path.path {
            // Defensive re-route if the next waypoint's cell got blocked
            if let Some(next) = waypoints.get(path.path_index) {
                let g = terrain.grid.world_to_grid(next.x, next.z);
                if !terrain.grid.is_walkable(g.x, g.z) {
                    let route = find_path(&terrain.grid, my_pos, target_pos);
                    path.set(route, target_entity, target_pos);
                }
            }
        }

        // 3. In range: stop pathing and attack. Out of range: advance.
        let dist = my_pos.distance(&target_pos);
        if dist <= attrs.range {
            path.path = None;
            if combat.cooldown <= 0.0 {
                let ranged = attrs.range > RANGED_THRESHOLD;
                if ranged && !line_of_sight(my_pos, target_pos, obstacles) {
                    // Shot suppressed; the cooldown keeps ticking but does
                    // not reset, so the unit fires as soon as the line clears
                    trace!("unit {entity:?}: shot blocked by obstacle");
                } else {
                    if class == UnitClass::Warrior {
                        if deal_damage(world, target_entity, attrs.attack, events) {
                            rows[target_idx].alive = false;
                        }
                    } else {
                        let direction = (target_pos - my_pos).normalize();
                        spawns.push(ProjectileSpawn {
                            origin: my_pos + Vec3::new(0.0, 0.2, 0.0),
                            velocity: direction * config.projectile.speed,
                            team,
                            damage: attrs.attack,
                            target: target_entity,
                            kind: if class == UnitClass::Archer {
                                ProjectileKind::Arrow
                            } else {
                                ProjectileKind::Bolt
                            },
                        });
                    }
                    combat.cooldown = attrs.attack_interval;
                }
            }
        } else if let Ok(mut pos) = world.get::<&mut Position>(entity) {
            move_unit(
                &mut pos,
                &mut path,
                &attrs,
                target_pos,
                obstacles,
                terrain,
                &config.terrain,
                dt,
            );
            rows[idx].pos = pos.world;
        }

        write_back(world, entity, combat, path);
    }

    spawns
}

fn write_back(world: &mut World, entity: hecs::Entity, combat: CombatState, path: PathState) {
    if let Ok(mut state) = world.get::<&mut CombatState>(entity) {
        *state = combat;
    }
    if let Ok(mut state) = world.get::<&mut PathState>(entity) {
        *state = path;
    }
}
