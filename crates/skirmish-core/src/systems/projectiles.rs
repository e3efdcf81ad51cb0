//! Projectile flight and impact resolution.

use hecs::{Entity, World};

use crate::components::{Position, Projectile, ProjectileKind, Team, UnitStatus, Vec3};
use crate::config::ProjectileConfig;

use super::combat::deal_damage;
use super::events::EventQueue;

/// A shot queued during the unit AI pass, spawned into the world before
/// projectiles are advanced (so it flies on the frame it was fired).
#[derive(Debug, Clone, Copy)]
pub struct ProjectileSpawn {
    pub origin: Vec3,
    pub velocity: Vec3,
    pub team: Team,
    pub damage: f32,
    pub target: Entity,
    pub kind: ProjectileKind,
}

/// Turn queued shots into projectile entities
pub fn spawn_projectiles(world: &mut World, spawns: Vec<ProjectileSpawn>, config: &ProjectileConfig) {
    for spawn in spawns {
        let mut position = Position::new(spawn.origin);
        position.facing = spawn.velocity.x.atan2(spawn.velocity.z);
        world.spawn((
            position,
            Projectile {
                team: spawn.team,
                kind: spawn.kind,
                damage: spawn.damage,
                velocity: spawn.velocity,
                ttl: config.lifetime,
                target: Some(spawn.target),
            },
        ));
    }
}

/// Advance every projectile: straight flight along the launch velocity,
/// impact when close enough to the (possibly moved) living target, silent
/// expiry when the lifetime runs out.
pub fn projectile_system(
    world: &mut World,
    config: &ProjectileConfig,
    dt: f32,
    events: &mut EventQueue,
) {
    let in_flight: Vec<Entity> = world
        .query::<&Projectile>()
        .iter()
        .map(|(entity, _)| entity)
        .collect();

    let mut finished = Vec::new();
    for entity in in_flight {
        let (velocity, target, damage, expired) = {
            let Ok(mut proj) = world.get::<&mut Projectile>(entity) else {
                continue;
            };
            proj.ttl -= dt;
            (proj.velocity, proj.target, proj.damage, proj.ttl <= 0.0)
        };

        let position = {
            let Ok(mut pos) = world.get::<&mut Position>(entity) else {
                continue;
            };
            pos.world += velocity * dt;
            pos.facing = velocity.x.atan2(velocity.z);
            pos.world
        };

        let mut hit = false;
        if let Some(target) = target {
            let target_alive = world
                .get::<&UnitStatus>(target)
                .map(|s| s.is_alive())
                .unwrap_or(false);
            if target_alive {
                let target_pos = world
                    .get::<&Position>(target)
                    .map(|p| p.world)
                    .unwrap_or(Vec3::ZERO);
                if position.distance(&target_pos) < config.impact_radius {
                    deal_damage(world, target, damage, events);
                    hit = true;
                }
            }
        }

        if hit || expired {
            finished.push(entity);
        }
    }

    for entity in finished {
        let _ = world.despawn(entity);
    }
}
