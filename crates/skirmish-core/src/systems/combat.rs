//! Damage resolution and line-of-sight checks.

use hecs::{Entity, World};
use log::debug;

use crate::components::{Attributes, Health, Position, Team, UnitStatus, Vec3};
use crate::generation::Obstacle;

use super::events::{BattleEvent, EventQueue};

/// Ranges above this need line of sight to fire; melee swings don't
pub const RANGED_THRESHOLD: f32 = 3.0;
/// Slack added to obstacle radii when testing shot occlusion
pub const LOS_CLEARANCE: f32 = 0.6;

/// True when no obstacle comes close enough to the straight segment
/// between attacker and target to block the shot.
pub fn line_of_sight(from: Vec3, to: Vec3, obstacles: &[Obstacle]) -> bool {
    let ab = to - from;
    let ab_len_sq = ab.length_squared();
    for obs in obstacles {
        let ao = obs.position - from;
        let t = if ab_len_sq > 0.0 {
            (ao.dot(&ab) / ab_len_sq).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let closest = from + ab * t;
        if closest.distance(&obs.position) < obs.radius + LOS_CLEARANCE {
            return false;
        }
    }
    true
}

/// Apply raw damage to a unit, mitigated by its defense
/// (`damage = max(0, raw - defense)`). Emits a hit event, and a death
/// event when this reduces health to zero or below.
///
/// Returns true when the target died from this hit.
pub fn deal_damage(world: &mut World, target: Entity, raw: f32, events: &mut EventQueue) -> bool {
    let Ok(defense) = world.get::<&Attributes>(target).map(|a| a.defense) else {
        return false;
    };
    let already_dead = world
        .get::<&UnitStatus>(target)
        .map(|s| !s.is_alive())
        .unwrap_or(true);
    if already_dead {
        return false;
    }

    let damage = (raw - defense).max(0.0);
    let position = world
        .get::<&Position>(target)
        .map(|p| p.world)
        .unwrap_or(Vec3::ZERO);

    let depleted = {
        let Ok(mut health) = world.get::<&mut Health>(target) else {
            return false;
        };
        health.current -= damage;
        health.is_depleted()
    };

    events.push(BattleEvent::HitLanded { position });

    if depleted {
        if let Ok(mut status) = world.get::<&mut UnitStatus>(target) {
            *status = UnitStatus::Dead;
        }
        let team = world.get::<&Team>(target).map(|t| *t).unwrap_or(Team::A);
        events.push(BattleEvent::UnitDied {
            unit: target,
            team,
            position,
        });
        debug!("unit {target:?} ({team:?}) died");
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::UnitClass;
    use crate::config::SimConfig;
    use crate::generation::ObstacleKind;

    fn spawn_unit(world: &mut World, class: UnitClass) -> Entity {
        let attrs = *SimConfig::default().attributes.get(class);
        world.spawn((
            Team::B,
            class,
            attrs,
            Health::new(attrs.max_health),
            UnitStatus::Alive,
            Position::new(Vec3::new(0.0, 1.1, 0.0)),
        ))
    }

    #[test]
    fn test_damage_mitigated_by_defense() {
        let mut world = World::new();
        let mut events = EventQueue::new();
        let target = spawn_unit(&mut world, UnitClass::Warrior); // defense 10

        deal_damage(&mut world, target, 14.0, &mut events);

        let health = world.get::<&Health>(target).unwrap();
        assert_eq!(health.current, 96.0);
    }

    #[test]
    fn test_damage_never_negative() {
        let mut world = World::new();
        let mut events = EventQueue::new();
        let target = spawn_unit(&mut world, UnitClass::Warrior);

        // Attack below defense heals nothing
        deal_damage(&mut world, target, 5.0, &mut events);

        let health = world.get::<&Health>(target).unwrap();
        assert_eq!(health.current, 100.0);
        // The hit still registered (cosmetic feedback)
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_lethal_damage_kills_and_reports() {
        let mut world = World::new();
        let mut events = EventQueue::new();
        let target = spawn_unit(&mut world, UnitClass::Mage); // 60 health, 0 defense

        let died = deal_damage(&mut world, target, 100.0, &mut events);

        assert!(died);
        assert_eq!(*world.get::<&UnitStatus>(target).unwrap(), UnitStatus::Dead);
        assert!(events
            .iter()
            .any(|e| matches!(e, BattleEvent::UnitDied { .. })));
    }

    #[test]
    fn test_dead_units_take_no_further_damage() {
        let mut world = World::new();
        let mut events = EventQueue::new();
        let target = spawn_unit(&mut world, UnitClass::Mage);

        assert!(deal_damage(&mut world, target, 100.0, &mut events));
        let health_after_death = world.get::<&Health>(target).unwrap().current;
        assert!(!deal_damage(&mut world, target, 100.0, &mut events));
        assert_eq!(world.get::<&Health>(target).unwrap().current, health_after_death);
    }

    #[test]
    fn test_line_of_sight_clear() {
        let from = Vec3::new(0.0, 1.1, 0.0);
        let to = Vec3::new(10.0, 1.1, 0.0);
        let far_away = Obstacle {
            position: Vec3::new(5.0, 1.2, 8.0),
            radius: 1.2,
            kind: ObstacleKind::Rock,
        };
        assert!(line_of_sight(from, to, &[far_away]));
    }

    #[test]
    fn test_line_of_sight_blocked_by_obstacle_on_segment() {
        let from = Vec3::new(0.0, 1.1, 0.0);
        let to = Vec3::new(10.0, 1.1, 0.0);
        let in_the_way = Obstacle {
            position: Vec3::new(5.0, 1.2, 0.0),
            radius: 1.0,
            kind: ObstacleKind::Tree,
        };
        assert!(!line_of_sight(from, to, &[in_the_way]));
    }

    #[test]
    fn test_line_of_sight_obstacle_beyond_target_does_not_block() {
        let from = Vec3::new(0.0, 1.1, 0.0);
        let to = Vec3::new(10.0, 1.1, 0.0);
        let beyond = Obstacle {
            position: Vec3::new(20.0, 1.2, 0.0),
            radius: 1.2,
            kind: ObstacleKind::Rock,
        };
        assert!(line_of_sight(from, to, &[beyond]));
    }

    #[test]
    fn test_line_of_sight_degenerate_segment() {
        let here = Vec3::new(0.0, 1.1, 0.0);
        assert!(line_of_sight(here, here, &[]));
    }
}
