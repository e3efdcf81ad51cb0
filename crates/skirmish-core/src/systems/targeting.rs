//! Target acquisition - nearest living enemy selection.

use hecs::{Entity, World};

use crate::components::{Position, Team, UnitStatus, Vec3};

/// Per-frame snapshot of one unit, used by the sequential AI pass.
///
/// Rows are collected in ECS iteration order, which equals spawn order
/// because a unit's component set never changes - this keeps targeting
/// tie-breaks stable for a fixed battle setup.
#[derive(Debug, Clone, Copy)]
pub struct UnitRow {
    pub entity: Entity,
    pub team: Team,
    pub pos: Vec3,
    pub alive: bool,
}

/// Snapshot every unit for this frame's AI pass
pub fn collect_rows(world: &World) -> Vec<UnitRow> {
    world
        .query::<(&Team, &Position, &UnitStatus)>()
        .iter()
        .map(|(entity, (team, pos, status))| UnitRow {
            entity,
            team: *team,
            pos: pos.world,
            alive: status.is_alive(),
        })
        .collect()
}

/// Row index of an entity, if it is a unit
pub fn row_of(rows: &[UnitRow], entity: Entity) -> Option<usize> {
    rows.iter().position(|r| r.entity == entity)
}

/// Nearest living enemy of `rows[me]` by Euclidean distance.
/// Ties keep the earliest row, so results are stable for a fixed ordering.
pub fn find_nearest_enemy(rows: &[UnitRow], me: usize) -> Option<usize> {
    let my_team = rows[me].team;
    let my_pos = rows[me].pos;
    let mut nearest = None;
    let mut min_dist = f32::INFINITY;
    for (idx, row) in rows.iter().enumerate() {
        if row.team == my_team || !row.alive {
            continue;
        }
        let dist = my_pos.distance(&row.pos);
        if dist < min_dist {
            min_dist = dist;
            nearest = Some(idx);
        }
    }
    nearest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Position, Vec3};

    fn unit(world: &mut World, team: Team, x: f32) -> Entity {
        world.spawn((team, Position::new(Vec3::new(x, 0.0, 0.0)), UnitStatus::Alive))
    }

    #[test]
    fn test_nearest_enemy_selection() {
        let mut world = World::new();
        let me = unit(&mut world, Team::A, 0.0);
        let far = unit(&mut world, Team::B, 10.0);
        let near = unit(&mut world, Team::B, 3.0);
        let _friend = unit(&mut world, Team::A, 1.0);

        let rows = collect_rows(&world);
        let me_idx = row_of(&rows, me).unwrap();
        let chosen = find_nearest_enemy(&rows, me_idx).unwrap();
        assert_eq!(rows[chosen].entity, near);
        assert_ne!(rows[chosen].entity, far);
    }

    #[test]
    fn test_dead_enemies_are_ignored() {
        let mut world = World::new();
        let me = unit(&mut world, Team::A, 0.0);
        let corpse = world.spawn((
            Team::B,
            Position::new(Vec3::new(1.0, 0.0, 0.0)),
            UnitStatus::Dead,
        ));
        let living = unit(&mut world, Team::B, 8.0);

        let rows = collect_rows(&world);
        let me_idx = row_of(&rows, me).unwrap();
        let chosen = find_nearest_enemy(&rows, me_idx).unwrap();
        assert_eq!(rows[chosen].entity, living);
        assert_ne!(rows[chosen].entity, corpse);
    }

    #[test]
    fn test_no_living_enemy_yields_none() {
        let mut world = World::new();
        let me = unit(&mut world, Team::A, 0.0);
        unit(&mut world, Team::A, 2.0);

        let rows = collect_rows(&world);
        let me_idx = row_of(&rows, me).unwrap();
        assert!(find_nearest_enemy(&rows, me_idx).is_none());
    }

    #[test]
    fn test_tie_breaks_by_iteration_order() {
        let mut world = World::new();
        let me = unit(&mut world, Team::A, 0.0);
        let first = unit(&mut world, Team::B, 5.0);
        let _second = unit(&mut world, Team::B, -5.0);

        let rows = collect_rows(&world);
        let me_idx = row_of(&rows, me).unwrap();
        let chosen = find_nearest_enemy(&rows, me_idx).unwrap();
        assert_eq!(rows[chosen].entity, first);
    }
}
