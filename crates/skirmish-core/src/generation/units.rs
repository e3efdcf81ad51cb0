//! Unit spawning - places both armies in loose formation blocks.

use hecs::{Entity, World};
use rand::Rng;

use crate::components::{
    CombatState, Health, PathState, Position, Team, UnitClass, UnitStatus, Vec3,
};
use crate::config::{SimConfig, UNIT_HEIGHT_OFFSET};
use crate::nav::Terrain;

/// Spawn every unit of both teams from the composition counts.
///
/// Team A forms up on the western third, team B on the eastern third, in
/// rows of five per class with a small seeded jitter. Spawn order (team A
/// then B, warriors → archers → mages) fixes ECS iteration order, which
/// targeting tie-breaks rely on.
pub fn spawn_units(
    world: &mut World,
    comp: &crate::config::BattleComposition,
    terrain: &Terrain,
    config: &SimConfig,
    rng: &mut impl Rng,
) -> Vec<Entity> {
    let mut entities = Vec::new();
    let side_x = |team: Team| match team {
        Team::A => -config.terrain.terrain_size / 3.0,
        Team::B => config.terrain.terrain_size / 3.0,
    };

    for (team, team_comp) in [(Team::A, &comp.team_a), (Team::B, &comp.team_b)] {
        for class in UnitClass::ALL {
            for i in 0..team_comp.count(class) {
                let row = (i / 5) as f32;
                let col = (i % 5) as f32;
                let x = side_x(team) + (rng.gen::<f32>() - 0.5) * 6.0;
                let z = (row * 2.0 - 8.0) + col * 1.6 + (rng.gen::<f32>() - 0.5) * 1.5;
                let y = terrain.height_at(x, z) + UNIT_HEIGHT_OFFSET;

                let attrs = *config.attributes.get(class);
                let entity = world.spawn((
                    team,
                    class,
                    attrs,
                    Health::new(attrs.max_health),
                    UnitStatus::Alive,
                    Position::new(Vec3::new(x, y, z)),
                    CombatState::default(),
                    PathState::default(),
                ));
                entities.push(entity);
            }
        }
    }

    entities
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BattleComposition, TeamComposition};
    use crate::generation::generate_terrain;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn spawn_with_seed(seed: u64) -> (World, Vec<Entity>) {
        let config = SimConfig::default();
        let terrain = generate_terrain(&config.terrain, seed);
        let comp = BattleComposition::new(
            TeamComposition::new(2, 1, 1),
            TeamComposition::new(3, 0, 2),
        );
        let mut world = World::new();
        let mut rng = Pcg32::seed_from_u64(seed);
        let entities = spawn_units(&mut world, &comp, &terrain, &config, &mut rng);
        (world, entities)
    }

    #[test]
    fn test_spawn_counts_match_composition() {
        let (world, entities) = spawn_with_seed(42);
        assert_eq!(entities.len(), 9);
        let team_a = world
            .query::<&Team>()
            .iter()
            .filter(|(_, t)| **t == Team::A)
            .count();
        assert_eq!(team_a, 4);
        let warriors = world
            .query::<&UnitClass>()
            .iter()
            .filter(|(_, c)| **c == UnitClass::Warrior)
            .count();
        assert_eq!(warriors, 5);
    }

    #[test]
    fn test_teams_spawn_on_opposite_sides() {
        let (world, _) = spawn_with_seed(42);
        for (_, (team, pos)) in world.query::<(&Team, &Position)>().iter() {
            match team {
                Team::A => assert!(pos.world.x < 0.0),
                Team::B => assert!(pos.world.x > 0.0),
            }
        }
    }

    #[test]
    fn test_spawn_jitter_is_seeded() {
        let (world_a, ents_a) = spawn_with_seed(42);
        let (world_b, ents_b) = spawn_with_seed(42);
        for (&ea, &eb) in ents_a.iter().zip(&ents_b) {
            let pa = world_a.get::<&Position>(ea).unwrap().world;
            let pb = world_b.get::<&Position>(eb).unwrap().world;
            assert_eq!(pa, pb);
        }
    }

    #[test]
    fn test_units_start_alive_at_full_health() {
        let (world, _) = spawn_with_seed(1);
        for (_, (health, status)) in world.query::<(&Health, &UnitStatus)>().iter() {
            assert_eq!(*status, UnitStatus::Alive);
            assert_eq!(health.current, health.max);
        }
    }
}
