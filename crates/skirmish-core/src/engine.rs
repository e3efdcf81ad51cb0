//! Battle engine - main entry point for running the simulation.
//!
//! A `BattleEngine` owns the ECS world, terrain, obstacles, and clock for
//! one battle session. The host drives it with `step(dt)` and reads the
//! per-frame query surface; nothing here renders.

use hecs::World;
use log::info;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::components::{
    Health, Position, Projectile, ProjectileKind, Team, UnitClass, UnitStatus, Vec3,
};
use crate::config::{BattleComposition, CompositionError, SimConfig};
use crate::generation::{generate_obstacles, generate_terrain, spawn_units, Obstacle};
use crate::nav::{NavGrid, Terrain};
use crate::systems::{
    projectile_system, spawn_projectiles, unit_ai_system, BattleEvent, EventQueue,
};

/// Battle lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattlePhase {
    /// No battle running; entities cleared
    Menu,
    /// Simulation advancing every step
    Running,
    /// Frozen; steps are ignored and time does not advance
    Paused,
    /// One team has been eliminated
    Ended,
}

/// Result of a finished battle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BattleOutcome {
    pub winning_team: Team,
    pub duration_seconds: f32,
}

/// Per-frame view of one unit for the presentation layer
#[derive(Debug, Clone, Copy)]
pub struct UnitSnapshot {
    pub entity: hecs::Entity,
    pub team: Team,
    pub class: UnitClass,
    pub position: Vec3,
    pub facing: f32,
    pub health_fraction: f32,
    pub status: UnitStatus,
}

/// Per-frame view of one projectile for the presentation layer
#[derive(Debug, Clone, Copy)]
pub struct ProjectileSnapshot {
    pub position: Vec3,
    pub facing: f32,
    pub velocity: Vec3,
    pub team: Team,
    pub kind: ProjectileKind,
}

/// One battle session owning all simulation state
pub struct BattleEngine {
    /// ECS world containing units and projectiles
    pub world: World,
    config: SimConfig,
    phase: BattlePhase,
    seed: u64,
    time_scale: f32,
    /// Simulated seconds since battle start
    elapsed: f32,
    terrain: Option<Terrain>,
    obstacles: Vec<Obstacle>,
    events: EventQueue,
    outcome: Option<BattleOutcome>,
}

impl BattleEngine {
    /// Create an engine in the menu state with default configuration
    pub fn new() -> Self {
        Self::with_config(SimConfig::default())
    }

    pub fn with_config(config: SimConfig) -> Self {
        Self {
            world: World::new(),
            config,
            phase: BattlePhase::Menu,
            seed: 42,
            time_scale: 1.0,
            elapsed: 0.0,
            terrain: None,
            obstacles: Vec::new(),
            events: EventQueue::new(),
            outcome: None,
        }
    }

    /// Seed used by the next `start_battle`
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Set time scale (1.0 = real-time, 2.0 = 2x speed, 0.0 = frozen)
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Toggle Running ⇄ Paused; ignored in other phases
    pub fn set_paused(&mut self, paused: bool) {
        match (self.phase, paused) {
            (BattlePhase::Running, true) => self.phase = BattlePhase::Paused,
            (BattlePhase::Paused, false) => self.phase = BattlePhase::Running,
            _ => {}
        }
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    /// Recorded result once the phase is Ended
    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.outcome
    }

    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Start a battle from a composition, replacing any previous battle.
    ///
    /// Rejects compositions where either team fields zero units, without
    /// mutating any state. Otherwise generates terrain, obstacles, and
    /// units from the current seed (fixed draw order: terrain noise, then
    /// obstacle placement, then spawn jitter) and enters Running.
    pub fn start_battle(&mut self, comp: &BattleComposition) -> Result<(), CompositionError> {
        comp.validate()?;

        self.clear_battle_entities();
        let mut rng = Pcg32::seed_from_u64(self.seed);

        let mut terrain = generate_terrain(&self.config.terrain, self.seed);
        self.obstacles = generate_obstacles(&mut terrain, &self.config.terrain, &mut rng);
        spawn_units(&mut self.world, comp, &terrain, &self.config, &mut rng);
        self.terrain = Some(terrain);

        self.elapsed = 0.0;
        self.outcome = None;
        self.phase = BattlePhase::Running;
        info!(
            "battle started: seed {}, {} vs {} units, {} obstacles",
            self.seed,
            comp.team_a.total(),
            comp.team_b.total(),
            self.obstacles.len()
        );
        Ok(())
    }

    /// Tear down the battle and return to the menu
    pub fn reset_to_menu(&mut self) {
        self.clear_battle_entities();
        self.phase = BattlePhase::Menu;
        self.outcome = None;
        self.elapsed = 0.0;
    }

    fn clear_battle_entities(&mut self) {
        self.world.clear();
        self.terrain = None;
        self.obstacles.clear();
        self.events.clear();
    }

    /// Advance the simulation by one frame.
    ///
    /// `frame_dt` is wall-clock seconds; it is scaled by the time-scale
    /// multiplier and clamped for stability. Does nothing unless Running.
    pub fn step(&mut self, frame_dt: f32) {
        if self.phase != BattlePhase::Running {
            return;
        }
        let Some(terrain) = self.terrain.as_ref() else {
            return;
        };
        let dt = (frame_dt * self.time_scale).min(SimConfig::MAX_FRAME_DT);
        self.elapsed += dt;

        let spawns = unit_ai_system(
            &mut self.world,
            terrain,
            &self.obstacles,
            &self.config,
            dt,
            &mut self.events,
        );
        spawn_projectiles(&mut self.world, spawns, &self.config.projectile);
        projectile_system(&mut self.world, &self.config.projectile, dt, &mut self.events);

        self.check_battle_end();
    }

    /// End the battle once either team has no living units. Team A's count
    /// is checked first, so simultaneous elimination goes to team B.
    fn check_battle_end(&mut self) {
        let a_alive = self.living_count(Team::A);
        let b_alive = self.living_count(Team::B);
        if a_alive == 0 || b_alive == 0 {
            let winner = if a_alive > 0 { Team::A } else { Team::B };
            let outcome = BattleOutcome {
                winning_team: winner,
                duration_seconds: self.elapsed,
            };
            self.outcome = Some(outcome);
            self.phase = BattlePhase::Ended;
            self.events.push(BattleEvent::BattleEnded {
                winner,
                duration_seconds: self.elapsed,
            });
            info!("battle ended: team {winner:?} wins after {:.2}s", self.elapsed);
        }
    }

    /// Living units on a team
    pub fn living_count(&self, team: Team) -> usize {
        self.world
            .query::<(&Team, &UnitStatus)>()
            .iter()
            .filter(|(_, (t, status))| **t == team && status.is_alive())
            .count()
    }

    /// Snapshot every unit (living and dead) for rendering
    pub fn units(&self) -> Vec<UnitSnapshot> {
        self.world
            .query::<(&Team, &UnitClass, &Position, &Health, &UnitStatus)>()
            .iter()
            .map(|(entity, (team, class, pos, health, status))| UnitSnapshot {
                entity,
                team: *team,
                class: *class,
                position: pos.world,
                facing: pos.facing,
                health_fraction: health.fraction(),
                status: *status,
            })
            .collect()
    }

    /// Snapshot every projectile in flight for rendering
    pub fn projectiles(&self) -> Vec<ProjectileSnapshot> {
        self.world
            .query::<(&Projectile, &Position)>()
            .iter()
            .map(|(_, (proj, pos))| ProjectileSnapshot {
                position: pos.world,
                facing: pos.facing,
                velocity: proj.velocity,
                team: proj.team,
                kind: proj.kind,
            })
            .collect()
    }

    /// Interpolated terrain height at world coordinates; 0 in the menu
    pub fn terrain_height(&self, x: f32, z: f32) -> f32 {
        self.terrain.as_ref().map(|t| t.height_at(x, z)).unwrap_or(0.0)
    }

    /// Navigation grid for debug overlays, once a battle has started
    pub fn nav_grid(&self) -> Option<&NavGrid> {
        self.terrain.as_ref().map(|t| &t.grid)
    }

    /// Obstacles placed for the current battle
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Take all events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<BattleEvent> {
        self.events.drain()
    }
}

impl Default for BattleEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TeamComposition;

    fn one_each() -> BattleComposition {
        BattleComposition::new(TeamComposition::new(1, 0, 0), TeamComposition::new(1, 0, 0))
    }

    #[test]
    fn test_engine_starts_in_menu() {
        let engine = BattleEngine::new();
        assert_eq!(engine.phase(), BattlePhase::Menu);
        assert!(engine.units().is_empty());
        assert!(engine.nav_grid().is_none());
        assert_eq!(engine.terrain_height(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_empty_team_rejected_without_state_change() {
        let mut engine = BattleEngine::new();
        let bad = BattleComposition::new(TeamComposition::new(1, 1, 1), TeamComposition::default());
        let err = engine.start_battle(&bad).unwrap_err();
        assert_eq!(err, CompositionError::EmptyTeam("B"));
        assert_eq!(engine.phase(), BattlePhase::Menu);
        assert!(engine.units().is_empty());
    }

    #[test]
    fn test_start_battle_spawns_and_runs() {
        let mut engine = BattleEngine::new();
        engine.start_battle(&BattleComposition::quick_skirmish()).unwrap();
        assert_eq!(engine.phase(), BattlePhase::Running);
        assert_eq!(engine.units().len(), 20);
        assert_eq!(engine.living_count(Team::A), 10);
        assert!(engine.nav_grid().is_some());
        assert_eq!(engine.obstacles().len(), 500);
    }

    #[test]
    fn test_pause_freezes_time() {
        let mut engine = BattleEngine::new();
        engine.start_battle(&one_each()).unwrap();
        engine.step(0.016);
        let elapsed = engine.elapsed_seconds();
        assert!(elapsed > 0.0);

        engine.set_paused(true);
        assert_eq!(engine.phase(), BattlePhase::Paused);
        engine.step(0.016);
        assert_eq!(engine.elapsed_seconds(), elapsed);

        engine.set_paused(false);
        assert_eq!(engine.phase(), BattlePhase::Running);
        engine.step(0.016);
        assert!(engine.elapsed_seconds() > elapsed);
    }

    #[test]
    fn test_pause_ignored_in_menu() {
        let mut engine = BattleEngine::new();
        engine.set_paused(true);
        assert_eq!(engine.phase(), BattlePhase::Menu);
    }

    #[test]
    fn test_frame_dt_clamped() {
        let mut engine = BattleEngine::new();
        engine.start_battle(&one_each()).unwrap();
        engine.step(10.0); // a huge frame hitch
        assert!(engine.elapsed_seconds() <= SimConfig::MAX_FRAME_DT + f32::EPSILON);
    }

    #[test]
    fn test_time_scale_scales_dt() {
        let mut engine = BattleEngine::new();
        engine.start_battle(&one_each()).unwrap();
        engine.set_time_scale(2.0);
        engine.step(0.01);
        assert!((engine.elapsed_seconds() - 0.02).abs() < 1e-6);

        engine.set_time_scale(-5.0); // clamped to zero
        assert_eq!(engine.time_scale(), 0.0);
        let before = engine.elapsed_seconds();
        engine.step(0.01);
        assert_eq!(engine.elapsed_seconds(), before);
    }

    #[test]
    fn test_reset_to_menu_clears_everything() {
        let mut engine = BattleEngine::new();
        engine.start_battle(&BattleComposition::quick_skirmish()).unwrap();
        engine.step(0.016);
        engine.reset_to_menu();
        assert_eq!(engine.phase(), BattlePhase::Menu);
        assert!(engine.units().is_empty());
        assert!(engine.projectiles().is_empty());
        assert!(engine.obstacles().is_empty());
        assert_eq!(engine.elapsed_seconds(), 0.0);
        assert!(engine.outcome().is_none());
    }

    #[test]
    fn test_seed_reproduces_setup() {
        let mut a = BattleEngine::new();
        let mut b = BattleEngine::new();
        a.set_seed(1234);
        b.set_seed(1234);
        a.start_battle(&BattleComposition::quick_skirmish()).unwrap();
        b.start_battle(&BattleComposition::quick_skirmish()).unwrap();

        let units_a = a.units();
        let units_b = b.units();
        assert_eq!(units_a.len(), units_b.len());
        for (ua, ub) in units_a.iter().zip(&units_b) {
            assert_eq!(ua.position, ub.position);
            assert_eq!(ua.team, ub.team);
            assert_eq!(ua.class, ub.class);
        }
        for (oa, ob) in a.obstacles().iter().zip(b.obstacles()) {
            assert_eq!(oa.position, ob.position);
            assert_eq!(oa.kind, ob.kind);
        }
    }
}
