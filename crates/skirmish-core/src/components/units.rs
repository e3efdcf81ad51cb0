//! Unit-related components: Team, UnitClass, Attributes, Health, combat and path state.

use hecs::Entity;
use serde::{Deserialize, Serialize};

use super::common::Vec3;

/// Which army a unit (or projectile) belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    A,
    B,
}

impl Team {
    pub fn opponent(self) -> Self {
        match self {
            Team::A => Team::B,
            Team::B => Team::A,
        }
    }
}

/// Unit archetype - determines base attributes and attack behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitClass {
    Warrior,
    Archer,
    Mage,
}

impl UnitClass {
    /// All classes in spawn order
    pub const ALL: [UnitClass; 3] = [UnitClass::Warrior, UnitClass::Archer, UnitClass::Mage];
}

/// Static combat attributes, copied from the class table at spawn
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Attributes {
    pub max_health: f32,
    pub attack: f32,
    /// Movement speed in units per second
    pub speed: f32,
    pub defense: f32,
    /// Attack range in world units
    pub range: f32,
    /// Seconds between attacks
    pub attack_interval: f32,
}

/// Current health. Never exceeds `max`; never increases after spawn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    /// Remaining fraction in [0, 1], for health bars
    pub fn fraction(&self) -> f32 {
        (self.current / self.max).clamp(0.0, 1.0)
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }
}

/// Life state. Dead is terminal - a unit never comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitStatus {
    Alive,
    Dead,
}

impl UnitStatus {
    pub fn is_alive(self) -> bool {
        self == UnitStatus::Alive
    }
}

/// Per-unit combat state: current target and attack cooldown
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombatState {
    /// Current target. Validity is re-checked every frame against the
    /// target's UnitStatus (Entity handles stay valid after death).
    #[serde(skip)]
    pub target: Option<Entity>,
    /// Seconds until the next attack may fire
    pub cooldown: f32,
}

/// Per-unit pathfinding state.
///
/// `path` is None when no route exists (or none has been computed yet) -
/// the unit then falls back to direct-line movement toward its target.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathState {
    /// World-space waypoints in travel order
    pub path: Option<Vec<Vec3>>,
    /// Next waypoint to head for
    pub path_index: usize,
    /// Target the current path was computed for
    #[serde(skip)]
    pub computed_for: Option<Entity>,
    /// Target position the current path was computed against; the path is
    /// invalidated once the target drifts more than one cell from here
    pub goal: Option<Vec3>,
}

impl PathState {
    pub fn clear(&mut self) {
        self.path = None;
        self.path_index = 0;
        self.goal = None;
    }

    pub fn set(&mut self, path: Option<Vec<Vec3>>, target: Entity, goal: Vec3) {
        self.path = path;
        self.path_index = 0;
        self.computed_for = Some(target);
        self.goal = Some(goal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_opponent() {
        assert_eq!(Team::A.opponent(), Team::B);
        assert_eq!(Team::B.opponent(), Team::A);
    }

    #[test]
    fn test_health_fraction() {
        let mut health = Health::new(80.0);
        assert_eq!(health.fraction(), 1.0);
        health.current = 20.0;
        assert!((health.fraction() - 0.25).abs() < 0.001);
        health.current = -5.0;
        assert_eq!(health.fraction(), 0.0);
        assert!(health.is_depleted());
    }

    #[test]
    fn test_path_state_clear() {
        let mut state = PathState::default();
        state.set(Some(vec![Vec3::ZERO]), hecs::World::new().spawn(()), Vec3::ZERO);
        state.clear();
        assert!(state.path.is_none());
        assert_eq!(state.path_index, 0);
        assert!(state.goal.is_none());
    }
}
