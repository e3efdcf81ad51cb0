//! Simulation configuration - terrain tunables, the class attribute table,
//! projectile parameters, and battle compositions.
//!
//! Attribute data stays table-driven: per-class numbers live here, and the
//! combat systems only ever read them through `Attributes` copied at spawn.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::components::{Attributes, UnitClass};

/// Vertical offset of a unit's center above the terrain surface
pub const UNIT_HEIGHT_OFFSET: f32 = 1.1;

/// Terrain and obstacle generation parameters
#[derive(Debug, Clone)]
pub struct TerrainConfig {
    /// Side length of the square terrain, in world units
    pub terrain_size: f32,
    /// Side length of a navigation grid cell
    pub cell_size: f32,
    /// Maximum traversable slope (|Δheight| per unit of horizontal distance)
    pub max_slope: f32,
    /// Obstacles per square world unit
    pub obstacle_density: f32,
    /// Horizontal frequency of the elevation noise
    pub noise_scale: f32,
    /// Vertical scale of the elevation noise; 0 forces flat terrain
    pub noise_amplitude: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            terrain_size: 100.0,
            cell_size: 2.0,
            max_slope: 1.0,
            obstacle_density: 0.05,
            noise_scale: 0.08,
            noise_amplitude: 4.0,
        }
    }
}

impl TerrainConfig {
    /// Flat, obstacle-free variant used by scenario and regression tests
    pub fn flat() -> Self {
        Self {
            noise_amplitude: 0.0,
            obstacle_density: 0.0,
            ..Self::default()
        }
    }
}

/// Projectile flight parameters
#[derive(Debug, Clone)]
pub struct ProjectileConfig {
    /// Flight speed in world units per second
    pub speed: f32,
    /// Distance to the target at which the projectile hits
    pub impact_radius: f32,
    /// Seconds of flight before the projectile expires without effect
    pub lifetime: f32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            speed: 16.0,
            impact_radius: 1.1,
            lifetime: 2.5,
        }
    }
}

/// Per-class base attributes
#[derive(Debug, Clone)]
pub struct ClassAttributes {
    pub warrior: Attributes,
    pub archer: Attributes,
    pub mage: Attributes,
}

impl Default for ClassAttributes {
    fn default() -> Self {
        Self {
            warrior: Attributes {
                max_health: 100.0,
                attack: 20.0,
                speed: 3.0,
                defense: 10.0,
                range: 2.2,
                attack_interval: 0.7,
            },
            archer: Attributes {
                max_health: 80.0,
                attack: 14.0,
                speed: 3.4,
                defense: 5.0,
                range: 9.0,
                attack_interval: 1.2,
            },
            mage: Attributes {
                max_health: 60.0,
                attack: 26.0,
                speed: 2.8,
                defense: 0.0,
                range: 7.0,
                attack_interval: 1.6,
            },
        }
    }
}

impl ClassAttributes {
    pub fn get(&self, class: UnitClass) -> &Attributes {
        match class {
            UnitClass::Warrior => &self.warrior,
            UnitClass::Archer => &self.archer,
            UnitClass::Mage => &self.mage,
        }
    }
}

/// Top-level simulation configuration
#[derive(Debug, Clone, Default)]
pub struct SimConfig {
    pub terrain: TerrainConfig,
    pub attributes: ClassAttributes,
    pub projectile: ProjectileConfig,
}

impl SimConfig {
    /// Upper bound on a single frame's delta time, for stability under
    /// slow frames and frame drops
    pub const MAX_FRAME_DT: f32 = 0.05;
}

/// Unit counts for one team
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TeamComposition {
    pub warriors: u32,
    pub archers: u32,
    pub mages: u32,
}

impl TeamComposition {
    pub fn new(warriors: u32, archers: u32, mages: u32) -> Self {
        Self {
            warriors,
            archers,
            mages,
        }
    }

    pub fn total(&self) -> u32 {
        self.warriors + self.archers + self.mages
    }

    pub fn count(&self, class: UnitClass) -> u32 {
        match class {
            UnitClass::Warrior => self.warriors,
            UnitClass::Archer => self.archers,
            UnitClass::Mage => self.mages,
        }
    }
}

/// Unit counts for both teams of a battle
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BattleComposition {
    pub team_a: TeamComposition,
    pub team_b: TeamComposition,
}

impl BattleComposition {
    pub fn new(team_a: TeamComposition, team_b: TeamComposition) -> Self {
        Self { team_a, team_b }
    }

    /// The 5/3/2 vs 5/3/2 preset offered as a one-click start
    pub fn quick_skirmish() -> Self {
        Self {
            team_a: TeamComposition::new(5, 3, 2),
            team_b: TeamComposition::new(5, 3, 2),
        }
    }

    /// Each team needs at least one unit to field a battle
    pub fn validate(&self) -> Result<(), CompositionError> {
        if self.team_a.total() == 0 {
            return Err(CompositionError::EmptyTeam("A"));
        }
        if self.team_b.total() == 0 {
            return Err(CompositionError::EmptyTeam("B"));
        }
        Ok(())
    }
}

/// Rejection reason for an invalid battle composition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositionError {
    /// The named team fields zero units
    EmptyTeam(&'static str),
}

impl std::fmt::Display for CompositionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompositionError::EmptyTeam(team) => {
                write!(f, "each team needs at least one unit (team {team} is empty)")
            }
        }
    }
}

impl std::error::Error for CompositionError {}

/// Parse a unit count from user input. Malformed input is coerced to zero
/// with a logged warning rather than rejected.
pub fn parse_unit_count(input: &str) -> u32 {
    match input.trim().parse::<u32>() {
        Ok(count) => count,
        Err(_) => {
            warn!("invalid unit count {input:?}, using 0");
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composition_validation() {
        let comp = BattleComposition::quick_skirmish();
        assert!(comp.validate().is_ok());

        let empty_b = BattleComposition::new(TeamComposition::new(1, 0, 0), TeamComposition::default());
        assert_eq!(empty_b.validate(), Err(CompositionError::EmptyTeam("B")));
        assert!(empty_b
            .validate()
            .unwrap_err()
            .to_string()
            .contains("at least one unit"));
    }

    #[test]
    fn test_composition_totals() {
        let comp = TeamComposition::new(5, 3, 2);
        assert_eq!(comp.total(), 10);
        assert_eq!(comp.count(UnitClass::Archer), 3);
    }

    #[test]
    fn test_class_attribute_table() {
        let attrs = ClassAttributes::default();
        assert!(attrs.get(UnitClass::Archer).range > attrs.get(UnitClass::Warrior).range);
        assert_eq!(attrs.get(UnitClass::Mage).defense, 0.0);
    }

    #[test]
    fn test_parse_unit_count_coerces_garbage() {
        assert_eq!(parse_unit_count("7"), 7);
        assert_eq!(parse_unit_count(" 12 "), 12);
        assert_eq!(parse_unit_count("abc"), 0);
        assert_eq!(parse_unit_count("-3"), 0);
        assert_eq!(parse_unit_count(""), 0);
    }
}
