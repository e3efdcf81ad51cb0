//! Projectile component - arrows and magic bolts in flight.

use hecs::Entity;
use serde::{Deserialize, Serialize};

use super::common::Vec3;
use super::units::Team;

/// Visual kind of a projectile, for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Fired by archers
    Arrow,
    /// Fired by mages
    Bolt,
}

/// A projectile in flight. Direction is fixed at launch (no homing);
/// only the impact test tracks the target's live position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub team: Team,
    pub kind: ProjectileKind,
    /// Raw damage applied on impact (before the target's defense)
    pub damage: f32,
    /// World units per second, set at launch
    pub velocity: Vec3,
    /// Seconds of flight left before the projectile expires
    pub ttl: f32,
    /// Intended victim; the projectile fizzles if it dies first
    #[serde(skip)]
    pub target: Option<Entity>,
}
