//! Component definitions for the ECS simulation.
//!
//! Components are pure data structs attached to entities.
//! They have no behavior - that lives in systems.

mod common;
mod projectile;
mod units;

pub use common::*;
pub use projectile::*;
pub use units::*;
