//! Skirmish Core - Battle Simulation Engine
//!
//! A deterministic real-time battle simulator: two teams of autonomous
//! units (warriors, archers, mages) spawn on procedurally generated
//! terrain, pathfind around obstacles, seek enemies, and fight with melee
//! or projectile attacks until one team is eliminated.
//!
//! # Architecture
//!
//! The simulation uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: Units and projectiles
//! - **Components**: Pure data attached to entities (Position, Health, CombatState, etc.)
//! - **Systems**: Logic that queries and updates components
//!
//! Rendering, UI and camera control are external collaborators: they consume
//! the per-frame query surface (`units()`, `projectiles()`, `terrain_height()`)
//! and drive the engine through `step(dt)`.
//!
//! # Example
//!
//! ```rust,no_run
//! use skirmish_core::prelude::*;
//!
//! let mut engine = BattleEngine::new();
//! engine.set_seed(42);
//! engine.start_battle(&BattleComposition::quick_skirmish()).unwrap();
//!
//! // Run simulation
//! while engine.phase() == BattlePhase::Running {
//!     engine.step(1.0 / 60.0); // 60 FPS
//! }
//! ```

pub mod components;
pub mod config;
pub mod engine;
pub mod generation;
pub mod nav;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::config::{BattleComposition, SimConfig, TeamComposition};
    pub use crate::engine::{BattleEngine, BattleOutcome, BattlePhase};
}
