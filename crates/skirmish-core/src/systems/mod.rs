//! Systems - logic that operates on components

mod ai;
mod combat;
mod events;
mod movement;
mod projectiles;
mod targeting;

pub use ai::*;
pub use combat::*;
pub use events::*;
pub use movement::*;
pub use projectiles::*;
pub use targeting::*;
