//! Generation - procedural creation of terrain, obstacles, and units.
//!
//! All randomness flows through a caller-provided seeded RNG (and the
//! seeded noise hash), in a fixed draw order: terrain noise, then obstacle
//! placement, then unit spawn jitter. A fixed seed reproduces the battle
//! setup bit-for-bit.

mod noise;
mod terrain;
mod units;

pub use noise::*;
pub use terrain::*;
pub use units::*;
