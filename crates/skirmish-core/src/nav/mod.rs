//! Navigation - discretized terrain, walkability, and pathfinding.

mod grid;
mod pathfinding;

pub use grid::*;
pub use pathfinding::*;

/// Terrain built once per battle: the navigation grid plus the parallel
/// height field used for smooth height sampling.
#[derive(Debug, Clone)]
pub struct Terrain {
    pub grid: NavGrid,
    pub heights: HeightField,
}

impl Terrain {
    /// Interpolated terrain height at arbitrary world coordinates
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        self.heights.sample(x, z)
    }
}
