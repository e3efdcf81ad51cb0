//! Navigation grid - per-cell height and walkability over the terrain.

use serde::{Deserialize, Serialize};

use crate::components::Vec3;
use crate::config::UNIT_HEIGHT_OFFSET;

/// A single navigation cell
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Cell {
    pub height: f32,
    pub walkable: bool,
}

/// Grid coordinates of a cell, clamped to bounds on conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPos {
    pub x: usize,
    pub z: usize,
}

/// Discretized terrain used for walkability queries and pathfinding.
///
/// World↔grid conversion is an affine transform centered on the terrain
/// origin; out-of-range world queries clamp to the nearest edge cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavGrid {
    cell_size: f32,
    width: usize,
    height: usize,
    half_extent: f32,
    cells: Vec<Cell>,
}

impl NavGrid {
    pub fn new(terrain_size: f32, cell_size: f32) -> Self {
        let width = (terrain_size / cell_size).floor() as usize;
        Self {
            cell_size,
            width,
            height: width,
            half_extent: terrain_size / 2.0,
            cells: vec![
                Cell {
                    height: 0.0,
                    walkable: true,
                };
                width * width
            ],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    fn index(&self, gx: usize, gz: usize) -> usize {
        gz * self.width + gx
    }

    /// Convert world coordinates to the containing grid cell, clamped to bounds
    pub fn world_to_grid(&self, x: f32, z: f32) -> GridPos {
        let gx = ((x + self.half_extent) / self.cell_size).floor();
        let gz = ((z + self.half_extent) / self.cell_size).floor();
        GridPos {
            x: (gx.max(0.0) as usize).min(self.width - 1),
            z: (gz.max(0.0) as usize).min(self.height - 1),
        }
    }

    /// Center of a grid cell in world space, elevated to cell height plus
    /// the unit height offset
    pub fn grid_to_world(&self, gx: usize, gz: usize) -> Vec3 {
        let wx = gx as f32 * self.cell_size - self.half_extent + self.cell_size / 2.0;
        let wz = gz as f32 * self.cell_size - self.half_extent + self.cell_size / 2.0;
        let h = self.cell(gx, gz).map(|c| c.height).unwrap_or(0.0);
        Vec3::new(wx, h + UNIT_HEIGHT_OFFSET, wz)
    }

    pub fn cell(&self, gx: usize, gz: usize) -> Option<&Cell> {
        if gx < self.width && gz < self.height {
            Some(&self.cells[self.index(gx, gz)])
        } else {
            None
        }
    }

    /// Walkability check; out-of-range cells are not walkable
    pub fn is_walkable(&self, gx: usize, gz: usize) -> bool {
        self.cell(gx, gz).map(|c| c.walkable).unwrap_or(false)
    }

    pub fn cell_height(&self, gx: usize, gz: usize) -> f32 {
        self.cell(gx, gz).map(|c| c.height).unwrap_or(0.0)
    }

    pub fn set_height(&mut self, gx: usize, gz: usize, height: f32) {
        if gx < self.width && gz < self.height {
            let idx = self.index(gx, gz);
            self.cells[idx].height = height;
        }
    }

    pub fn set_walkable(&mut self, gx: usize, gz: usize, walkable: bool) {
        if gx < self.width && gz < self.height {
            let idx = self.index(gx, gz);
            self.cells[idx].walkable = walkable;
        }
    }

    /// Mark every cell within `radius` (rounded up to whole cells) of a
    /// world position as unwalkable - obstacle footprints
    pub fn block_footprint(&mut self, x: f32, z: f32, radius: f32) {
        let center = self.world_to_grid(x, z);
        let rad = (radius / self.cell_size).ceil() as i64;
        for dz in -rad..=rad {
            for dx in -rad..=rad {
                let nx = center.x as i64 + dx;
                let nz = center.z as i64 + dz;
                if nx >= 0 && nz >= 0 && (nx as usize) < self.width && (nz as usize) < self.height {
                    self.set_walkable(nx as usize, nz as usize, false);
                }
            }
        }
    }
}

/// Parallel float grid (same indexing as the navigation grid) for bilinear
/// height sampling at arbitrary world coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeightField {
    cell_size: f32,
    width: usize,
    height: usize,
    half_extent: f32,
    values: Vec<f32>,
}

impl HeightField {
    pub fn new(terrain_size: f32, cell_size: f32) -> Self {
        let width = (terrain_size / cell_size).floor() as usize;
        Self {
            cell_size,
            width,
            height: width,
            half_extent: terrain_size / 2.0,
            values: vec![0.0; width * width],
        }
    }

    pub fn set(&mut self, gx: usize, gz: usize, value: f32) {
        if gx < self.width && gz < self.height {
            self.values[gz * self.width + gx] = value;
        }
    }

    pub fn get(&self, gx: usize, gz: usize) -> f32 {
        if gx < self.width && gz < self.height {
            self.values[gz * self.width + gx]
        } else {
            0.0
        }
    }

    /// Bilinearly interpolated height at world coordinates, clamped to the
    /// grid at the edges
    pub fn sample(&self, x: f32, z: f32) -> f32 {
        let gx = (x + self.half_extent) / self.cell_size;
        let gz = (z + self.half_extent) / self.cell_size;
        let x0 = (gx.floor().max(0.0) as usize).min(self.width - 1);
        let z0 = (gz.floor().max(0.0) as usize).min(self.height - 1);
        let x1 = (x0 + 1).min(self.width - 1);
        let z1 = (z0 + 1).min(self.height - 1);
        let tx = gx - x0 as f32;
        let tz = gz - z0 as f32;
        let h00 = self.get(x0, z0);
        let h10 = self.get(x1, z0);
        let h01 = self.get(x0, z1);
        let h11 = self.get(x1, z1);
        let h0 = lerp(h00, h10, tx);
        let h1 = lerp(h01, h11, tx);
        lerp(h0, h1, tz)
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_dimensions() {
        let grid = NavGrid::new(100.0, 2.0);
        assert_eq!(grid.width(), 50);
        assert_eq!(grid.height(), 50);
    }

    #[test]
    fn test_world_to_grid_center_and_edges() {
        let grid = NavGrid::new(100.0, 2.0);
        assert_eq!(grid.world_to_grid(0.0, 0.0), GridPos { x: 25, z: 25 });
        // Out-of-range queries clamp instead of panicking
        assert_eq!(grid.world_to_grid(-1000.0, 0.0).x, 0);
        assert_eq!(grid.world_to_grid(1000.0, 1000.0), GridPos { x: 49, z: 49 });
    }

    #[test]
    fn test_grid_world_roundtrip() {
        let grid = NavGrid::new(100.0, 2.0);
        let world = grid.grid_to_world(10, 30);
        let back = grid.world_to_grid(world.x, world.z);
        assert_eq!(back, GridPos { x: 10, z: 30 });
    }

    #[test]
    fn test_block_footprint() {
        let mut grid = NavGrid::new(100.0, 2.0);
        grid.block_footprint(0.0, 0.0, 1.2);
        // radius 1.2 rounds up to one whole cell in every direction
        for dz in -1i64..=1 {
            for dx in -1i64..=1 {
                let gx = (25 + dx) as usize;
                let gz = (25 + dz) as usize;
                assert!(!grid.is_walkable(gx, gz), "cell ({gx},{gz}) should be blocked");
            }
        }
        assert!(grid.is_walkable(25, 28));
    }

    #[test]
    fn test_footprint_at_edge_does_not_panic() {
        let mut grid = NavGrid::new(100.0, 2.0);
        grid.block_footprint(-49.9, -49.9, 2.0);
        assert!(!grid.is_walkable(0, 0));
    }

    #[test]
    fn test_height_field_bilinear() {
        let mut field = HeightField::new(100.0, 2.0);
        // Lattice index 25 sits at world origin: (0 + 50) / 2 = 25
        field.set(25, 25, 4.0);
        let at = field.sample(0.0, 0.0);
        assert!((at - 4.0).abs() < 0.001);
        // Halfway toward a zero neighbor interpolates
        let mid = field.sample(1.0, 0.0);
        assert!((mid - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_height_sample_out_of_range_is_clamped() {
        let field = HeightField::new(100.0, 2.0);
        assert_eq!(field.sample(-10_000.0, 42.0), 0.0);
    }
}
