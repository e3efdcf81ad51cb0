//! Terrain and obstacle generation.
//!
//! Heights come from the seeded noise field; cells whose slope against any
//! 4-neighbor exceeds the configured maximum become unwalkable, and obstacle
//! footprints are stamped on top afterwards.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::components::Vec3;
use crate::config::TerrainConfig;
use crate::nav::{HeightField, NavGrid, Terrain};

use super::noise::ValueNoise;

/// Obstacle variety; affects radius and presentation only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Tree,
    Rock,
}

/// A placed obstacle. Blocks navigation cells within its radius and
/// occludes ranged attacks passing near its center.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Obstacle {
    pub position: Vec3,
    pub radius: f32,
    pub kind: ObstacleKind,
}

/// Build the terrain for a battle: sample cell heights from the noise
/// field, then mark cells that sit against a too-steep neighbor unwalkable.
pub fn generate_terrain(config: &TerrainConfig, seed: u64) -> Terrain {
    let noise = ValueNoise::new(seed);
    let mut grid = NavGrid::new(config.terrain_size, config.cell_size);
    let mut heights = HeightField::new(config.terrain_size, config.cell_size);

    let width = grid.width();
    let height = grid.height();
    for gz in 0..height {
        for gx in 0..width {
            let wx = (gx as f32 / width as f32 - 0.5) * config.terrain_size;
            let wz = (gz as f32 / height as f32 - 0.5) * config.terrain_size;
            let h = noise.fbm(wx * config.noise_scale, wz * config.noise_scale)
                * config.noise_amplitude;
            grid.set_height(gx, gz, h);
            heights.set(gx, gz, h);
        }
    }

    for gz in 0..height {
        for gx in 0..width {
            let h = grid.cell_height(gx, gz);
            let neighbors = [
                (gx as i64 + 1, gz as i64),
                (gx as i64 - 1, gz as i64),
                (gx as i64, gz as i64 + 1),
                (gx as i64, gz as i64 - 1),
            ];
            for (nx, nz) in neighbors {
                if nx < 0 || nz < 0 || nx as usize >= width || nz as usize >= height {
                    continue;
                }
                let h2 = grid.cell_height(nx as usize, nz as usize);
                let slope = (h2 - h).abs() / config.cell_size;
                if slope > config.max_slope {
                    grid.set_walkable(gx, gz, false);
                    break;
                }
            }
        }
    }

    Terrain { grid, heights }
}

/// Scatter trees and rocks over the terrain, stamping each footprint into
/// the navigation grid. Draw order per obstacle is fixed (kind, x, z) so a
/// given RNG state reproduces the same layout.
pub fn generate_obstacles(
    terrain: &mut Terrain,
    config: &TerrainConfig,
    rng: &mut impl Rng,
) -> Vec<Obstacle> {
    let count = (config.terrain_size * config.terrain_size * config.obstacle_density) as usize;
    let mut obstacles = Vec::with_capacity(count);

    for _ in 0..count {
        let is_tree = rng.gen::<f32>() > 0.5;
        let (kind, radius, center_height) = if is_tree {
            (ObstacleKind::Tree, 1.0, 2.4)
        } else {
            (ObstacleKind::Rock, 1.2, 1.2)
        };
        let x = (rng.gen::<f32>() - 0.5) * config.terrain_size;
        let z = (rng.gen::<f32>() - 0.5) * config.terrain_size;

        terrain.grid.block_footprint(x, z, radius);
        obstacles.push(Obstacle {
            position: Vec3::new(x, center_height, z),
            radius,
            kind,
        });
    }

    obstacles
}
