//! Grid A* pathfinding, elevation-weighted.
//!
//! Steps cost 1 orthogonally and √2 diagonally, plus the absolute height
//! difference between the two cells, so routes prefer level ground over
//! climbs. The heuristic is straight-line distance in grid units.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::components::Vec3;

use super::grid::{GridPos, NavGrid};

const SQRT_2: f32 = std::f32::consts::SQRT_2;

/// Open-set entry. Ordered so the binary heap pops the lowest `f` first,
/// with the cell index breaking ties deterministically.
#[derive(Debug, Clone, Copy)]
struct OpenNode {
    f: f32,
    index: usize,
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenNode {}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.index.cmp(&self.index))
    }
}

fn heuristic(a: GridPos, b: GridPos) -> f32 {
    let dx = a.x as f32 - b.x as f32;
    let dz = a.z as f32 - b.z as f32;
    (dx * dx + dz * dz).sqrt()
}

/// Find a path between two world positions over the navigation grid.
///
/// Returns waypoints in start→goal order (excluding the start cell), each
/// at its cell center elevated to terrain height plus the unit offset.
/// Returns `None` when the destination cell is unwalkable or the open set
/// exhausts without reaching it. Identical inputs yield identical paths.
pub fn find_path(grid: &NavGrid, start: Vec3, end: Vec3) -> Option<Vec<Vec3>> {
    let s = grid.world_to_grid(start.x, start.z);
    let e = grid.world_to_grid(end.x, end.z);
    if !grid.is_walkable(e.x, e.z) {
        return None;
    }

    let width = grid.width();
    let height = grid.height();
    let cell_count = width * height;
    let start_idx = s.z * width + s.x;
    let goal_idx = e.z * width + e.x;

    let mut g_score = vec![f32::INFINITY; cell_count];
    let mut parent: Vec<Option<usize>> = vec![None; cell_count];
    let mut closed = vec![false; cell_count];
    let mut open = BinaryHeap::new();

    g_score[start_idx] = 0.0;
    open.push(OpenNode {
        f: heuristic(s, e),
        index: start_idx,
    });

    while let Some(OpenNode { index: current, .. }) = open.pop() {
        if closed[current] {
            continue; // stale heap entry
        }
        if current == goal_idx {
            return Some(reconstruct(grid, &parent, current));
        }
        closed[current] = true;

        let cx = current % width;
        let cz = current / width;
        let current_height = grid.cell_height(cx, cz);

        for dz in -1i64..=1 {
            for dx in -1i64..=1 {
                if dx == 0 && dz == 0 {
                    continue;
                }
                let nx = cx as i64 + dx;
                let nz = cz as i64 + dz;
                if nx < 0 || nz < 0 || nx as usize >= width || nz as usize >= height {
                    continue;
                }
                let (nx, nz) = (nx as usize, nz as usize);
                if !grid.is_walkable(nx, nz) {
                    continue;
                }
                let neighbor = nz * width + nx;
                if closed[neighbor] {
                    continue;
                }
                let step = if dx == 0 || dz == 0 { 1.0 } else { SQRT_2 };
                let height_cost = (grid.cell_height(nx, nz) - current_height).abs();
                let tentative = g_score[current] + step + height_cost;
                if tentative < g_score[neighbor] {
                    g_score[neighbor] = tentative;
                    parent[neighbor] = Some(current);
                    open.push(OpenNode {
                        f: tentative + heuristic(GridPos { x: nx, z: nz }, e),
                        index: neighbor,
                    });
                }
            }
        }
    }

    None
}

/// Walk parent links goal→start, emitting waypoints in start→goal order.
/// The start cell carries no parent and is excluded.
fn reconstruct(grid: &NavGrid, parent: &[Option<usize>], goal: usize) -> Vec<Vec3> {
    let width = grid.width();
    let mut path = Vec::new();
    let mut node = goal;
    while let Some(prev) = parent[node] {
        path.push(grid.grid_to_world(node % width, node / width));
        node = prev;
    }
    path.reverse();
    path
}
