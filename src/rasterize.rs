//! Danger-zone rasterization.
//!
//! Obstacles are inflated by the agent's collision radius, painted onto a
//! full-resolution map (one cell per workspace pixel) and OR-reduced into
//! K x K blocks for the pathfinder. The coarse grid never under-approximates
//! the danger map.

use log::trace;

use crate::geometry::Obstacle;
use crate::grid::Grid;

/// Paint every obstacle's danger zone onto a `width x height` map.
///
/// Pixel (x, y) is occupied iff it lies inside some padded bounding box
/// (closed intervals). Each zone is filled directly as a clamped rectangle,
/// so the cost is O(obstacles + painted area) rather than a per-pixel scan.
pub fn danger_map(obstacles: &[Obstacle], padding: f32, width: i32, height: i32) -> Grid {
    let mut map = Grid::new(height, width);

    for obstacle in obstacles {
        let zone = obstacle.danger_zone(padding);
        let x0 = zone.min.x.ceil() as i32;
        let y0 = zone.min.y.ceil() as i32;
        let x1 = zone.max.x.floor() as i32;
        let y1 = zone.max.y.floor() as i32;
        map.fill_rect(x0, y0, x1, y1);
    }

    trace!(
        "danger map {}x{}: {} obstacles, {} pixels occupied",
        width,
        height,
        obstacles.len(),
        map.count_blocked()
    );
    map
}

/// OR-reduce a fine grid into blocks of `factor x factor` cells.
///
/// The result has ceil(cols / factor) x ceil(rows / factor) cells; partial
/// blocks on the right and bottom edges reduce over the pixels that exist.
pub fn downsample(fine: &Grid, factor: i32) -> Grid {
    let factor = factor.max(1);
    let cols = (fine.cols + factor - 1) / factor;
    let rows = (fine.rows + factor - 1) / factor;
    let mut coarse = Grid::new(rows, cols);

    for y in 0..fine.rows {
        let row = (y * fine.cols) as usize;
        let coarse_row = ((y / factor) * cols) as usize;
        for x in 0..fine.cols {
            if fine.cells[row + x as usize] {
                coarse.cells[coarse_row + (x / factor) as usize] = true;
            }
        }
    }

    coarse
}

/// Full rasterization pipeline: danger map, then downsample
pub fn coarse_grid(obstacles: &[Obstacle], padding: f32, width: i32, height: i32, factor: i32) -> Grid {
    downsample(&danger_map(obstacles, padding, width, height), factor)
}
