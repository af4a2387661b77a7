//! Plan requests: rasterize, search, map.
//!
//! `Planner::plan` blocks the caller for the whole pipeline. The danger map
//! costs O(width x height) to allocate and downsample regardless of obstacle
//! count (450k cells at 900 x 500), and the search is bounded by the coarse
//! cell count. `Planner::spawn` runs the same pipeline on a worker thread and
//! hands back a cancellable `PlanTask`.

use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::error::{NavError, Result};
use crate::geometry::{Obstacle, Point};
use crate::grid::{Grid, Position};
use crate::pathfinding::{AStar, Heuristic, SearchStats};
use crate::rasterize;
use crate::waypoints::{cells_to_waypoints, point_to_cell};

/// A completed plan
#[derive(Debug, Clone)]
pub struct Plan {
    /// Coarse cells from start to goal, inclusive
    pub cells: Vec<Position>,
    /// Continuous cell centres, one per cell
    pub waypoints: Vec<Point>,
    /// The coarse grid the search ran on
    pub grid: Grid,
    pub stats: SearchStats,
    pub elapsed: Duration,
}

/// Fixed planning parameters for one workspace
#[derive(Debug, Clone)]
pub struct Planner {
    width: i32,
    height: i32,
    factor: i32,
    padding: f32,
    heuristic: Heuristic,
}

impl Planner {
    pub fn new(width: i32, height: i32, factor: i32, padding: f32, heuristic: Heuristic) -> Self {
        Planner {
            width,
            height,
            factor: factor.max(1),
            padding,
            heuristic,
        }
    }

    /// Padding is the agent footprint's half-diagonal
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.workspace.width,
            config.workspace.height,
            config.planner.downsample_factor,
            config.agent.half_diagonal(),
            config.planner.heuristic,
        )
    }

    pub fn padding(&self) -> f32 {
        self.padding
    }

    pub fn factor(&self) -> i32 {
        self.factor
    }

    pub fn workspace_size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    /// Rasterize a snapshot of obstacles into the coarse grid
    pub fn coarse_grid(&self, obstacles: &[Obstacle]) -> Grid {
        rasterize::coarse_grid(obstacles, self.padding, self.width, self.height, self.factor)
    }

    /// Coarse cell under a continuous point; points outside the workspace are rejected
    pub fn cell_for(&self, point: Point) -> Result<Position> {
        let inside = point.x >= 0.0
            && point.y >= 0.0
            && point.x < self.width as f32
            && point.y < self.height as f32;
        if !inside {
            return Err(NavError::OutOfBounds {
                x: point.x,
                y: point.y,
            });
        }
        Ok(point_to_cell(point, self.factor))
    }

    /// Plan from the agent's position to `target` over `obstacles`
    pub fn plan(&self, obstacles: &[Obstacle], from: Point, target: Point) -> Result<Plan> {
        self.run(obstacles, from, target, None)
    }

    /// `plan` that stops with `NavError::Cancelled` once `cancel` is set
    pub fn plan_with_cancel(
        &self,
        obstacles: &[Obstacle],
        from: Point,
        target: Point,
        cancel: &AtomicBool,
    ) -> Result<Plan> {
        self.run(obstacles, from, target, Some(cancel))
    }

    /// Run the pipeline on a worker thread over an owned obstacle snapshot
    pub fn spawn(&self, obstacles: Vec<Obstacle>, from: Point, target: Point) -> PlanTask {
        let (sender, receiver) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));

        let planner = self.clone();
        let worker_cancel = Arc::clone(&cancel);
        let worker_sender = sender.clone();
        let spawned = thread::Builder::new()
            .name("planner".into())
            .spawn(move || {
                let result = planner.plan_with_cancel(&obstacles, from, target, &worker_cancel);
                // The task may have been dropped; nobody is left to tell
                let _ = worker_sender.send(result);
            });

        if let Err(e) = spawned {
            let _ = sender.send(Err(NavError::Io(e)));
        }

        PlanTask { receiver, cancel }
    }

    fn run(
        &self,
        obstacles: &[Obstacle],
        from: Point,
        target: Point,
        cancel: Option<&AtomicBool>,
    ) -> Result<Plan> {
        let started = Instant::now();
        let start = self.cell_for(from)?;
        let goal = self.cell_for(target)?;

        let grid = self.coarse_grid(obstacles);
        debug!(
            "coarse grid {}x{} ready in {:.2?}, {} cells occupied",
            grid.cols,
            grid.rows,
            started.elapsed(),
            grid.count_blocked()
        );

        let mut astar = AStar::new(&grid, self.heuristic);
        if let Some(flag) = cancel {
            astar = astar.with_cancel_flag(flag);
        }
        let (cells, stats) = astar.search(start, goal)?;

        if cells.is_empty() {
            return Err(NavError::NoPath { start, goal });
        }

        let waypoints = cells_to_waypoints(&cells, self.factor);
        let elapsed = started.elapsed();
        info!(
            "planned {} waypoints from ({},{}) to ({},{}) in {:.2?} ({} nodes expanded)",
            waypoints.len(),
            start.x,
            start.y,
            goal.x,
            goal.y,
            elapsed,
            stats.nodes_expanded
        );

        Ok(Plan {
            cells,
            waypoints,
            grid,
            stats,
            elapsed,
        })
    }
}

/// Handle to a plan running on a worker thread.
///
/// The result arrives exactly once. Dropping the task does not stop the
/// worker; call `cancel` first.
pub struct PlanTask {
    receiver: Receiver<Result<Plan>>,
    cancel: Arc<AtomicBool>,
}

impl PlanTask {
    /// Ask the worker to stop at its next search step
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// Non-blocking poll; `None` while the worker is still running
    pub fn try_result(&self) -> Option<Result<Plan>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(NavError::Cancelled)),
        }
    }

    /// Block until the worker delivers its result
    pub fn wait(self) -> Result<Plan> {
        self.receiver.recv().unwrap_or(Err(NavError::Cancelled))
    }
}
