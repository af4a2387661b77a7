pub mod agent;
pub mod config;
pub mod error;
pub mod event_log;
pub mod geometry;
pub mod grid;
pub mod obstacles;
pub mod pathfinding;
pub mod planner;
pub mod rasterize;
pub mod session;
pub mod waypoints;

pub use agent::{Agent, DriveDirection, TurnDirection};
pub use config::Config;
pub use error::{NavError, Result};
pub use geometry::{Obstacle, Point, Rect};
pub use grid::{Grid, Position};
pub use pathfinding::{AStar, Heuristic};
pub use planner::{Plan, PlanTask, Planner};
pub use session::{Mode, Session};
pub use waypoints::WaypointBuffer;
