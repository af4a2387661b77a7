//! Error types for amrsim

use std::fmt;
use thiserror::Error;

use crate::grid::Position;

/// Which end of a plan request a cell belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    Goal,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Start => write!(f, "start"),
            Endpoint::Goal => write!(f, "goal"),
        }
    }
}

/// amrsim error type
#[derive(Error, Debug)]
pub enum NavError {
    #[error("{endpoint} cell ({}, {}) is inside a danger zone", cell.x, cell.y)]
    BlockedCell { endpoint: Endpoint, cell: Position },

    #[error("no path from ({}, {}) to ({}, {})", start.x, start.y, goal.x, goal.y)]
    NoPath { start: Position, goal: Position },

    #[error("point ({x:.1}, {y:.1}) lies outside the workspace")]
    OutOfBounds { x: f32, y: f32 },

    #[error("malformed obstacle: {0}")]
    MalformedObstacle(String),

    #[error("event {event} is not valid in mode {mode}")]
    InvalidTransition {
        mode: &'static str,
        event: &'static str,
    },

    #[error("a plan is already in progress")]
    PlanInProgress,

    #[error("planning was cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<toml::de::Error> for NavError {
    fn from(e: toml::de::Error) -> Self {
        NavError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NavError>;
