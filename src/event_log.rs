use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use crate::error::Result;

/// Action phase - whether the action is starting or finishing
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ActionPhase {
    Start,
    Finish,
}

/// Session actions and their outcomes
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Obstacle drag started at (x, y)
    BeginObstacle { x: f32, y: f32 },
    /// Obstacle committed with its bounding box
    AddObstacle { min_x: f32, min_y: f32, max_x: f32, max_y: f32 },
    /// Obstacle drag rejected
    RejectObstacle { reason: String },
    ClearObstacles { removed: usize },
    /// Plan requested toward (x, y)
    PlanRequest { x: f32, y: f32 },
    /// Plan finished with `waypoints` points after `nodes_expanded` expansions
    PlanSucceeded { waypoints: usize, nodes_expanded: usize, elapsed_ms: u64 },
    PlanFailed { reason: String },
    WaypointReached { x: f32, y: f32, remaining: usize },
    Arrived { x: f32, y: f32 },
    Cancel,
}

/// Logged action with timestamp and phase
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoggedAction {
    /// Milliseconds since start
    pub timestamp_ms: u64,
    pub action: Action,
    pub phase: ActionPhase,
}

/// Append-only session log
pub struct EventLog {
    start_time: Instant,
    actions: Vec<LoggedAction>,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLog {
    pub fn new() -> Self {
        EventLog {
            start_time: Instant::now(),
            actions: Vec::new(),
        }
    }

    /// Log an action with current timestamp and phase
    pub fn log(&mut self, action: Action, phase: ActionPhase) {
        let timestamp_ms = self.start_time.elapsed().as_millis() as u64;

        self.actions.push(LoggedAction {
            timestamp_ms,
            action,
            phase,
        });
    }

    pub fn log_start(&mut self, action: Action) {
        self.log(action, ActionPhase::Start);
    }

    pub fn log_finish(&mut self, action: Action) {
        self.log(action, ActionPhase::Finish);
    }

    pub fn actions(&self) -> &[LoggedAction] {
        &self.actions
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.actions)?)
    }

    /// Save log to JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Print log with the time from each plan request to its outcome
    pub fn print_with_durations(&self) {
        println!("\n=== Event Log ({} events) ===", self.actions.len());

        let mut open_request: Option<u64> = None;
        for (i, logged) in self.actions.iter().enumerate() {
            let phase = match logged.phase {
                ActionPhase::Start => "START ",
                ActionPhase::Finish => "FINISH",
            };
            match (&logged.action, &logged.phase) {
                (Action::PlanRequest { .. }, ActionPhase::Start) => {
                    open_request = Some(logged.timestamp_ms);
                    println!("[{:6}ms] #{:3} {} {:?}", logged.timestamp_ms, i + 1, phase, logged.action);
                }
                (Action::PlanSucceeded { .. } | Action::PlanFailed { .. }, _) => {
                    match open_request.take() {
                        Some(start_ms) => println!(
                            "[{:6}ms] #{:3} {} {:?} [duration: {}ms]",
                            logged.timestamp_ms,
                            i + 1,
                            phase,
                            logged.action,
                            logged.timestamp_ms.saturating_sub(start_ms)
                        ),
                        None => println!(
                            "[{:6}ms] #{:3} {} {:?} [no matching request]",
                            logged.timestamp_ms, i + 1, phase, logged.action
                        ),
                    }
                }
                _ => println!("[{:6}ms] #{:3} {} {:?}", logged.timestamp_ms, i + 1, phase, logged.action),
            }
        }
        println!("=== End of Log ===\n");
    }

    /// Get summary statistics
    pub fn summary(&self) -> String {
        let mut counts: HashMap<&'static str, usize> = HashMap::new();
        for logged in &self.actions {
            let key = match logged.action {
                Action::AddObstacle { .. } => "obstacles",
                Action::RejectObstacle { .. } => "rejected",
                Action::ClearObstacles { .. } => "clears",
                Action::PlanSucceeded { .. } => "plans_ok",
                Action::PlanFailed { .. } => "plans_failed",
                Action::WaypointReached { .. } => "waypoints",
                Action::Arrived { .. } => "arrivals",
                _ => continue,
            };
            *counts.entry(key).or_insert(0) += 1;
        }
        let count = |key: &str| counts.get(key).copied().unwrap_or(0);

        let duration = self.actions.last().map(|a| a.timestamp_ms).unwrap_or(0);

        format!(
            "Session Duration: {}ms\n\
             Total Events: {}\n\
             Obstacles: {} added, {} rejected, {} clears\n\
             Plans: {} succeeded, {} failed\n\
             Navigation: {} waypoints reached, {} arrivals",
            duration,
            self.actions.len(),
            count("obstacles"),
            count("rejected"),
            count("clears"),
            count("plans_ok"),
            count("plans_failed"),
            count("waypoints"),
            count("arrivals")
        )
    }
}
