//! Interactive session: the mode state machine plus everything a front-end
//! drives (obstacle store, planner, waypoint buffer, agent, event log).

use log::{info, warn};

use crate::agent::{Agent, DriveDirection, TurnDirection};
use crate::config::Config;
use crate::error::{NavError, Result};
use crate::event_log::{Action, EventLog};
use crate::geometry::{Obstacle, Point};
use crate::grid::Grid;
use crate::obstacles::ObstacleStore;
use crate::planner::{Plan, PlanTask, Planner};
use crate::waypoints::WaypointBuffer;

/// The single active interaction mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mode {
    Idle,
    /// Dragging out an obstacle from `anchor`
    PlacingObstacle { anchor: Point },
    /// Waiting for a target point
    Targeting,
    /// A plan is being computed or followed
    Pathfinding,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModeEvent {
    BeginObstacle(Point),
    FinishObstacle,
    BeginTargeting,
    ManualDrive,
    PlanStarted,
    PlanFailed,
    Arrived,
    Cancel,
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Idle => "Idle",
            Mode::PlacingObstacle { .. } => "PlacingObstacle",
            Mode::Targeting => "Targeting",
            Mode::Pathfinding => "Pathfinding",
        }
    }

    /// The mode `event` leads to, or `InvalidTransition`
    pub fn next(&self, event: ModeEvent) -> Result<Mode> {
        use ModeEvent::*;

        match (*self, event) {
            (Mode::Idle, BeginObstacle(anchor)) => Ok(Mode::PlacingObstacle { anchor }),
            (Mode::PlacingObstacle { .. }, FinishObstacle | Cancel) => Ok(Mode::Idle),
            (Mode::Idle, BeginTargeting) => Ok(Mode::Targeting),
            (Mode::Idle, ManualDrive) => Ok(Mode::Idle),
            (Mode::Targeting, Cancel) => Ok(Mode::Idle),
            (Mode::Targeting, PlanStarted) => Ok(Mode::Pathfinding),
            (Mode::Pathfinding, PlanFailed | Arrived | Cancel) => Ok(Mode::Idle),
            (mode, event) => Err(NavError::InvalidTransition {
                mode: mode.name(),
                event: event.name(),
            }),
        }
    }
}

impl ModeEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ModeEvent::BeginObstacle(_) => "BeginObstacle",
            ModeEvent::FinishObstacle => "FinishObstacle",
            ModeEvent::BeginTargeting => "BeginTargeting",
            ModeEvent::ManualDrive => "ManualDrive",
            ModeEvent::PlanStarted => "PlanStarted",
            ModeEvent::PlanFailed => "PlanFailed",
            ModeEvent::Arrived => "Arrived",
            ModeEvent::Cancel => "Cancel",
        }
    }
}

pub struct Session {
    planner: Planner,
    obstacles: ObstacleStore,
    agent: Agent,
    buffer: WaypointBuffer,
    mode: Mode,
    pending: Option<PlanTask>,
    last_plan: Option<Plan>,
    last_error: Option<String>,
    events: EventLog,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        let centre = Point::new(
            config.workspace.width as f32 / 2.0,
            config.workspace.height as f32 / 2.0,
        );
        Session {
            planner: Planner::from_config(config),
            obstacles: ObstacleStore::new(),
            agent: Agent::from_config(&config.agent, centre),
            buffer: WaypointBuffer::new(),
            mode: Mode::Idle,
            pending: None,
            last_plan: None,
            last_error: None,
            events: EventLog::new(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn obstacles(&self) -> &ObstacleStore {
        &self.obstacles
    }

    pub fn waypoints(&self) -> &WaypointBuffer {
        &self.buffer
    }

    pub fn planner(&self) -> &Planner {
        &self.planner
    }

    pub fn last_plan(&self) -> Option<&Plan> {
        self.last_plan.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn event_log(&self) -> &EventLog {
        &self.events
    }

    pub fn is_planning(&self) -> bool {
        self.pending.is_some()
    }

    /// Coarse grid for the current obstacles
    pub fn coarse_grid(&self) -> Grid {
        self.planner.coarse_grid(self.obstacles.as_slice())
    }

    fn transition(&mut self, event: ModeEvent) -> Result<()> {
        self.mode = self.mode.next(event)?;
        Ok(())
    }

    pub fn begin_obstacle(&mut self, anchor: Point) -> Result<()> {
        self.transition(ModeEvent::BeginObstacle(anchor))?;
        self.events.log_start(Action::BeginObstacle {
            x: anchor.x,
            y: anchor.y,
        });
        Ok(())
    }

    /// Commit the drag from the anchor to `end`. The session returns to Idle
    /// whether or not the rectangle is accepted.
    pub fn finish_obstacle(&mut self, end: Point) -> Result<Obstacle> {
        let Mode::PlacingObstacle { anchor } = self.mode else {
            return Err(NavError::InvalidTransition {
                mode: self.mode.name(),
                event: ModeEvent::FinishObstacle.name(),
            });
        };
        self.transition(ModeEvent::FinishObstacle)?;

        match self.obstacles.add_from_drag(anchor, end) {
            Ok(obstacle) => {
                let bbox = obstacle.bounding_box();
                self.events.log_finish(Action::AddObstacle {
                    min_x: bbox.min.x,
                    min_y: bbox.min.y,
                    max_x: bbox.max.x,
                    max_y: bbox.max.y,
                });
                Ok(obstacle)
            }
            Err(e) => {
                warn!("obstacle rejected: {}", e);
                self.events.log_finish(Action::RejectObstacle {
                    reason: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Remove every obstacle; refused while a plan is running or being followed
    pub fn clear_obstacles(&mut self) -> Result<usize> {
        if self.mode == Mode::Pathfinding {
            return Err(NavError::PlanInProgress);
        }
        let removed = self.obstacles.len();
        self.obstacles.clear();
        self.events.log_finish(Action::ClearObstacles { removed });
        Ok(removed)
    }

    pub fn begin_targeting(&mut self) -> Result<()> {
        self.transition(ModeEvent::BeginTargeting)
    }

    /// Drive the agent by hand; only allowed while Idle
    pub fn drive(&mut self, direction: DriveDirection, dt: f32) -> Result<()> {
        self.transition(ModeEvent::ManualDrive)?;
        self.agent.drive(direction, dt);
        Ok(())
    }

    /// Rotate the agent by hand; only allowed while Idle
    pub fn turn(&mut self, direction: TurnDirection, dt: f32) -> Result<()> {
        self.transition(ModeEvent::ManualDrive)?;
        self.agent.turn(direction, dt);
        Ok(())
    }

    /// Plan to `target` on the calling thread and start following the result.
    ///
    /// Returns the number of waypoints. On failure the session is back in
    /// Idle with obstacles and agent untouched.
    pub fn set_target(&mut self, target: Point) -> Result<usize> {
        self.transition(ModeEvent::PlanStarted)?;
        self.events.log_start(Action::PlanRequest {
            x: target.x,
            y: target.y,
        });

        match self
            .planner
            .plan(self.obstacles.as_slice(), self.agent.position, target)
        {
            Ok(plan) => Ok(self.apply_plan(plan)),
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    /// Plan to `target` on a worker thread; `tick` picks up the result
    pub fn spawn_target(&mut self, target: Point) -> Result<()> {
        self.transition(ModeEvent::PlanStarted)?;
        self.events.log_start(Action::PlanRequest {
            x: target.x,
            y: target.y,
        });

        let task = self
            .planner
            .spawn(self.obstacles.snapshot(), self.agent.position, target);
        self.pending = Some(task);
        Ok(())
    }

    /// Leave the current mode, abandoning any running plan or path
    pub fn cancel(&mut self) -> Result<()> {
        self.transition(ModeEvent::Cancel)?;
        if let Some(task) = self.pending.take() {
            task.cancel();
        }
        self.buffer.clear();
        self.agent.clear_target();
        self.events.log_finish(Action::Cancel);
        Ok(())
    }

    /// Advance the session by `dt` seconds: collect a finished background
    /// plan, drive the agent, and pop the next waypoint on arrival.
    pub fn tick(&mut self, dt: f32) {
        if let Some(task) = &self.pending {
            match task.try_result() {
                None => return,
                Some(Ok(plan)) => {
                    self.pending = None;
                    self.apply_plan(plan);
                }
                Some(Err(e)) => {
                    self.pending = None;
                    self.fail(&e);
                    return;
                }
            }
        }

        if self.mode != Mode::Pathfinding {
            return;
        }

        if self.agent.target().is_some() {
            if !self.agent.step(dt) {
                return;
            }
            let reached = self.agent.position;
            self.events.log_finish(Action::WaypointReached {
                x: reached.x,
                y: reached.y,
                remaining: self.buffer.len(),
            });
        }

        match self.buffer.pop_next() {
            Some(next) => self.agent.set_target(next),
            None => {
                let at = self.agent.position;
                info!("arrived at ({:.1}, {:.1})", at.x, at.y);
                self.events.log_finish(Action::Arrived { x: at.x, y: at.y });
                if let Err(e) = self.transition(ModeEvent::Arrived) {
                    warn!("{}", e);
                }
            }
        }
    }

    fn apply_plan(&mut self, plan: Plan) -> usize {
        let count = plan.waypoints.len();
        self.events.log_finish(Action::PlanSucceeded {
            waypoints: count,
            nodes_expanded: plan.stats.nodes_expanded,
            elapsed_ms: plan.elapsed.as_millis() as u64,
        });

        self.buffer.set_path(plan.waypoints.clone());
        if let Some(first) = self.buffer.pop_next() {
            self.agent.set_target(first);
        }
        self.last_plan = Some(plan);
        self.last_error = None;
        count
    }

    fn fail(&mut self, error: &NavError) {
        warn!("plan failed: {}", error);
        self.events.log_finish(Action::PlanFailed {
            reason: error.to_string(),
        });
        self.last_error = Some(error.to_string());
        self.mode = self.mode.next(ModeEvent::PlanFailed).unwrap_or(Mode::Idle);
    }
}
