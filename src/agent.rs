use std::f32::consts::{PI, TAU};

use crate::config::AgentConfig;
use crate::geometry::Point;

/// Manual drive along the heading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveDirection {
    Forward,
    Backward,
}

/// Manual rotation as seen on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnDirection {
    /// Counter-clockwise, heading grows
    Left,
    /// Clockwise, heading shrinks
    Right,
}

/// The simulated mobile robot: a rectangular footprint with a heading.
///
/// Heading 0 faces -y (up on screen) and grows counter-clockwise as seen on
/// screen, so heading PI/2 faces -x.
#[derive(Clone, Debug)]
pub struct Agent {
    /// Centre of the footprint
    pub position: Point,
    /// Radians in [0, 2PI)
    pub heading: f32,

    pub width: f32,
    pub height: f32,

    /// Pixels per second
    pub linear_speed: f32,
    /// Radians per second
    pub rotation_speed: f32,
    pub arrival_tolerance: f32,
    /// Radians
    pub heading_tolerance: f32,

    target: Option<Point>,
    track: Vec<Point>,
}

impl Agent {
    pub fn new(position: Point, width: f32, height: f32) -> Self {
        let defaults = AgentConfig::default();
        Agent {
            position,
            heading: 0.0,
            width,
            height,
            linear_speed: defaults.linear_speed,
            rotation_speed: defaults.rotation_speed_deg.to_radians(),
            arrival_tolerance: defaults.arrival_tolerance,
            heading_tolerance: defaults.heading_tolerance_deg.to_radians(),
            target: None,
            track: Vec::new(),
        }
    }

    /// Build from config; `fallback` is used when the config sets no start position
    pub fn from_config(config: &AgentConfig, fallback: Point) -> Self {
        let position = Point::new(
            config.x.unwrap_or(fallback.x),
            config.y.unwrap_or(fallback.y),
        );
        Agent {
            position,
            heading: 0.0,
            width: config.width,
            height: config.height,
            linear_speed: config.linear_speed,
            rotation_speed: config.rotation_speed_deg.to_radians(),
            arrival_tolerance: config.arrival_tolerance,
            heading_tolerance: config.heading_tolerance_deg.to_radians(),
            target: None,
            track: Vec::new(),
        }
    }

    /// Half the footprint diagonal; obstacles are padded by this much
    pub fn collision_radius(&self) -> f32 {
        (self.width / 2.0).hypot(self.height / 2.0)
    }

    pub fn set_target(&mut self, target: Point) {
        self.target = Some(target);
    }

    pub fn clear_target(&mut self) {
        self.target = None;
    }

    pub fn target(&self) -> Option<Point> {
        self.target
    }

    /// Positions visited while driving
    pub fn track(&self) -> &[Point] {
        &self.track
    }

    /// Bearing from the agent to `target` in the heading convention
    pub fn bearing_to(&self, target: Point) -> f32 {
        let bearing = (self.position.x - target.x).atan2(self.position.y - target.y);
        bearing.rem_euclid(TAU)
    }

    /// Advance by `dt` seconds: turn toward the target, then drive to it.
    ///
    /// Returns true once the target is reached (or when there is none).
    pub fn step(&mut self, dt: f32) -> bool {
        let Some(target) = self.target else {
            return true;
        };

        let distance = self.position.distance(&target);
        if distance <= self.arrival_tolerance {
            self.clear_target();
            return true;
        }

        let diff = wrap_angle(self.bearing_to(target) - self.heading);
        if diff.abs() > self.heading_tolerance {
            let max_turn = self.rotation_speed * dt;
            self.heading = (self.heading + diff.clamp(-max_turn, max_turn)).rem_euclid(TAU);
            return false;
        }

        let travel = (self.linear_speed * dt).min(distance);
        self.position.x -= travel * self.heading.sin();
        self.position.y -= travel * self.heading.cos();
        self.track.push(self.position);

        if self.position.distance(&target) <= self.arrival_tolerance {
            self.clear_target();
            return true;
        }
        false
    }

    /// Move `linear_speed * dt` along the heading, ignoring any target
    pub fn drive(&mut self, direction: DriveDirection, dt: f32) {
        let travel = match direction {
            DriveDirection::Forward => self.linear_speed * dt,
            DriveDirection::Backward => -self.linear_speed * dt,
        };
        self.position.x -= travel * self.heading.sin();
        self.position.y -= travel * self.heading.cos();
        self.track.push(self.position);
    }

    /// Rotate by `rotation_speed * dt`; heading stays in [0, 2PI)
    pub fn turn(&mut self, direction: TurnDirection, dt: f32) {
        let delta = match direction {
            TurnDirection::Left => self.rotation_speed * dt,
            TurnDirection::Right => -self.rotation_speed * dt,
        };
        self.heading = (self.heading + delta).rem_euclid(TAU);
    }

    /// Footprint corners in screen coordinates, rotated by the heading
    pub fn corners(&self) -> [Point; 4] {
        let (sin, cos) = self.heading.sin_cos();
        let hw = self.width / 2.0;
        let hh = self.height / 2.0;

        [(hw, -hh), (-hw, -hh), (-hw, hh), (hw, hh)].map(|(lx, ly)| {
            Point::new(
                self.position.x + lx * cos + ly * sin,
                self.position.y - lx * sin + ly * cos,
            )
        })
    }
}

/// Wrap an angle into (-PI, PI]
fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_collision_radius_is_half_diagonal() {
        let agent = Agent::new(Point::new(0.0, 0.0), 30.0, 40.0);
        assert!(approx(agent.collision_radius(), 25.0));
    }

    #[test]
    fn test_bearing_convention() {
        let agent = Agent::new(Point::new(100.0, 100.0), 10.0, 10.0);
        assert!(approx(agent.bearing_to(Point::new(100.0, 50.0)), 0.0));
        assert!(approx(agent.bearing_to(Point::new(50.0, 100.0)), PI / 2.0));
        assert!(approx(agent.bearing_to(Point::new(100.0, 150.0)), PI));
        assert!(approx(agent.bearing_to(Point::new(150.0, 100.0)), 3.0 * PI / 2.0));
    }

    #[test]
    fn test_drives_straight_when_aligned() {
        let mut agent = Agent::new(Point::new(100.0, 100.0), 10.0, 10.0);
        agent.set_target(Point::new(100.0, 0.0));

        let reached = agent.step(0.5);

        assert!(!reached);
        assert!(approx(agent.position.x, 100.0));
        assert!(approx(agent.position.y, 10.0));
        assert_eq!(agent.track().len(), 1);
    }

    #[test]
    fn test_turns_before_driving() {
        let mut agent = Agent::new(Point::new(100.0, 100.0), 10.0, 10.0);
        agent.set_target(Point::new(0.0, 100.0));

        // 60 deg/s: one second covers two thirds of the quarter turn
        agent.step(1.0);
        assert!(approx(agent.heading, 60f32.to_radians()));
        assert_eq!(agent.position, Point::new(100.0, 100.0));

        agent.step(1.0);
        assert!(approx(agent.heading, PI / 2.0));
    }

    #[test]
    fn test_turns_the_short_way() {
        let mut agent = Agent::new(Point::new(100.0, 100.0), 10.0, 10.0);
        agent.set_target(Point::new(200.0, 100.0));

        agent.step(0.5);
        assert!(approx(agent.heading, TAU - 30f32.to_radians()));
    }

    #[test]
    fn test_reaches_target_and_clears_it() {
        let mut agent = Agent::new(Point::new(0.0, 0.0), 10.0, 10.0);
        agent.set_target(Point::new(30.0, 40.0));

        let mut steps = 0;
        while !agent.step(1.0 / 60.0) {
            steps += 1;
            assert!(steps < 10_000, "agent never arrived");
        }

        assert!(agent.target().is_none());
        assert!(agent.position.distance(&Point::new(30.0, 40.0)) <= agent.arrival_tolerance);
    }

    #[test]
    fn test_drive_forward_follows_heading() {
        let mut agent = Agent::new(Point::new(100.0, 100.0), 10.0, 10.0);
        agent.drive(DriveDirection::Forward, 0.5);
        assert!(approx(agent.position.x, 100.0) && approx(agent.position.y, 10.0));

        agent.heading = PI / 2.0;
        agent.drive(DriveDirection::Forward, 0.5);
        assert!(approx(agent.position.x, 10.0) && approx(agent.position.y, 10.0));
        assert_eq!(agent.track().len(), 2);
    }

    #[test]
    fn test_drive_backward_reverses() {
        let mut agent = Agent::new(Point::new(100.0, 100.0), 10.0, 10.0);
        agent.drive(DriveDirection::Backward, 0.5);

        assert!(approx(agent.position.x, 100.0) && approx(agent.position.y, 190.0));
        assert_eq!(agent.track().len(), 1);
        assert_eq!(agent.heading, 0.0);
    }

    #[test]
    fn test_turn_left_grows_heading() {
        let mut agent = Agent::new(Point::new(0.0, 0.0), 10.0, 10.0);
        agent.turn(TurnDirection::Left, 1.5);
        assert!(approx(agent.heading, PI / 2.0));
        assert_eq!(agent.position, Point::new(0.0, 0.0));
        assert!(agent.track().is_empty());
    }

    #[test]
    fn test_turn_right_wraps_below_zero() {
        let mut agent = Agent::new(Point::new(0.0, 0.0), 10.0, 10.0);
        agent.turn(TurnDirection::Right, 0.5);
        assert!(approx(agent.heading, TAU - 30f32.to_radians()));

        agent.heading = TAU - 0.01;
        agent.turn(TurnDirection::Left, 1.0);
        assert!(agent.heading >= 0.0 && agent.heading < TAU);
        assert!(approx(agent.heading, 60f32.to_radians() - 0.01));
    }

    #[test]
    fn test_corners_follow_heading() {
        let mut agent = Agent::new(Point::new(0.0, 0.0), 50.0, 75.0);
        let upright = agent.corners();
        assert!(approx(upright[0].x, 25.0) && approx(upright[0].y, -37.5));

        agent.heading = PI / 2.0;
        let turned = agent.corners();
        assert!(approx(turned[0].x, -37.5) && approx(turned[0].y, -25.0));
    }
}
