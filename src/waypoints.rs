use std::collections::VecDeque;

use crate::geometry::Point;
use crate::grid::Position;

/// Coarse cell containing a continuous point (floor division by the block factor)
pub fn point_to_cell(point: Point, factor: i32) -> Position {
    let factor = factor as f32;
    Position::new(
        (point.x / factor).floor() as i32,
        (point.y / factor).floor() as i32,
    )
}

/// Continuous centre of a coarse cell: cell * K + K / 2
pub fn cell_center(cell: Position, factor: i32) -> Point {
    let factor = factor as f32;
    Point::new(
        cell.x as f32 * factor + factor / 2.0,
        cell.y as f32 * factor + factor / 2.0,
    )
}

/// Map a coarse path to continuous waypoints, one per cell, order preserved
pub fn cells_to_waypoints(path: &[Position], factor: i32) -> Vec<Point> {
    path.iter().map(|&cell| cell_center(cell, factor)).collect()
}

/// FIFO of waypoints handed to the navigation consumer.
///
/// Replaced wholesale by each successful plan and drained from the front.
#[derive(Debug, Clone, Default)]
pub struct WaypointBuffer {
    points: VecDeque<Point>,
}

impl WaypointBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the buffer contents with a new plan
    pub fn set_path(&mut self, waypoints: Vec<Point>) {
        self.points = VecDeque::from(waypoints);
    }

    /// Remove and return the front waypoint; `None` once drained
    pub fn pop_next(&mut self) -> Option<Point> {
        self.points.pop_front()
    }

    pub fn peek(&self) -> Option<&Point> {
        self.points.front()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_center_convention() {
        assert_eq!(cell_center(Position::new(0, 0), 10), Point::new(5.0, 5.0));
        assert_eq!(cell_center(Position::new(3, 7), 10), Point::new(35.0, 75.0));
    }

    #[test]
    fn test_point_to_cell_floors() {
        assert_eq!(point_to_cell(Point::new(9.99, 10.0), 10), Position::new(0, 1));
        assert_eq!(point_to_cell(Point::new(-0.5, 3.0), 10), Position::new(-1, 0));
        assert_eq!(point_to_cell(cell_center(Position::new(42, 17), 10), 10), Position::new(42, 17));
    }

    #[test]
    fn test_mapper_preserves_length_and_order() {
        let path = vec![Position::new(1, 1), Position::new(2, 2), Position::new(3, 2)];
        let waypoints = cells_to_waypoints(&path, 10);

        assert_eq!(
            waypoints,
            vec![Point::new(15.0, 15.0), Point::new(25.0, 25.0), Point::new(35.0, 25.0)]
        );
        assert!(cells_to_waypoints(&[], 10).is_empty());
    }

    #[test]
    fn test_buffer_is_fifo_and_replaced_wholesale() {
        let mut buffer = WaypointBuffer::new();
        buffer.set_path(vec![Point::new(1.0, 1.0), Point::new(2.0, 2.0)]);
        assert_eq!(buffer.pop_next(), Some(Point::new(1.0, 1.0)));
        assert_eq!(buffer.peek(), Some(&Point::new(2.0, 2.0)));

        buffer.set_path(vec![Point::new(9.0, 9.0)]);
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.pop_next(), Some(Point::new(9.0, 9.0)));
        assert_eq!(buffer.pop_next(), None);
    }
}
