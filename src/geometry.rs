use serde::{Deserialize, Serialize};

use crate::error::{NavError, Result};

/// A point in continuous workspace (pixel) coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }

    pub fn distance(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Axis-aligned rectangle with `min` strictly below `max` on both axes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    /// Build a rectangle from two opposite corners given in any order.
    ///
    /// Fails when the corners share an x or y coordinate.
    pub fn from_corners(a: Point, b: Point) -> Result<Self> {
        let min = Point::new(a.x.min(b.x), a.y.min(b.y));
        let max = Point::new(a.x.max(b.x), a.y.max(b.y));

        if !(min.x < max.x && min.y < max.y) {
            return Err(NavError::MalformedObstacle(format!(
                "corners ({:.1}, {:.1}) and ({:.1}, {:.1}) span no area",
                a.x, a.y, b.x, b.y
            )));
        }

        Ok(Rect { min, max })
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Grow the rectangle by `margin` on every side
    pub fn inflate(&self, margin: f32) -> Rect {
        Rect {
            min: Point::new(self.min.x - margin, self.min.y - margin),
            max: Point::new(self.max.x + margin, self.max.y + margin),
        }
    }

    /// Closed-interval containment test
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// A user-drawn rectangular obstacle stored as its four corners.
///
/// Corner order is (min,min), (max,min), (max,max), (min,max).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    corners: [Point; 4],
}

impl Obstacle {
    /// Validate four corners as an axis-aligned rectangle with positive extent
    pub fn new(corners: [Point; 4]) -> Result<Self> {
        let min_x = corners.iter().map(|c| c.x).fold(f32::INFINITY, f32::min);
        let max_x = corners.iter().map(|c| c.x).fold(f32::NEG_INFINITY, f32::max);
        let min_y = corners.iter().map(|c| c.y).fold(f32::INFINITY, f32::min);
        let max_y = corners.iter().map(|c| c.y).fold(f32::NEG_INFINITY, f32::max);

        let axis_aligned = corners
            .iter()
            .all(|c| (c.x == min_x || c.x == max_x) && (c.y == min_y || c.y == max_y));
        if !axis_aligned {
            return Err(NavError::MalformedObstacle(
                "corners do not form an axis-aligned rectangle".to_string(),
            ));
        }

        let rect = Rect::from_corners(Point::new(min_x, min_y), Point::new(max_x, max_y))?;
        Ok(Self::from_rect(rect))
    }

    /// Derive an obstacle from a drag gesture (drag-start and drag-end are opposite corners)
    pub fn from_drag(start: Point, end: Point) -> Result<Self> {
        Ok(Self::from_rect(Rect::from_corners(start, end)?))
    }

    pub fn from_rect(rect: Rect) -> Self {
        Obstacle {
            corners: [
                Point::new(rect.min.x, rect.min.y),
                Point::new(rect.max.x, rect.min.y),
                Point::new(rect.max.x, rect.max.y),
                Point::new(rect.min.x, rect.max.y),
            ],
        }
    }

    pub fn corners(&self) -> &[Point; 4] {
        &self.corners
    }

    pub fn bounding_box(&self) -> Rect {
        Rect {
            min: self.corners[0],
            max: self.corners[2],
        }
    }

    /// The obstacle's bounding box expanded by the agent's collision radius
    pub fn danger_zone(&self, padding: f32) -> Rect {
        self.bounding_box().inflate(padding)
    }
}
