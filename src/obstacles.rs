use log::debug;

use crate::error::Result;
use crate::geometry::{Obstacle, Point};

/// Ordered collection of user-drawn obstacles.
///
/// Only `add*` and `clear` mutate it. Planning works on a `snapshot`.
#[derive(Debug, Clone, Default)]
pub struct ObstacleStore {
    obstacles: Vec<Obstacle>,
}

impl ObstacleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
        debug!("obstacle #{} added: {:?}", self.obstacles.len(), obstacle.bounding_box());
    }

    /// Add the rectangle spanned by a drag gesture; degenerate drags are rejected
    pub fn add_from_drag(&mut self, start: Point, end: Point) -> Result<Obstacle> {
        let obstacle = Obstacle::from_drag(start, end)?;
        self.add(obstacle);
        Ok(obstacle)
    }

    pub fn clear(&mut self) {
        self.obstacles.clear();
    }

    /// Owned copy of the current obstacle list
    pub fn snapshot(&self) -> Vec<Obstacle> {
        self.obstacles.clone()
    }

    pub fn as_slice(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_clear_and_snapshot_isolation() {
        let mut store = ObstacleStore::new();
        store.add_from_drag(Point::new(0.0, 0.0), Point::new(10.0, 10.0)).unwrap();
        assert!(store.add_from_drag(Point::new(5.0, 5.0), Point::new(5.0, 20.0)).is_err());
        assert_eq!(store.len(), 1);

        let snapshot = store.snapshot();
        store.clear();

        assert!(store.is_empty());
        assert_eq!(snapshot.len(), 1);
    }
}
