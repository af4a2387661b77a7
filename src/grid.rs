/// A cell position on an occupancy grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// Euclidean distance squared
    pub fn distance_squared(&self, other: &Position) -> i32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn distance(&self, other: &Position) -> f64 {
        (self.distance_squared(other) as f64).sqrt()
    }

    /// Number of 8-connected moves between two cells on an empty grid
    pub fn chebyshev(&self, other: &Position) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// The 8 surrounding cells: orthogonal first, then diagonal
    pub fn neighbors_8(&self) -> [Position; 8] {
        [
            Position::new(self.x, self.y + 1),
            Position::new(self.x, self.y - 1),
            Position::new(self.x + 1, self.y),
            Position::new(self.x - 1, self.y),
            Position::new(self.x + 1, self.y + 1),
            Position::new(self.x + 1, self.y - 1),
            Position::new(self.x - 1, self.y + 1),
            Position::new(self.x - 1, self.y - 1),
        ]
    }
}

/// Boolean occupancy grid, row-major.
///
/// Used at two resolutions: the full-resolution danger map (one cell per
/// workspace pixel) and the coarse grid the pathfinder searches.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    pub rows: i32,
    pub cols: i32,
    pub cells: Vec<bool>,
}

impl Grid {
    /// Create a new grid with all cells free
    pub fn new(rows: i32, cols: i32) -> Self {
        let rows = rows.max(0);
        let cols = cols.max(0);
        Grid {
            rows,
            cols,
            cells: vec![false; rows as usize * cols as usize],
        }
    }

    /// Create a grid with specific blocked cells
    pub fn with_blocked(rows: i32, cols: i32, blocked: &[i32]) -> Self {
        let mut grid = Self::new(rows, cols);
        for &cell_id in blocked {
            if cell_id >= 0 && (cell_id as usize) < grid.cells.len() {
                grid.cells[cell_id as usize] = true;
            }
        }
        grid
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.cols && y >= 0 && y < self.rows
    }

    /// Check if a cell at (x, y) is blocked
    pub fn is_blocked(&self, x: i32, y: i32) -> bool {
        if !self.in_bounds(x, y) {
            return true; // Out of bounds is considered blocked
        }
        self.cells[self.get_id(x, y) as usize]
    }

    pub fn is_blocked_at(&self, pos: Position) -> bool {
        self.is_blocked(pos.x, pos.y)
    }

    /// Convert (x, y) coordinates to cell ID
    pub fn get_id(&self, x: i32, y: i32) -> i32 {
        x + y * self.cols
    }

    /// Convert cell ID to (x, y) coordinates
    pub fn get_coords(&self, id: i32) -> (i32, i32) {
        (id % self.cols, id / self.cols)
    }

    /// Set cell value at (x, y); out-of-bounds writes are ignored
    pub fn set_cell(&mut self, x: i32, y: i32, blocked: bool) {
        if self.in_bounds(x, y) {
            let id = self.get_id(x, y);
            self.cells[id as usize] = blocked;
        }
    }

    /// Mark every cell in the inclusive range [x0, x1] x [y0, y1], clamped to the grid
    pub fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        let x0 = x0.max(0);
        let y0 = y0.max(0);
        let x1 = x1.min(self.cols - 1);
        let y1 = y1.min(self.rows - 1);
        if x0 > x1 || y0 > y1 {
            return;
        }

        for y in y0..=y1 {
            let row = (y * self.cols) as usize;
            self.cells[row + x0 as usize..=row + x1 as usize].fill(true);
        }
    }

    pub fn count_blocked(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Bounding box (min_x, min_y, max_x, max_y) of all blocked cells
    pub fn blocked_bounds(&self) -> Option<(i32, i32, i32, i32)> {
        let mut bounds: Option<(i32, i32, i32, i32)> = None;
        for (id, _) in self.cells.iter().enumerate().filter(|(_, c)| **c) {
            let (x, y) = self.get_coords(id as i32);
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
        bounds
    }

    /// Render the grid as text: '■' blocked, '□' free, one line per row
    pub fn to_ascii(&self) -> String {
        let mut result = String::with_capacity(((self.cols + 1) * self.rows) as usize * 3);

        for y in 0..self.rows {
            for x in 0..self.cols {
                result.push(if self.is_blocked(x, y) { '■' } else { '□' });
            }
            result.push('\n');
        }

        result
    }
}
