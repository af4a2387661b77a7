#![allow(dead_code)]

use amrsim::{Grid, Heuristic, Obstacle, Planner, Point, Position};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// A parsed ASCII map: 'S' start, 'G' goal, '#' or '■' blocked, anything else free
pub struct AsciiMap {
    pub grid: Grid,
    pub start: Position,
    pub goal: Position,
}

pub fn parse_map(map: &str) -> AsciiMap {
    let lines: Vec<&str> = map
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let rows = lines.len() as i32;
    let cols = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as i32;

    let mut grid = Grid::new(rows, cols);
    let mut start = Position::new(0, 0);
    let mut goal = Position::new(0, 0);

    for (y, line) in lines.iter().enumerate() {
        for (x, c) in line.chars().enumerate() {
            let (x, y) = (x as i32, y as i32);
            match c {
                'S' => start = Position::new(x, y),
                'G' => goal = Position::new(x, y),
                '#' | '■' => grid.set_cell(x, y, true),
                _ => {}
            }
        }
    }

    AsciiMap { grid, start, goal }
}

/// Mirror left-right
pub fn flip_horizontal(map: &AsciiMap) -> AsciiMap {
    let cols = map.grid.cols;
    let flip = |p: Position| Position::new(cols - 1 - p.x, p.y);
    AsciiMap {
        grid: remap(&map.grid, |x, y| (cols - 1 - x, y)),
        start: flip(map.start),
        goal: flip(map.goal),
    }
}

/// Mirror top-bottom
pub fn flip_vertical(map: &AsciiMap) -> AsciiMap {
    let rows = map.grid.rows;
    let flip = |p: Position| Position::new(p.x, rows - 1 - p.y);
    AsciiMap {
        grid: remap(&map.grid, |x, y| (x, rows - 1 - y)),
        start: flip(map.start),
        goal: flip(map.goal),
    }
}

fn remap(grid: &Grid, f: impl Fn(i32, i32) -> (i32, i32)) -> Grid {
    let mut out = Grid::new(grid.rows, grid.cols);
    for y in 0..grid.rows {
        for x in 0..grid.cols {
            if grid.is_blocked(x, y) {
                let (nx, ny) = f(x, y);
                out.set_cell(nx, ny, true);
            }
        }
    }
    out
}

/// Every step is one 8-connected move and no cell on the path is occupied
pub fn assert_path_valid(grid: &Grid, path: &[Position], start: Position, goal: Position) {
    assert_eq!(path.first(), Some(&start), "path must begin at the start cell");
    assert_eq!(path.last(), Some(&goal), "path must end at the goal cell");

    for pos in path {
        assert!(
            !grid.is_blocked_at(*pos),
            "path crosses occupied cell ({}, {}){}",
            pos.x,
            pos.y,
            visualize_path(grid, path)
        );
    }
    for pair in path.windows(2) {
        assert_eq!(
            pair[0].chebyshev(&pair[1]),
            1,
            "non-adjacent step ({}, {}) -> ({}, {})",
            pair[0].x,
            pair[0].y,
            pair[1].x,
            pair[1].y
        );
    }
}

pub fn visualize_path(grid: &Grid, path: &[Position]) -> String {
    let mut result = String::from("\n");
    for y in 0..grid.rows {
        for x in 0..grid.cols {
            let pos = Position::new(x, y);
            let symbol = if path.first() == Some(&pos) {
                'S'
            } else if path.last() == Some(&pos) {
                'G'
            } else if path.contains(&pos) {
                '*'
            } else if grid.is_blocked(x, y) {
                '█'
            } else {
                '.'
            };
            result.push(symbol);
        }
        result.push('\n');
    }
    result
}

/// Planning scenario stored under test_data/scenarios
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub width: i32,
    pub height: i32,
    pub factor: i32,
    pub padding: f32,
    #[serde(default)]
    pub heuristic: Heuristic,
    /// [x0, y0, x1, y1] drag corners
    pub obstacles: Vec<[f32; 4]>,
    pub start: [f32; 2],
    pub goal: [f32; 2],
    pub expect: Expectation,
    #[serde(default)]
    pub expected_hops: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expectation {
    Path,
    NoPath,
    Blocked,
}

impl Scenario {
    pub fn planner(&self) -> Planner {
        Planner::new(self.width, self.height, self.factor, self.padding, self.heuristic)
    }

    pub fn obstacles(&self) -> Vec<Obstacle> {
        self.obstacles
            .iter()
            .map(|[x0, y0, x1, y1]| {
                Obstacle::from_drag(Point::new(*x0, *y0), Point::new(*x1, *y1))
                    .unwrap_or_else(|e| panic!("scenario '{}': {}", self.name, e))
            })
            .collect()
    }

    pub fn start(&self) -> Point {
        Point::new(self.start[0], self.start[1])
    }

    pub fn goal(&self) -> Point {
        Point::new(self.goal[0], self.goal[1])
    }
}

pub fn load_scenario(path: &Path) -> Result<Scenario, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}
