use amrsim::rasterize::{coarse_grid, danger_map, downsample};
use amrsim::{Grid, Obstacle, Point};

fn obstacle(x0: f32, y0: f32, x1: f32, y1: f32) -> Obstacle {
    Obstacle::from_drag(Point::new(x0, y0), Point::new(x1, y1)).unwrap()
}

#[test]
fn test_padding_expands_bounding_box_by_exactly_padding() {
    let map = danger_map(&[obstacle(100.0, 100.0, 200.0, 150.0)], 20.0, 400, 300);

    assert_eq!(map.blocked_bounds(), Some((80, 80, 220, 170)));
    assert_eq!(map.count_blocked(), 141 * 91);

    assert!(map.is_blocked(80, 80));
    assert!(map.is_blocked(220, 170));
    assert!(!map.is_blocked(79, 100));
    assert!(!map.is_blocked(221, 100));
    assert!(!map.is_blocked(150, 171));
}

#[test]
fn test_fractional_padding_only_covers_pixels_inside_the_zone() {
    let map = danger_map(&[obstacle(100.0, 100.0, 200.0, 150.0)], 20.5, 400, 300);
    // 79.5..=220.5 covers pixel centres 80..=220
    assert_eq!(map.blocked_bounds(), Some((80, 80, 220, 170)));
}

#[test]
fn test_drag_direction_does_not_matter() {
    let forward = danger_map(&[obstacle(10.0, 20.0, 60.0, 40.0)], 5.0, 100, 100);
    let backward = danger_map(&[obstacle(60.0, 40.0, 10.0, 20.0)], 5.0, 100, 100);
    assert_eq!(forward, backward);
}

#[test]
fn test_zones_are_clipped_to_workspace() {
    let map = danger_map(&[obstacle(-30.0, -30.0, 10.0, 10.0)], 5.0, 50, 50);
    assert_eq!(map.blocked_bounds(), Some((0, 0, 15, 15)));
}

#[test]
fn test_single_pixel_marks_its_coarse_cell() {
    let mut fine = Grid::new(30, 40);
    fine.set_cell(37, 12, true);

    let coarse = downsample(&fine, 10);

    assert_eq!((coarse.rows, coarse.cols), (3, 4));
    assert_eq!(coarse.count_blocked(), 1);
    assert!(coarse.is_blocked(3, 1));
}

#[test]
fn test_empty_block_stays_clear() {
    let mut fine = Grid::new(20, 20);
    fine.fill_rect(0, 0, 9, 9);

    let coarse = downsample(&fine, 10);

    assert!(coarse.is_blocked(0, 0));
    assert!(!coarse.is_blocked(1, 0));
    assert!(!coarse.is_blocked(0, 1));
    assert!(!coarse.is_blocked(1, 1));
}

#[test]
fn test_partial_edge_blocks_are_kept() {
    let mut fine = Grid::new(25, 905);
    fine.set_cell(904, 24, true);

    let coarse = downsample(&fine, 10);

    assert_eq!((coarse.rows, coarse.cols), (3, 91));
    assert!(coarse.is_blocked(90, 2));
}

#[test]
fn test_coarse_grid_never_under_approximates() {
    let obstacles = [obstacle(400.0, 200.0, 500.0, 300.0), obstacle(37.0, 12.0, 52.0, 13.0)];
    let fine = danger_map(&obstacles, 12.5, 900, 500);
    let coarse = coarse_grid(&obstacles, 12.5, 900, 500, 10);

    for y in 0..fine.rows {
        for x in 0..fine.cols {
            if fine.is_blocked(x, y) {
                assert!(coarse.is_blocked(x / 10, y / 10), "pixel ({}, {}) lost", x, y);
            }
        }
    }
}
