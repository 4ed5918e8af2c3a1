/// The raycaster: one DDA walk per screen column.
///
/// `cast_ray` returns the perpendicular (fisheye-corrected) distance
/// from the camera to the nearest wall along a ray, never reading
/// outside maze bounds. `render_view` converts those distances into
/// centered vertical wall slices with distance-bucket shading.

use crate::domain::camera::Camera;
use crate::domain::maze::Maze;

use super::grid::{GridBuffer, BLANK};

/// Sentinel distance for rays that never hit (degenerate rays leaving
/// the maze). Treated as "infinite" background.
pub const MAX_DISTANCE: f64 = 1000.0;

/// Below this, a direction component is treated as zero and the ray is
/// walked along the other axis only.
const AXIS_EPS: f64 = 1e-4;

/// Keeps the distance-to-height division finite at point-blank range.
const HEIGHT_EPS: f64 = 1e-4;

/// Distance to the nearest wall from (ox, oy) along `angle`.
///
/// Walls outside the maze count as hits at the boundary, so the walk
/// always terminates. The returned distance is perpendicular to the
/// camera plane: the last-stepped axis determines which correction
/// formula applies.
pub fn cast_ray(maze: &Maze, ox: f64, oy: f64, angle: f64) -> f64 {
    let dx = angle.cos();
    let dy = angle.sin();
    let size = maze.size() as isize;

    // Near-vertical ray: step cell-by-cell along y only.
    if dx.abs() < AXIS_EPS {
        let step_y: isize = if dy > 0.0 { 1 } else { -1 };
        let map_x = ox.floor() as isize;
        if map_x < 0 || map_x >= size {
            return MAX_DISTANCE;
        }
        let mut map_y = oy.floor() as isize;
        if step_y > 0 {
            map_y += 1;
        }
        while map_y >= 0 && map_y < size {
            if maze.is_wall(map_x, map_y) {
                // Same near-boundary form as the DDA correction below.
                return ((map_y as f64 - oy + (1 - step_y) as f64 / 2.0) / dy).abs();
            }
            map_y += step_y;
        }
        return MAX_DISTANCE;
    }

    // Near-horizontal ray: symmetric, along x only.
    if dy.abs() < AXIS_EPS {
        let step_x: isize = if dx > 0.0 { 1 } else { -1 };
        let map_y = oy.floor() as isize;
        if map_y < 0 || map_y >= size {
            return MAX_DISTANCE;
        }
        let mut map_x = ox.floor() as isize;
        if step_x > 0 {
            map_x += 1;
        }
        while map_x >= 0 && map_x < size {
            if maze.is_wall(map_x, map_y) {
                return ((map_x as f64 - ox + (1 - step_x) as f64 / 2.0) / dx).abs();
            }
            map_x += step_x;
        }
        return MAX_DISTANCE;
    }

    // General case: DDA over grid-line crossings.
    let delta_dist_x = (1.0 / dx).abs();
    let delta_dist_y = (1.0 / dy).abs();

    let (step_x, mut side_dist_x): (isize, f64) = if dx < 0.0 {
        (-1, (ox - ox.floor()) * delta_dist_x)
    } else {
        (1, (ox.floor() + 1.0 - ox) * delta_dist_x)
    };
    let (step_y, mut side_dist_y): (isize, f64) = if dy < 0.0 {
        (-1, (oy - oy.floor()) * delta_dist_y)
    } else {
        (1, (oy.floor() + 1.0 - oy) * delta_dist_y)
    };

    let mut map_x = ox.floor() as isize;
    let mut map_y = oy.floor() as isize;
    // false = stepped along x, true = stepped along y
    let mut side_y = false;

    loop {
        if side_dist_x < side_dist_y {
            side_dist_x += delta_dist_x;
            map_x += step_x;
            side_y = false;
        } else {
            side_dist_y += delta_dist_y;
            map_y += step_y;
            side_y = true;
        }

        // Out of bounds terminates as a boundary hit; Maze::is_wall
        // already reads out-of-bounds cells as Wall.
        let oob = map_x < 0 || map_x >= size || map_y < 0 || map_y >= size;
        if oob || maze.is_wall(map_x, map_y) {
            break;
        }
    }

    let perp = if !side_y {
        (map_x as f64 - ox + (1 - step_x) as f64 / 2.0) / dx
    } else {
        (map_y as f64 - oy + (1 - step_y) as f64 / 2.0) / dy
    };
    perp.abs()
}

/// Shade glyph for a wall slice at `distance` — five buckets, densest
/// glyph nearest.
pub fn shade(distance: f64) -> char {
    if distance < 1.0 {
        '█'
    } else if distance < 2.0 {
        '▓'
    } else if distance < 3.0 {
        '▒'
    } else if distance < 5.0 {
        '░'
    } else {
        '·'
    }
}

/// Paint the first-person view into the grid.
///
/// Each column maps to a camera-plane offset in [-1, 1]; the ray angle
/// uses a planar (not spherical) projection, so straight walls render
/// straight. Wall slice height is `H / (distance + ε)`, centered
/// vertically.
pub fn render_view(grid: &mut GridBuffer, maze: &Maze, camera: &Camera, fov: f64) {
    grid.clear(BLANK);

    let width = grid.width();
    let height = grid.height() as i64;
    let half_fov_tan = (fov / 2.0).tan();

    for col in 0..width {
        let plane = 2.0 * col as f64 / width as f64 - 1.0;
        let ray_angle = camera.angle + (plane * half_fov_tan).atan();

        let distance = cast_ray(maze, camera.x, camera.y, ray_angle);

        let line_height = (height as f64 / (distance + HEIGHT_EPS)).floor() as i64;
        let draw_start = ((height - line_height) / 2).max(0);
        let draw_end = ((height + line_height) / 2).min(height - 1);

        let symbol = shade(distance);
        for row in draw_start..=draw_end {
            grid.set(row as usize, col, symbol);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cell::Cell;
    use crate::render::grid::{GRID_HEIGHT, GRID_WIDTH};
    use std::f64::consts::{FRAC_PI_2, PI, TAU};

    /// Helper: build a Maze from a string diagram.
    /// Legend:  '#'=Wall  '.'=Passage
    fn maze_from(rows: &[&str]) -> Maze {
        let mut m = Maze::filled(rows.len(), Cell::Wall);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch == '.' {
                    m.set(x, y, Cell::Passage);
                }
            }
        }
        m
    }

    /// All-wall except the camera's own cell: every direction hits the
    /// adjacent wall almost immediately.
    #[test]
    fn enclosed_cell_hits_walls_in_every_direction() {
        let m = maze_from(&[
            "###",
            "#.#",
            "###",
        ]);
        let mut a = 0.0;
        while a < TAU {
            let d = cast_ray(&m, 1.5, 1.5, a);
            assert!(d.is_finite());
            assert!(d <= 1.2, "angle {a}: distance {d}");
            assert!(d >= 0.4, "angle {a}: distance {d}");
            a += 0.1;
        }
    }

    #[test]
    fn degenerate_vertical_ray() {
        let m = maze_from(&[
            "###",
            "#.#",
            "###",
        ]);
        // Straight down (+y): wall row at y=2, half a cell away.
        let d = cast_ray(&m, 1.5, 1.5, FRAC_PI_2);
        assert!((d - 0.5).abs() < 1e-6);
        // Straight up.
        let d = cast_ray(&m, 1.5, 1.5, 3.0 * FRAC_PI_2);
        assert!((d - 0.5).abs() < 1e-6);
    }

    #[test]
    fn degenerate_horizontal_ray_down_a_corridor() {
        let m = maze_from(&[
            "#####",
            "#...#",
            "#####",
            "#####",
            "#####",
        ]);
        // East from (1.5, 1.5): wall column at x=4.
        let d = cast_ray(&m, 1.5, 1.5, 0.0);
        assert!((d - 2.5).abs() < 1e-6);
        // West: wall column at x=0, cell boundary at x=1.
        let d = cast_ray(&m, 1.5, 1.5, PI);
        assert!((d - 0.5).abs() < 1e-6);
    }

    #[test]
    fn diagonal_distance_is_perpendicular() {
        let m = maze_from(&[
            "###",
            "#.#",
            "###",
        ]);
        // 45° toward the corner: first crossing steps into a wall cell
        // half a cell away along each axis; perpendicular distance is
        // 0.5 / cos(45°).
        let d = cast_ray(&m, 1.5, 1.5, PI / 4.0);
        assert!((d - 0.5 / (PI / 4.0).cos()).abs() < 1e-6);
    }

    #[test]
    fn degenerate_ray_with_no_wall_returns_sentinel() {
        // A full passage column: a vertical ray escapes the (border-less)
        // test maze without hitting anything.
        let mut m = Maze::filled(3, Cell::Passage);
        m.set(0, 0, Cell::Wall); // unrelated wall off the ray's column
        let d = cast_ray(&m, 1.5, 1.5, FRAC_PI_2);
        assert_eq!(d, MAX_DISTANCE);
    }

    #[test]
    fn shade_buckets() {
        assert_eq!(shade(0.5), '█');
        assert_eq!(shade(1.5), '▓');
        assert_eq!(shade(2.5), '▒');
        assert_eq!(shade(4.0), '░');
        assert_eq!(shade(7.0), '·');
        assert_eq!(shade(MAX_DISTANCE), '·');
    }

    #[test]
    fn render_fills_every_column_inside_a_box() {
        let m = maze_from(&[
            "#####",
            "#...#",
            "#...#",
            "#...#",
            "#####",
        ]);
        let camera = Camera::at_cell(2, 2);
        let mut grid = GridBuffer::new(GRID_WIDTH, GRID_HEIGHT, BLANK);
        render_view(&mut grid, &m, &camera, PI / 3.0);

        let mid = GRID_HEIGHT / 2;
        for col in 0..GRID_WIDTH {
            assert_ne!(grid.get(mid, col), BLANK, "column {col} empty at center row");
        }
    }

    #[test]
    fn nearer_walls_draw_taller_slices() {
        let m = maze_from(&[
            "#########",
            "#.......#",
            "#########",
            "#########",
            "#########",
            "#########",
            "#########",
            "#########",
            "#########",
        ]);
        // Both face east (at_cell starts heading 0).
        let near = Camera::at_cell(7, 1); // one cell from the east wall
        let far = Camera::at_cell(1, 1); // six cells from it

        let slice_height = |cam: &Camera| {
            let mut grid = GridBuffer::new(GRID_WIDTH, GRID_HEIGHT, BLANK);
            render_view(&mut grid, &m, cam, PI / 3.0);
            let center = GRID_WIDTH / 2;
            (0..GRID_HEIGHT).filter(|&r| grid.get(r, center) != BLANK).count()
        };

        assert!(slice_height(&near) > slice_height(&far));
    }
}
