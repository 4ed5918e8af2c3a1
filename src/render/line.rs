/// Straight-segment rasterization over a GridBuffer.
///
/// Integer Bresenham stepping. Independent of the raycaster — this is
/// the generic 2D drawing utility (the minimap overlay's heading
/// segment uses it). Coordinates are (x, y) = (column, row).

use super::grid::GridBuffer;

/// Draw a segment from (x0, y0) to (x1, y1) with `symbol`.
///
/// Endpoints are floored and clamped into grid bounds first, so any
/// finite input is safe. The start cell is always plotted, even for a
/// degenerate zero-length segment.
pub fn draw_line(grid: &mut GridBuffer, x0: f64, y0: f64, x1: f64, y1: f64, symbol: char) {
    let max_x = grid.width() as i64 - 1;
    let max_y = grid.height() as i64 - 1;
    let clamp = |v: f64, max: i64| (v.floor() as i64).clamp(0, max);

    let mut x = clamp(x0, max_x);
    let mut y = clamp(y0, max_y);
    let x1 = clamp(x1, max_x);
    let y1 = clamp(y1, max_y);

    let dx = (x1 - x).abs();
    let dy = (y1 - y).abs();
    let sx: i64 = if x < x1 { 1 } else { -1 };
    let sy: i64 = if y < y1 { 1 } else { -1 };
    let mut err = dx - dy;

    loop {
        grid.set(y as usize, x as usize, symbol);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }
}
