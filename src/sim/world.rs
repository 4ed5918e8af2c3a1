/// World: the owned context driving a session.
///
/// Bundles the maze, the camera, the grid the raycaster paints, and the
/// render scheduler — no module-global state. Every committed camera
/// change re-renders the view; grid writes reach the terminal through
/// the scheduler (coalesced to one paint per tick).

use crate::config::GameConfig;
use crate::domain::camera::{Camera, MovementIntent};
use crate::domain::maze::Maze;
use crate::render::caster;
use crate::render::grid::{GridBuffer, BLANK, GRID_HEIGHT, GRID_WIDTH};
use crate::render::line::draw_line;
use crate::render::schedule::RenderScheduler;

use super::mazegen;

/// Half-width of the minimap overlay, in maze cells.
const MAP_RADIUS: isize = 10;

pub struct World {
    pub maze: Maze,
    pub camera: Camera,
    pub grid: GridBuffer,
    pub scheduler: RenderScheduler,
    pub show_map: bool,
    fov: f64,
    seed: Option<u64>,
}

impl World {
    /// Generate a maze, place the camera at the first passage, and
    /// render the initial view.
    pub fn new(config: &GameConfig) -> Self {
        let maze = mazegen::generate_seeded(config.maze.seed);
        let scheduler = RenderScheduler::new();
        let mut grid = GridBuffer::new(GRID_WIDTH, GRID_HEIGHT, BLANK);
        grid.set_observer(scheduler.hook());

        let mut world = World {
            maze,
            camera: Camera::new(1.5, 1.5),
            grid,
            scheduler,
            show_map: false,
            fov: config.camera.fov_radians(),
            seed: config.maze.seed,
        };
        world.place_camera();
        world.render_view();
        world
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Rebuild the maze, reposition the camera, re-render. Atomic from
    /// the caller's perspective: no intermediate state escapes.
    pub fn regenerate(&mut self) {
        self.maze = mazegen::generate_seeded(self.seed);
        self.place_camera();
        self.render_view();
    }

    /// Apply held movement for one tick: each active flag is an
    /// immediate position update. Returns whether anything committed
    /// (committed movement has already re-rendered).
    pub fn apply_intent(&mut self, intent: MovementIntent, speed: f64) -> bool {
        if intent.is_idle() {
            return false;
        }
        let mut moved = false;
        if intent.forward {
            moved |= self.camera.move_forward(&self.maze, speed);
        }
        if intent.backward {
            moved |= self.camera.move_forward(&self.maze, -speed);
        }
        if intent.strafe_left {
            moved |= self.camera.strafe(&self.maze, -speed);
        }
        if intent.strafe_right {
            moved |= self.camera.strafe(&self.maze, speed);
        }
        if moved {
            self.render_view();
        }
        moved
    }

    /// Rotate and re-render. Never collision-gated.
    pub fn rotate(&mut self, delta: f64) {
        self.camera.rotate(delta);
        self.render_view();
    }

    /// Teleport entry point for external drivers. Same Passage gate as
    /// movement; re-renders on commit.
    #[allow(dead_code)]
    pub fn set_position(&mut self, x: f64, y: f64) -> bool {
        let committed = self.camera.set_position(&self.maze, x, y);
        if committed {
            self.render_view();
        }
        committed
    }

    pub fn toggle_map(&mut self) {
        self.show_map = !self.show_map;
        self.render_view();
    }

    /// Raycast the current camera view into the grid, plus the minimap
    /// overlay when enabled.
    pub fn render_view(&mut self) {
        caster::render_view(&mut self.grid, &self.maze, &self.camera, self.fov);
        if self.show_map {
            self.render_minimap();
        }
    }

    // ── Internal ──

    /// Camera goes to the first passage cell scanning row-major from
    /// (0,0), heading reset to 0 (east). The generator guarantees a
    /// passage exists; the fallback never fires in practice.
    fn place_camera(&mut self) {
        let (x, y) = self.maze.first_passage().unwrap_or((1, 1));
        self.camera = Camera::at_cell(x, y);
    }

    /// Overhead map of the camera's surroundings in the top-left
    /// corner: walls, a heading segment (drawn with the line
    /// rasterizer), and the camera marker.
    fn render_minimap(&mut self) {
        let cam_x = self.camera.x.floor() as isize;
        let cam_y = self.camera.y.floor() as isize;

        for my in -MAP_RADIUS..=MAP_RADIUS {
            for mx in -MAP_RADIUS..=MAP_RADIUS {
                let row = (my + MAP_RADIUS) as usize;
                let col = (mx + MAP_RADIUS) as usize;
                if self.maze.is_wall(cam_x + mx, cam_y + my) {
                    self.grid.set(row, col, '#');
                } else {
                    self.grid.set(row, col, ' ');
                }
            }
        }

        let center = MAP_RADIUS as f64;
        let reach = MAP_RADIUS as f64 * 0.8;
        draw_line(
            &mut self.grid,
            center,
            center,
            center + self.camera.angle.cos() * reach,
            center + self.camera.angle.sin() * reach,
            '+',
        );
        self.grid.set(MAP_RADIUS as usize, MAP_RADIUS as usize, '@');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CameraConfig, DisplayConfig, GameConfig, MazeConfig};
    use crate::domain::cell::Cell;

    fn test_config(seed: u64) -> GameConfig {
        GameConfig {
            camera: CameraConfig {
                fov_degrees: 60.0,
                move_speed: 0.1,
                rotation_speed: 0.1,
                mouse_sensitivity: 0.05,
            },
            display: DisplayConfig { frame_interval_ms: 16 },
            maze: MazeConfig { seed: Some(seed) },
        }
    }

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

    #[test]
    fn new_world_starts_at_first_passage_heading_east() {
        let w = World::new(&test_config(11));
        let (px, py) = w.maze.first_passage().unwrap();
        assert_eq!(w.camera.x.floor() as usize, px);
        assert_eq!(w.camera.y.floor() as usize, py);
        assert_eq!(w.camera.angle, 0.0);
        // Initial render left a paint pending.
        assert!(w.scheduler.is_pending());
    }

    #[test]
    fn regenerate_repositions_and_schedules_render() {
        let mut w = World::new(&test_config(11));
        w.scheduler.take();
        w.rotate(1.0);
        w.scheduler.take();

        w.regenerate();
        let (px, py) = w.maze.first_passage().unwrap();
        assert_eq!(w.camera.x.floor() as usize, px);
        assert_eq!(w.camera.y.floor() as usize, py);
        assert_eq!(w.camera.angle, 0.0);
        assert!(w.scheduler.is_pending());
    }

    #[test]
    fn regenerate_with_fixed_seed_reproduces_the_maze() {
        let mut w = World::new(&test_config(5));
        let before: Vec<bool> = (0..w.maze.size() as isize)
            .flat_map(|y| (0..w.maze.size() as isize).map(move |x| (x, y)))
            .map(|(x, y)| w.maze.is_wall(x, y))
            .collect();
        w.regenerate();
        let after: Vec<bool> = (0..w.maze.size() as isize)
            .flat_map(|y| (0..w.maze.size() as isize).map(move |x| (x, y)))
            .map(|(x, y)| w.maze.is_wall(x, y))
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn blocked_intent_does_not_move_or_render() {
        let mut w = World::new(&test_config(11));
        w.maze = maze_from(&[
            "####",
            "#.##",
            "####",
            "####",
        ]);
        w.camera = Camera::at_cell(1, 1); // facing east into the wall
        w.scheduler.take();

        let intent = MovementIntent { forward: true, ..Default::default() };
        assert!(!w.apply_intent(intent, 1.0));
        assert!((w.camera.x - 1.5).abs() < 1e-9);
        assert!(!w.scheduler.is_pending());
    }

    #[test]
    fn committed_intent_moves_and_renders() {
        let mut w = World::new(&test_config(11));
        w.maze = maze_from(&[
            "####",
            "#..#",
            "####",
            "####",
        ]);
        w.camera = Camera::at_cell(1, 1);
        w.scheduler.take();

        let intent = MovementIntent { forward: true, ..Default::default() };
        assert!(w.apply_intent(intent, 1.0));
        assert!((w.camera.x - 2.5).abs() < 1e-9);
        assert!(w.scheduler.is_pending());
    }

    #[test]
    fn idle_intent_is_a_no_op() {
        let mut w = World::new(&test_config(11));
        w.scheduler.take();
        assert!(!w.apply_intent(MovementIntent::default(), 0.1));
        assert!(!w.scheduler.is_pending());
    }

    #[test]
    fn set_position_gates_and_renders() {
        let mut w = World::new(&test_config(11));
        w.maze = maze_from(&[
            "####",
            "#..#",
            "####",
            "####",
        ]);
        w.camera = Camera::at_cell(1, 1);
        w.scheduler.take();

        assert!(!w.set_position(0.5, 0.5)); // wall cell
        assert!(!w.scheduler.is_pending());
        assert!(w.set_position(2.5, 1.5));
        assert!(w.scheduler.is_pending());
    }

    #[test]
    fn minimap_overlay_marks_camera_and_walls() {
        let mut w = World::new(&test_config(11));
        w.show_map = true;
        w.render_view();
        let center = MAP_RADIUS as usize;
        assert_eq!(w.grid.get(center, center), '@');
    }
}
