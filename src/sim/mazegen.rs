/// Maze generation: randomized depth-first carving.
///
/// Starts from a random interior cell and carves two-cell steps,
/// clearing the wall between, backtracking at dead ends. Every interior
/// cell reachable in a carve step is visited exactly once, so the
/// result is a perfect maze. A post-pass forces the border back to Wall
/// regardless of what carving did (carving already stays inside the
/// border; the pass is a correctness safety net).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::cell::Cell;
use crate::domain::maze::{Maze, MAZE_SIZE};

const DIRECTIONS: [(isize, isize); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// Carve a maze of `MAZE_SIZE` using the given random source.
pub fn generate<R: Rng>(rng: &mut R) -> Maze {
    generate_sized(rng, MAZE_SIZE)
}

/// Seeded convenience: a fixed seed reproduces the same maze, `None`
/// draws fresh OS entropy.
pub fn generate_seeded(seed: Option<u64>) -> Maze {
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    };
    generate(&mut rng)
}

fn generate_sized<R: Rng>(rng: &mut R, size: usize) -> Maze {
    let mut maze = Maze::filled(size, Cell::Wall);
    let mut visited = vec![false; size * size];

    // Random interior start, excluding the border ring.
    let start_x = rng.random_range(1..size - 1);
    let start_y = rng.random_range(1..size - 1);
    maze.set(start_x, start_y, Cell::Passage);
    visited[start_y * size + start_x] = true;

    let mut stack: Vec<(usize, usize)> = vec![(start_x, start_y)];

    while let Some(&(cx, cy)) = stack.last() {
        // Unvisited neighbors two cells away, strictly inside the border.
        let mut candidates: Vec<(usize, usize, isize, isize)> = Vec::with_capacity(4);
        for (dx, dy) in DIRECTIONS {
            let nx = cx as isize + dx * 2;
            let ny = cy as isize + dy * 2;
            if nx >= 1
                && nx < size as isize - 1
                && ny >= 1
                && ny < size as isize - 1
                && !visited[ny as usize * size + nx as usize]
            {
                candidates.push((nx as usize, ny as usize, dx, dy));
            }
        }

        if candidates.is_empty() {
            stack.pop();
            continue;
        }

        let (nx, ny, dx, dy) = candidates[rng.random_range(0..candidates.len())];
        // Clear the wall cell between current and chosen.
        let wall_x = (cx as isize + dx) as usize;
        let wall_y = (cy as isize + dy) as usize;
        maze.set(wall_x, wall_y, Cell::Passage);
        maze.set(nx, ny, Cell::Passage);
        visited[ny * size + nx] = true;
        stack.push((nx, ny));
    }

    // Re-wall the border unconditionally.
    for i in 0..size {
        maze.set(i, 0, Cell::Wall);
        maze.set(i, size - 1, Cell::Wall);
        maze.set(0, i, Cell::Wall);
        maze.set(size - 1, i, Cell::Wall);
    }

    maze
}
