//! Maze generation using Recursive Backtracker algorithm
//!
//! Algorithm: Recursive Backtracker (DFS with backtracking)
//! 1. Reset the grid: every wall up, every cell unvisited
//! 2. Pick a random cell, mark it visited, push it on the stack
//! 3. While the stack is not empty:
//!    - If the current cell has no unvisited neighbors, pop the stack into
//!      the current cell (backtrack)
//!    - Else: choose a random unvisited neighbor, mark it visited, break the
//!      wall between the two, push the current cell and move to the neighbor
//!
//! Every cell is visited exactly once and every break joins a new cell to
//! the tree, so the result is a spanning tree: `W*H - 1` passages, no loops.

use crate::error::MazeError;
use crate::grid::{Grid, Position};
use crate::rng::{EntropySource, Lcg, RandomSource};

/// Carves grids with randomness drawn from `R`.
pub struct MazeGenerator<R> {
    rng: R,
}

impl<R: RandomSource> MazeGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Take ownership of `grid`, carve it, and hand it back.
    ///
    /// The stack holds coordinates, never cell references. A separate
    /// `current` is tracked rather than peeking at the stack top, so a pop
    /// re-examines the popped cell on the next iteration.
    pub fn carve(&mut self, mut grid: Grid) -> Result<Grid, MazeError> {
        grid.reset();

        let mut current = self.rng.random_position(grid.width(), grid.height())?;
        grid.mark_visited(current);
        let mut stack: Vec<Position> = vec![current];

        while !stack.is_empty() {
            if grid.is_dead_end(current.x, current.y) {
                // Backtrack
                if let Some(previous) = stack.pop() {
                    current = previous;
                }
            } else {
                // Non-empty: the dead-end check above guarantees it
                let next = self
                    .rng
                    .pick_random(&grid.unvisited_neighbors(current.x, current.y))?
                    .position();

                grid.mark_visited(next);
                grid.break_wall_between(current, next)?;
                stack.push(current);
                current = next;
            }
        }

        Ok(grid)
    }

    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl Grid {
    /// Generate a maze deterministically from `seed`.
    ///
    /// Same dimensions, start and seed always give the same walls.
    pub fn generate(
        width: usize,
        height: usize,
        start: Position,
        seed: u32,
    ) -> Result<Grid, MazeError> {
        let grid = Grid::new(width, height, start)?;
        MazeGenerator::new(Lcg::new(seed)).carve(grid)
    }

    /// Generate a maze from OS entropy.
    pub fn generate_random(
        width: usize,
        height: usize,
        start: Position,
    ) -> Result<Grid, MazeError> {
        let grid = Grid::new(width, height, start)?;
        MazeGenerator::new(EntropySource::new()).carve(grid)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::{HashMap, HashSet, VecDeque};

    use super::*;
    use crate::direction::Direction;

    /// Shortest walk from `from` to `to` through open walls.
    pub(crate) fn solve(grid: &Grid, from: Position, to: Position) -> Option<Vec<Direction>> {
        let mut came_from: HashMap<Position, (Position, Direction)> = HashMap::new();
        let mut seen = HashSet::from([from]);
        let mut queue = VecDeque::from([from]);

        while let Some(pos) = queue.pop_front() {
            if pos == to {
                let mut moves = Vec::new();
                let mut at = to;
                while at != from {
                    let (prev, dir) = came_from[&at];
                    moves.push(dir);
                    at = prev;
                }
                moves.reverse();
                return Some(moves);
            }
            for dir in Direction::ALL {
                if !grid.can_move(pos, dir) {
                    continue;
                }
                if let Some(next) = grid.step(pos, dir) {
                    if seen.insert(next) {
                        came_from.insert(next, (pos, dir));
                        queue.push_back(next);
                    }
                }
            }
        }
        None
    }

    fn reachable_count(grid: &Grid) -> usize {
        let mut seen = HashSet::from([Position::new(0, 0)]);
        let mut queue = VecDeque::from([Position::new(0, 0)]);
        while let Some(pos) = queue.pop_front() {
            for dir in Direction::ALL {
                if grid.can_move(pos, dir) {
                    if let Some(next) = grid.step(pos, dir) {
                        if seen.insert(next) {
                            queue.push_back(next);
                        }
                    }
                }
            }
        }
        seen.len()
    }

    const SIZES: [(usize, usize); 7] = [(1, 1), (2, 2), (1, 8), (8, 1), (5, 5), (16, 10), (20, 20)];

    #[test]
    fn test_spanning_tree_property() {
        for (width, height) in SIZES {
            for seed in [1u32, 7, 12345, 2918957128] {
                let grid = Grid::generate(width, height, Position::default(), seed).unwrap();
                let cells = width * height;

                // V - 1 edges and connected means acyclic too
                assert_eq!(grid.passages().len(), cells - 1, "{}x{} seed {}", width, height, seed);
                assert_eq!(reachable_count(&grid), cells, "{}x{} seed {}", width, height, seed);
            }
        }
    }

    #[test]
    fn test_full_coverage() {
        for (width, height) in SIZES {
            let grid = Grid::generate(width, height, Position::default(), 99).unwrap();
            assert!(grid.cells().all(|c| c.visited()), "{}x{}", width, height);
        }
    }

    #[test]
    fn test_walls_are_mirrored_and_border_intact() {
        for seed in 0..20 {
            let grid = Grid::generate(9, 6, Position::default(), seed).unwrap();
            for cell in grid.cells() {
                for dir in Direction::ALL {
                    match grid.step(cell.position(), dir) {
                        Some(next) => {
                            let other = grid.cell(next.x, next.y).unwrap();
                            assert_eq!(cell.has_wall(dir), other.has_wall(dir.opposite()));
                        }
                        None => assert!(cell.has_wall(dir), "border wall missing"),
                    }
                }
            }
        }
    }

    #[test]
    fn test_start_reaches_end() {
        let grid = Grid::generate(16, 10, Position::default(), 4242).unwrap();
        let path = solve(&grid, grid.start(), grid.end()).expect("end unreachable");
        // Manhattan distance is a lower bound on any route
        assert!(path.len() >= 15 + 9);
    }

    #[test]
    fn test_two_by_two_breaks_three_walls() {
        for seed in 0..10 {
            let grid = Grid::generate(2, 2, Position::default(), seed).unwrap();
            assert_eq!(grid.passages().len(), 3);
            // Removing any one edge of the 4-cycle leaves a 2-step route
            let path = solve(&grid, grid.start(), grid.end()).unwrap();
            assert_eq!(path.len(), 2);
        }
    }

    #[test]
    fn test_determinism() {
        let maze1 = Grid::generate(10, 10, Position::default(), 99999).unwrap();
        let maze2 = Grid::generate(10, 10, Position::default(), 99999).unwrap();

        // Same seed should produce identical mazes
        assert_eq!(maze1.to_binary_grid(), maze2.to_binary_grid());
    }

    #[test]
    fn test_different_seeds() {
        let maze1 = Grid::generate(10, 10, Position::default(), 11111).unwrap();
        let maze2 = Grid::generate(10, 10, Position::default(), 22222).unwrap();

        // Different seeds should (almost certainly) produce different mazes
        assert_ne!(maze1.to_binary_grid(), maze2.to_binary_grid());
    }

    #[test]
    fn test_carve_resets_a_dirty_grid() {
        let mut grid = Grid::new(4, 4, Position::default()).unwrap();
        grid.break_wall_between(Position::new(0, 0), Position::new(1, 0)).unwrap();
        grid.mark_visited(Position::new(3, 3));

        let carved = MazeGenerator::new(Lcg::new(5)).carve(grid).unwrap();
        let fresh = Grid::generate(4, 4, Position::default(), 5).unwrap();
        assert_eq!(carved, fresh);
    }

    #[test]
    fn test_entropy_generation_is_perfect() {
        let grid = Grid::generate_random(12, 7, Position::new(3, 2)).unwrap();
        assert_eq!(grid.passages().len(), 12 * 7 - 1);
        assert_eq!(grid.start(), Position::new(3, 2));
        assert_eq!(reachable_count(&grid), 12 * 7);
    }

    #[test]
    fn test_generator_hands_back_its_source() {
        let mut generator = MazeGenerator::new(Lcg::new(8));
        generator.carve(Grid::new(3, 3, Position::default()).unwrap()).unwrap();
        let mut used = generator.into_inner();
        let mut fresh = Lcg::new(8);
        assert_ne!(
            (0..5).map(|_| used.random_int(1000).unwrap()).collect::<Vec<_>>(),
            (0..5).map(|_| fresh.random_int(1000).unwrap()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_invalid_dimensions_propagate() {
        assert!(Grid::generate(0, 4, Position::default(), 1).is_err());
        assert!(Grid::generate(4, 4, Position::new(4, 0), 1).is_err());
    }
}
