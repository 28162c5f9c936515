//! Rectangular grid of cells with per-side wall flags.
//!
//! Cells are stored row-major in a flat `Vec` and addressed by `(x, y)`
//! coordinates; nothing outside the grid holds a reference to a cell.
//! Walls are only ever removed in mirrored pairs through
//! [`Grid::break_wall_between`].

use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::error::MazeError;

/// Largest number of cells a grid may hold (e.g. 1000x1000).
pub const MAX_CELLS: usize = 1_000_000;

/// `width * height`, or `TooLarge` when the product overflows or exceeds
/// [`MAX_CELLS`].
pub(crate) fn checked_cell_count(width: usize, height: usize) -> Result<usize, MazeError> {
    width
        .checked_mul(height)
        .filter(|&cells| cells <= MAX_CELLS)
        .ok_or(MazeError::TooLarge {
            width,
            height,
            max_cells: MAX_CELLS,
        })
}

/// A plain `(x, y)` coordinate. `x` grows rightward, `y` downward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// The coordinate one step in `direction`, or `None` if that would go
    /// below zero on either axis. Upper bounds are the grid's concern.
    pub fn shifted(self, direction: Direction) -> Option<Position> {
        let (dx, dy) = direction.offset();
        Some(Position {
            x: self.x.checked_add_signed(dx)?,
            y: self.y.checked_add_signed(dy)?,
        })
    }
}

/// A cell in the maze with walls in four directions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
    walls: [bool; 4], // indexed by Direction::wall_index
    visited: bool,
}

impl Cell {
    fn new(x: usize, y: usize) -> Self {
        Self {
            x,
            y,
            walls: [true, true, true, true], // All walls present initially
            visited: false,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// `true` when the side facing `direction` is walled off.
    pub fn has_wall(&self, direction: Direction) -> bool {
        self.walls[direction.wall_index()]
    }

    /// Generation bookkeeping; every cell of a carved maze reports `true`.
    pub fn visited(&self) -> bool {
        self.visited
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    start: Position,
    end: Position,
}

impl Grid {
    /// Build a `width` x `height` grid with every wall standing.
    ///
    /// The end cell is always the bottom-right corner. Fails if either
    /// dimension is zero, the grid would exceed [`MAX_CELLS`], or `start`
    /// falls outside the grid.
    pub fn new(width: usize, height: usize, start: Position) -> Result<Self, MazeError> {
        if width == 0 || height == 0 {
            return Err(MazeError::InvalidDimensions { width, height });
        }
        let count = checked_cell_count(width, height)?;
        if start.x >= width || start.y >= height {
            return Err(MazeError::StartOutOfBounds {
                x: start.x,
                y: start.y,
                width,
                height,
            });
        }

        let mut cells = Vec::with_capacity(count);
        for y in 0..height {
            for x in 0..width {
                cells.push(Cell::new(x, y));
            }
        }

        Ok(Self {
            width,
            height,
            cells,
            start,
            end: Position::new(width - 1, height - 1),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    pub fn is_start(&self, x: usize, y: usize) -> bool {
        self.start == Position::new(x, y)
    }

    pub fn is_end(&self, x: usize, y: usize) -> bool {
        self.end == Position::new(x, y)
    }

    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            Some(&self.cells[y * self.width + x])
        } else {
            None
        }
    }

    fn cell_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        if self.in_bounds(pos.x, pos.y) {
            let idx = pos.y * self.width + pos.x;
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// The in-bounds neighbor of `pos` in `direction`.
    pub fn step(&self, pos: Position, direction: Direction) -> Option<Position> {
        pos.shifted(direction)
            .filter(|next| self.in_bounds(next.x, next.y))
    }

    /// Grid-adjacent cells that exist, in up, down, left, right order.
    pub fn neighbors(&self, x: usize, y: usize) -> Vec<&Cell> {
        let pos = Position::new(x, y);
        Direction::ALL
            .iter()
            .filter_map(|&dir| self.step(pos, dir))
            .filter_map(|next| self.cell(next.x, next.y))
            .collect()
    }

    pub fn unvisited_neighbors(&self, x: usize, y: usize) -> Vec<&Cell> {
        self.neighbors(x, y)
            .into_iter()
            .filter(|cell| !cell.visited)
            .collect()
    }

    /// True iff every neighbor of `(x, y)` has already been visited.
    pub fn is_dead_end(&self, x: usize, y: usize) -> bool {
        self.neighbors(x, y).iter().all(|cell| cell.visited)
    }

    /// Whether a player standing on `pos` can pass through its `direction`
    /// side: the neighbor must exist and the wall must be gone.
    pub fn can_move(&self, pos: Position, direction: Direction) -> bool {
        match (self.cell(pos.x, pos.y), self.step(pos, direction)) {
            (Some(cell), Some(_)) => !cell.has_wall(direction),
            _ => false,
        }
    }

    /// Carve a passage between two side-by-side cells, clearing the wall
    /// on both of them.
    pub fn break_wall_between(&mut self, a: Position, b: Position) -> Result<(), MazeError> {
        let direction = Direction::ALL
            .iter()
            .copied()
            .find(|&dir| self.step(a, dir) == Some(b))
            .filter(|_| self.in_bounds(a.x, a.y))
            .ok_or(MazeError::NotAdjacent { a, b })?;

        if let Some(cell) = self.cell_mut(a) {
            cell.walls[direction.wall_index()] = false;
        }
        if let Some(cell) = self.cell_mut(b) {
            cell.walls[direction.opposite().wall_index()] = false;
        }
        Ok(())
    }

    pub(crate) fn mark_visited(&mut self, pos: Position) {
        if let Some(cell) = self.cell_mut(pos) {
            cell.visited = true;
        }
    }

    /// Restore every wall and clear every visited flag.
    pub(crate) fn reset(&mut self) {
        for cell in &mut self.cells {
            cell.walls = [true, true, true, true];
            cell.visited = false;
        }
    }

    /// Every carved passage exactly once, as `(cell, right-or-lower neighbor)`.
    pub fn passages(&self) -> Vec<(Position, Position)> {
        let mut out = Vec::new();
        for cell in &self.cells {
            let pos = cell.position();
            for dir in [Direction::Right, Direction::Down] {
                if let Some(next) = self.step(pos, dir) {
                    if !cell.has_wall(dir) {
                        out.push((pos, next));
                    }
                }
            }
        }
        out
    }

    /// Convert the maze to a binary tile map.
    ///
    /// Creates a grid where:
    /// - 0 = wall
    /// - 1 = path (cell centre or open passage)
    ///
    /// For a maze of W columns and H rows the map is `(2H+1) x (2W+1)` and
    /// cell `(x, y)` sits at tile `[2y+1][2x+1]`.
    pub fn to_binary_grid(&self) -> Vec<Vec<u8>> {
        let mut tiles = vec![vec![0u8; self.width * 2 + 1]; self.height * 2 + 1];

        for cell in &self.cells {
            let gr = cell.y * 2 + 1;
            let gc = cell.x * 2 + 1;

            tiles[gr][gc] = 1;

            if !cell.has_wall(Direction::Up) {
                tiles[gr - 1][gc] = 1;
            }
            if !cell.has_wall(Direction::Down) {
                tiles[gr + 1][gc] = 1;
            }
            if !cell.has_wall(Direction::Left) {
                tiles[gr][gc - 1] = 1;
            }
            if !cell.has_wall(Direction::Right) {
                tiles[gr][gc + 1] = 1;
            }
        }

        tiles
    }
}
