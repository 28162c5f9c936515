//! Error type shared by every fallible operation in the crate.
//!
//! All failures here are programmer errors at a boundary (bad configuration,
//! an unknown direction symbol, misuse of a grid helper). An invalid *move*
//! is never an error; see [`crate::game::MoveOutcome`].

use std::fmt;

use crate::grid::Position;

/// Broad classification of a [`MazeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MazeError {
    /// Width or height was zero.
    InvalidDimensions { width: usize, height: usize },
    /// `width * height` overflows or exceeds the cell limit.
    TooLarge {
        width: usize,
        height: usize,
        max_cells: usize,
    },
    /// The configured start lies outside the grid.
    StartOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    /// A direction symbol or code that is not one of the four directions.
    UnknownDirection(String),
    /// A wall break was requested between cells that do not share a side.
    NotAdjacent { a: Position, b: Position },
    /// `random_int` called with a bound of zero.
    InvalidBound(usize),
    /// `pick_random` called on an empty slice.
    EmptySelection,
}

impl MazeError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidArgument
    }
}

impl fmt::Display for MazeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MazeError::InvalidDimensions { width, height } => write!(
                f,
                "Invalid maze dimensions {}x{}: width and height must be at least 1",
                width, height
            ),
            MazeError::TooLarge {
                width,
                height,
                max_cells,
            } => write!(
                f,
                "Maze {}x{} is too large: at most {} cells allowed",
                width, height, max_cells
            ),
            MazeError::StartOutOfBounds { x, y, width, height } => write!(
                f,
                "Start position ({}, {}) is outside the {}x{} grid",
                x, y, width, height
            ),
            MazeError::UnknownDirection(symbol) => write!(
                f,
                "Invalid direction: '{}'. Must be 'up', 'down', 'left' or 'right'",
                symbol
            ),
            MazeError::NotAdjacent { a, b } => write!(
                f,
                "Cells ({}, {}) and ({}, {}) are not adjacent",
                a.x, a.y, b.x, b.y
            ),
            MazeError::InvalidBound(bound) => {
                write!(f, "Random bound must be positive, got {}", bound)
            }
            MazeError::EmptySelection => write!(f, "Cannot pick from an empty sequence"),
        }
    }
}

impl std::error::Error for MazeError {}
