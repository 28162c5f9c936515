//! Maze generation and play-session state.
//!
//! This crate holds the parts with algorithmic content:
//!
//! - [`rng`]: the [`RandomSource`] seam plus a deterministic [`Lcg`]
//! - [`grid`]: cells, walls and neighbor lookup
//! - [`maze_gen`]: recursive-backtracker carving into a perfect maze
//! - [`game`]: move validation, traversal path and win detection
//!
//! Rendering, input handling and transport live in the host and
//! api-server crates, which only read [`GameState`] and call
//! [`GameState::move_player`].

pub mod config;
pub mod direction;
pub mod error;
pub mod game;
pub mod grid;
pub mod maze_gen;
pub mod rng;

// Re-export commonly used types for convenience
pub use config::{GameConfig, DEFAULT_HEIGHT, DEFAULT_WIDTH};
pub use direction::Direction;
pub use error::{ErrorKind, MazeError};
pub use game::{CellWalls, GameSnapshot, GameState, GameStatus, MoveOutcome};
pub use grid::{Cell, Grid, Position, MAX_CELLS};
pub use maze_gen::MazeGenerator;
pub use rng::{EntropySource, Lcg, RandomSource};
