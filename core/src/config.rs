//! Session configuration.

use serde::{Deserialize, Serialize};

use crate::error::MazeError;
use crate::grid::{checked_cell_count, Position};

pub const DEFAULT_WIDTH: usize = 16;
pub const DEFAULT_HEIGHT: usize = 10;

/// Size, start cell and optional seed of a game session.
///
/// Every field has a default, so `{}` deserializes to a 16x10 maze that
/// starts in the top-left corner and is seeded from OS entropy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    pub start: Position,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            start: Position::default(),
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_start(mut self, start: Position) -> Self {
        self.start = start;
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Always the bottom-right cell. Meaningless until `validate` passes.
    pub fn end(&self) -> Position {
        Position::new(self.width.saturating_sub(1), self.height.saturating_sub(1))
    }

    pub fn validate(&self) -> Result<(), MazeError> {
        if self.width == 0 || self.height == 0 {
            return Err(MazeError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        checked_cell_count(self.width, self.height)?;
        if self.start.x >= self.width || self.start.y >= self.height {
            return Err(MazeError::StartOutOfBounds {
                x: self.start.x,
                y: self.start.y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}
