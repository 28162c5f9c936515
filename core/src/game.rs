//! Player session over a carved maze.
//!
//! [`GameState`] owns its grid outright once generation hands it over.
//! [`GameState::move_player`] is the only way position and path change;
//! a move that cannot happen leaves the state untouched and says why in
//! its [`MoveOutcome`].

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::direction::Direction;
use crate::error::MazeError;
use crate::grid::{Grid, Position};
use crate::maze_gen::MazeGenerator;
use crate::rng::{EntropySource, Lcg, RandomSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    /// Terminal: the end cell was reached.
    Ended,
}

/// What a call to [`GameState::move_player`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveOutcome {
    Moved,
    /// Moved onto the end cell; the session is now `Ended`.
    Finished,
    Blocked,
    OutOfBounds,
    AlreadyEnded,
}

impl MoveOutcome {
    pub fn moved(self) -> bool {
        matches!(self, MoveOutcome::Moved | MoveOutcome::Finished)
    }
}

/// A play session. Only [`GameState::new`] and [`GameState::with_source`]
/// build one, so the grid underneath is always a carved maze; a bare
/// [`Grid`] cannot be turned into a session from outside the crate:
///
/// ```compile_fail
/// use maze_core::{GameState, Grid, Position};
///
/// let grid = Grid::new(3, 3, Position::default()).unwrap();
/// let game = GameState::from_grid(grid);
/// ```
#[derive(Debug, Clone)]
pub struct GameState {
    grid: Grid,
    position: Position,
    path: Vec<Position>,
    status: GameStatus,
    started_at: Option<Instant>,
    finished_at: Option<Instant>,
}

impl GameState {
    /// Build and carve a maze for `config`, seeding from `config.seed` when
    /// present and from OS entropy otherwise.
    pub fn new(config: &GameConfig) -> Result<Self, MazeError> {
        match config.seed {
            Some(seed) => Self::with_source(config, Lcg::new(seed)),
            None => Self::with_source(config, EntropySource::new()),
        }
    }

    /// Like [`GameState::new`] but with an explicit random source;
    /// `config.seed` is ignored.
    pub fn with_source<R: RandomSource>(config: &GameConfig, rng: R) -> Result<Self, MazeError> {
        config.validate()?;
        let grid = Grid::new(config.width, config.height, config.start)?;
        let grid = MazeGenerator::new(rng).carve(grid)?;
        Ok(Self::from_grid(grid))
    }

    /// Start a session on an already carved grid.
    ///
    /// The player stands on the grid's start cell. If that is also the end
    /// cell (a 1x1 maze) the session is over before it begins. Nothing is
    /// checked here; crate tests use it for hand-built layouts.
    pub(crate) fn from_grid(grid: Grid) -> Self {
        let start = grid.start();
        let now = Instant::now();
        let mut state = Self {
            position: start,
            path: vec![start],
            status: GameStatus::InProgress,
            started_at: Some(now),
            finished_at: None,
            grid,
        };
        if state.grid.is_end(start.x, start.y) {
            state.status = GameStatus::Ended;
            state.finished_at = Some(now);
        }
        state
    }

    pub fn move_player(&mut self, direction: Direction) -> MoveOutcome {
        if self.status == GameStatus::Ended {
            return MoveOutcome::AlreadyEnded;
        }

        let candidate = match self.grid.step(self.position, direction) {
            Some(pos) => pos,
            None => return MoveOutcome::OutOfBounds,
        };

        if !self.grid.can_move(self.position, direction) {
            return MoveOutcome::Blocked;
        }

        self.path.push(candidate);
        self.position = candidate;

        if self.grid.is_end(candidate.x, candidate.y) {
            self.status = GameStatus::Ended;
            self.finished_at = Some(Instant::now());
            MoveOutcome::Finished
        } else {
            MoveOutcome::Moved
        }
    }

    /// Parse a direction symbol, then move. An unknown symbol is an error
    /// and changes nothing.
    pub fn move_str(&mut self, direction: &str) -> Result<MoveOutcome, MazeError> {
        let direction: Direction = direction.parse()?;
        Ok(self.move_player(direction))
    }

    /// Moves actually taken; the starting cell is not a step.
    pub fn step_count(&self) -> usize {
        self.path.len() - 1
    }

    /// Time since the session started, frozen once it ends.
    pub fn elapsed_time(&self) -> Option<Duration> {
        let started = self.started_at?;
        Some(match self.finished_at {
            Some(finished) => finished.duration_since(started),
            None => started.elapsed(),
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Every cell stood on, oldest first, including start and current.
    pub fn path(&self) -> &[Position] {
        &self.path
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == GameStatus::InProgress
    }

    pub fn start(&self) -> Position {
        self.grid.start()
    }

    pub fn end(&self) -> Position {
        self.grid.end()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            width: self.grid.width(),
            height: self.grid.height(),
            start: self.grid.start(),
            end: self.grid.end(),
            position: self.position,
            path: self.path.clone(),
            status: self.status,
            in_progress: self.is_in_progress(),
            step_count: self.step_count(),
            elapsed_ms: self.elapsed_time().map(|d| d.as_millis() as u64),
            cells: self
                .grid
                .cells()
                .map(|cell| CellWalls {
                    x: cell.x,
                    y: cell.y,
                    up: cell.has_wall(Direction::Up),
                    down: cell.has_wall(Direction::Down),
                    left: cell.has_wall(Direction::Left),
                    right: cell.has_wall(Direction::Right),
                })
                .collect(),
        }
    }
}

/// Wall flags of one cell, `true` = wall present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellWalls {
    pub x: usize,
    pub y: usize,
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// Read-only copy of a session for renderers and API clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub width: usize,
    pub height: usize,
    pub start: Position,
    pub end: Position,
    pub position: Position,
    pub path: Vec<Position>,
    pub status: GameStatus,
    pub in_progress: bool,
    pub step_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_ms: Option<u64>,
    /// Row-major, `width * height` entries.
    pub cells: Vec<CellWalls>,
}
